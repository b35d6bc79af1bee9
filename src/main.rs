use itertools::Itertools;
use rand::rngs::OsRng;
use structopt::StructOpt;

use spncrack::attack::{recover_partial_subkey, LinearApproximation};
use spncrack::cipher::Spn;
use spncrack::corpus;
use spncrack::error::Error;
use spncrack::key::{KeyMaterial, MIN_SEED_LEN};
use spncrack::options::SpncrackOptions;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    match SpncrackOptions::from_args() {
        SpncrackOptions::Lat => {
            print_lat();
            Ok(())
        }
        SpncrackOptions::Corpus {
            samples,
            seed,
            output,
        } => generate_corpus(samples, seed, &output),
        SpncrackOptions::Attack { samples, corpus } => attack(samples, corpus),
    }
}

/// Prints the S-box LAT as biases, one row per input linear form.
fn print_lat() {
    let cipher = Spn::new();
    let balance = cipher.sbox().linear_balance();

    println!("Linear approximation table of the cipher's S-box (biases):");

    for row in cipher.sbox().lat().iter() {
        for &entry in row.iter() {
            print!("{:3} ", entry as i16 - balance);
        }
        println!();
    }
}

fn generate_corpus(samples: usize, seed: Option<String>, output: &str) -> Result<(), Error> {
    let cipher = Spn::new();
    let key = match seed {
        Some(seed) => {
            let bytes = decode_hex(&seed)?;
            KeyMaterial::from_seed(&bytes)?
        }
        None => KeyMaterial::generate()?,
    };

    println!(
        "Running the SPN cipher with subkeys {:04x?}",
        key.subkeys()
    );

    let pairs = corpus::sample(&cipher, &key, samples, &mut OsRng);
    corpus::write(output, &pairs);
    println!("{} plaintext/ciphertext pairs written to {}", samples, output);

    Ok(())
}

fn attack(samples: usize, corpus_path: Option<String>) -> Result<(), Error> {
    let cipher = Spn::new();
    let approximation = LinearApproximation::three_round();

    let (pairs, key) = match corpus_path {
        Some(path) => (corpus::read(path)?, None),
        None => {
            let key = KeyMaterial::generate()?;
            println!(
                "Generated key with K5 = {:04x}, expected candidate {:02x}",
                key.last(),
                target_candidate(&key)
            );

            (corpus::sample(&cipher, &key, samples, &mut OsRng), Some(key))
        }
    };

    println!(
        "Attacking with {} samples, expected bias {:.5}",
        pairs.len(),
        approximation.expected_bias
    );

    let result = recover_partial_subkey(&pairs, &approximation, cipher.sbox())?;

    println!(
        "Recovered partial subkey {:02x} with deviation score {:.5}",
        result.candidate, result.confidence
    );

    println!("Top candidates:");
    let ranked = result
        .scores
        .iter()
        .enumerate()
        .sorted_by(|a, b| b.1.partial_cmp(a.1).expect("scores are finite"))
        .take(5);

    for (candidate, score) in ranked {
        println!("  {:02x}  {:.5}", candidate, score);
    }

    if let Some(key) = key {
        if result.candidate == target_candidate(&key) {
            println!("Attack succeeded: candidate matches the last round key.");
        } else {
            println!(
                "Attack failed: true candidate was {:02x}. More samples help.",
                target_candidate(&key)
            );
        }
    }

    Ok(())
}

/// The candidate byte a successful attack should recover: the two K5
/// nibbles covered by the targeted last-round S-boxes.
fn target_candidate(key: &KeyMaterial) -> u8 {
    let approximation = LinearApproximation::three_round();
    let k5 = key.last();
    let hi = (k5 >> (4 * approximation.target_nibbles[0])) & 0xf;
    let lo = (k5 >> (4 * approximation.target_nibbles[1])) & 0xf;

    ((hi << 4) | lo) as u8
}

fn decode_hex(input: &str) -> Result<Vec<u8>, Error> {
    if input.len() % 2 != 0 || input.len() / 2 < MIN_SEED_LEN {
        return Err(Error::EntropyUnavailable);
    }

    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).map_err(|_| Error::EntropyUnavailable))
        .collect()
}
