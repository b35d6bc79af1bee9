//! Sampling and persistence of plaintext/ciphertext corpora.
//!
//! The corpus format is one pair per line, two 4-hex-digit values separated
//! by a comma: `0f1a, 9b3c`.

use rand::RngCore;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::cipher::Spn;
use crate::error::Error;
use crate::key::KeyMaterial;
use crate::utility::ProgressBar;

/// Samples `samples` known plaintext/ciphertext pairs under one fixed key.
///
/// Plaintexts are drawn uniformly from the RNG rather than enumerated
/// sequentially: a sequential corpus is skewed in its high-order bits and
/// measurably distorts the deviation scores of the attack.
pub fn sample<R: RngCore>(
    cipher: &Spn,
    key: &KeyMaterial,
    samples: usize,
    rng: &mut R,
) -> Vec<(u16, u16)> {
    let mut bar = ProgressBar::new(samples);

    (0..samples)
        .map(|_| {
            bar.increment();
            let plaintext = (rng.next_u32() & 0xffff) as u16;
            (plaintext, cipher.encrypt(plaintext, key))
        })
        .collect()
}

/// Writes a corpus to a CSV file.
pub fn write<P: AsRef<Path>>(path: P, pairs: &[(u16, u16)]) {
    let file = File::create(path).expect("Could not create corpus file.");
    let mut writer = BufWriter::new(file);

    for &(plaintext, ciphertext) in pairs {
        writeln!(writer, "{:04x}, {:04x}", plaintext, ciphertext)
            .expect("Could not write corpus line.");
    }
}

/// Reads a corpus from a CSV file.
///
/// Values that do not fit in 16 bits are rejected with
/// [`Error::InvalidBlockSize`].
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<(u16, u16)>, Error> {
    let file = File::open(path).expect("Could not open corpus file.");
    let mut pairs = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line.expect("Could not read corpus line.");
        if line.trim().is_empty() {
            continue;
        }

        let mut values = line.split(',').map(parse_block);
        let plaintext = values.next().expect("Malformed corpus line.")?;
        let ciphertext = values.next().expect("Malformed corpus line.")?;
        pairs.push((plaintext, ciphertext));
    }

    Ok(pairs)
}

fn parse_block(field: &str) -> Result<u16, Error> {
    let value = u32::from_str_radix(field.trim(), 16).expect("Could not parse corpus value.");

    if value > 0xffff {
        return Err(Error::InvalidBlockSize(value));
    }

    Ok(value as u16)
}
