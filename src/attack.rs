//! Recovery of partial last-round subkeys by linear cryptanalysis.

use crossbeam_utils::thread;
use std::sync::mpsc;

use crate::error::Error;
use crate::sbox::Sbox;
use crate::utility::parity;

/// The number of last-round S-boxes targeted by the approximation.
pub const TARGET_SBOXES: usize = 2;

/// The number of candidate values of the target partial subkey.
pub const CANDIDATES: usize = 1 << (4 * TARGET_SBOXES);

/// A linear approximation over the first three rounds of the cipher,
/// relating a parity of plaintext bits to a parity of the bits entering two
/// of the last round's S-boxes.
#[derive(Clone, Copy, Debug)]
pub struct LinearApproximation {
    /// Plaintext bits participating in the approximation.
    pub plaintext_mask: u16,
    /// Ciphertext nibbles covered by the targeted last-round S-boxes,
    /// ordered so that the first feeds the high nibble of a candidate.
    pub target_nibbles: [usize; TARGET_SBOXES],
    /// Per-target mask selecting the round-4 S-box input bits.
    pub input_masks: [u8; TARGET_SBOXES],
    /// Bias estimated by the piling-up approximation from the single-round
    /// LAT biases along the trail.
    pub expected_bias: f64,
}

impl LinearApproximation {
    /// The canonical 3-round approximation for the cipher of
    /// [`crate::cipher::Spn`], from Heys' tutorial.
    ///
    /// The trail activates four S-boxes whose LAT entries all have bias
    /// magnitude 4/16, giving an expected bias of 2^3 * (1/4)^4 = 1/32 for
    /// the parity of plaintext bits 11, 9 and 8 against bits 0 and 2 of the
    /// round-4 inputs of the S-boxes at nibbles 2 and 0.
    pub fn three_round() -> LinearApproximation {
        LinearApproximation {
            plaintext_mask: 0x0b00,
            target_nibbles: [2, 0],
            input_masks: [0x5, 0x5],
            expected_bias: 1.0 / 32.0,
        }
    }

    /// Evaluates the approximation against a plaintext and the hypothesized
    /// inputs to the targeted last-round S-boxes. Returns true if the XOR of
    /// all selected bits is zero, i.e. the approximation holds.
    pub fn holds(&self, plaintext: u16, round_inputs: [u8; TARGET_SBOXES]) -> bool {
        let mut sum = parity(u32::from(plaintext & self.plaintext_mask));

        for (&input, &mask) in round_inputs.iter().zip(self.input_masks.iter()) {
            sum ^= parity(u32::from(input & mask));
        }

        sum == 0
    }
}

/// The outcome of a partial-subkey recovery run.
#[derive(Clone, Debug)]
pub struct RecoveredSubkey {
    /// The candidate with the maximal deviation score. Its high nibble is
    /// the guess for the subkey nibble at the first target S-box, the low
    /// nibble the guess for the second.
    pub candidate: u8,
    /// The deviation score `|count - N/2| / N` of the winning candidate.
    pub confidence: f64,
    /// The deviation scores of all candidates, indexed by candidate value.
    pub scores: Vec<f64>,
}

/// Recovers 8 bits of the last round subkey from known plaintext/ciphertext
/// pairs sampled under one fixed key.
///
/// For every candidate value the targeted ciphertext nibbles are XORed with
/// the candidate's nibbles and run backwards through the inverse S-box,
/// hypothesizing the last round's substitution inputs. A counter per
/// candidate tracks how often the approximation holds across the corpus.
/// The correct candidate makes the approximation hold with a probability
/// biased away from 1/2; wrong candidates randomize the hypothesis and
/// drive their counters towards N/2.
///
/// Candidates are scored by `|count - N/2| / N` and the maximum wins, ties
/// broken by the smallest candidate value. This is a statistical estimator:
/// its success probability grows with the sample count and the magnitude of
/// the underlying bias.
pub fn recover_partial_subkey(
    samples: &[(u16, u16)],
    approximation: &LinearApproximation,
    sbox: &Sbox,
) -> Result<RecoveredSubkey, Error> {
    if samples.is_empty() {
        return Err(Error::EmptySampleSet);
    }

    // The plaintext parity and the targeted ciphertext nibbles of a sample
    // do not depend on the candidate, so extract them once.
    let shifts = [
        4 * approximation.target_nibbles[0],
        4 * approximation.target_nibbles[1],
    ];
    let prepared: Vec<(u32, u8, u8)> = samples
        .iter()
        .map(|&(plaintext, ciphertext)| {
            (
                parity(u32::from(plaintext & approximation.plaintext_mask)),
                ((ciphertext >> shifts[0]) & 0xf) as u8,
                ((ciphertext >> shifts[1]) & 0xf) as u8,
            )
        })
        .collect();

    let masks = approximation.input_masks;
    let num_threads = num_cpus::get();
    let (result_tx, result_rx) = mpsc::channel();

    // Counters are independent per candidate, so the candidate axis is
    // partitioned across worker threads.
    thread::scope(|scope| {
        for t in 0..num_threads {
            let result_tx = result_tx.clone();
            let prepared = &prepared;

            scope.spawn(move |_| {
                let mut counts = Vec::new();

                for candidate in (0..CANDIDATES).skip(t).step_by(num_threads) {
                    let guess_hi = (candidate >> 4) as u8;
                    let guess_lo = (candidate & 0xf) as u8;
                    let mut count = 0usize;

                    for &(plaintext_parity, ct_hi, ct_lo) in prepared.iter() {
                        let input_hi = sbox.apply_inv(ct_hi ^ guess_hi);
                        let input_lo = sbox.apply_inv(ct_lo ^ guess_lo);

                        let sum = plaintext_parity
                            ^ parity(u32::from(input_hi & masks[0]))
                            ^ parity(u32::from(input_lo & masks[1]));

                        if sum == 0 {
                            count += 1;
                        }
                    }

                    counts.push((candidate, count));
                }

                result_tx.send(counts).expect("Thread could not send result");
            });
        }
    })
    .expect("worker thread panicked");

    let mut counters = [0usize; CANDIDATES];

    for _ in 0..num_threads {
        let counts = result_rx.recv().expect("Main could not receive result");

        for (candidate, count) in counts {
            counters[candidate] = count;
        }
    }

    let num_samples = samples.len() as f64;
    let scores: Vec<f64> = counters
        .iter()
        .map(|&count| (count as f64 - num_samples / 2.0).abs() / num_samples)
        .collect();

    let mut candidate = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[candidate] {
            candidate = i;
        }
    }

    Ok(RecoveredSubkey {
        candidate: candidate as u8,
        confidence: scores[candidate],
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::Spn;
    use crate::key::KeyMaterial;

    fn fixed_key() -> KeyMaterial {
        // The targeted K5 nibbles are 0x2 (nibble 2) and 0x4 (nibble 0),
        // so the recovery must arrive at candidate 0x24.
        KeyMaterial::from_subkeys(&[0x1a2b, 0x3c4d, 0x5e6f, 0x7081, 0x0204]).unwrap()
    }

    fn expected_candidate(key: &KeyMaterial) -> u8 {
        let k5 = key.last();
        ((((k5 >> 8) & 0xf) << 4) | (k5 & 0xf)) as u8
    }

    /// Distinct plaintexts spread evenly over the block space.
    /// Multiplication by an odd constant permutes the 16-bit integers, so
    /// the high-bit skew of a sequential corpus is avoided.
    fn spread_corpus(cipher: &Spn, key: &KeyMaterial, samples: usize) -> Vec<(u16, u16)> {
        (0..samples)
            .map(|i| {
                let plaintext = (i as u16).wrapping_mul(40503);
                (plaintext, cipher.encrypt(plaintext, key))
            })
            .collect()
    }

    #[test]
    fn empty_sample_set_is_rejected() {
        let cipher = Spn::new();
        let approximation = LinearApproximation::three_round();

        assert!(matches!(
            recover_partial_subkey(&[], &approximation, cipher.sbox()),
            Err(Error::EmptySampleSet)
        ));
    }

    #[test]
    fn single_sample_gives_a_defined_result() {
        let cipher = Spn::new();
        let key = fixed_key();
        let approximation = LinearApproximation::three_round();
        let samples = [(0x0001, cipher.encrypt(0x0001, &key))];

        let result = recover_partial_subkey(&samples, &approximation, cipher.sbox()).unwrap();

        // With one sample every counter is 0 or 1, so every candidate
        // scores 0.5 and the tie-break selects the first one.
        assert_eq!(result.candidate, 0);
        assert!((result.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn approximation_bias_is_exact_over_the_codebook() {
        // Undoing the true key's final XOR and substitution for every block
        // must reproduce the analytical bias magnitude of 1/32 exactly.
        let cipher = Spn::new();
        let key = fixed_key();
        let approximation = LinearApproximation::three_round();

        let k5_hi = ((key.last() >> 8) & 0xf) as u8;
        let k5_lo = (key.last() & 0xf) as u8;

        let mut count = 0i64;
        for plaintext in 0..=0xffffu16 {
            let ciphertext = cipher.encrypt(plaintext, &key);
            let input_hi = cipher.sbox().apply_inv((((ciphertext >> 8) & 0xf) as u8) ^ k5_hi);
            let input_lo = cipher.sbox().apply_inv(((ciphertext & 0xf) as u8) ^ k5_lo);

            if approximation.holds(plaintext, [input_hi, input_lo]) {
                count += 1;
            }
        }

        assert_eq!((count - 32768).abs(), 2048);
    }

    #[test]
    fn full_codebook_recovery_is_exact() {
        let cipher = Spn::new();
        let key = fixed_key();
        let approximation = LinearApproximation::three_round();

        let samples: Vec<(u16, u16)> = (0..=0xffffu16)
            .map(|plaintext| (plaintext, cipher.encrypt(plaintext, &key)))
            .collect();

        let result = recover_partial_subkey(&samples, &approximation, cipher.sbox()).unwrap();

        assert_eq!(result.candidate, expected_candidate(&key));
        assert!((result.confidence - approximation.expected_bias).abs() < 1e-12);

        // The correct candidate is the unique maximum.
        for (candidate, &score) in result.scores.iter().enumerate() {
            if candidate != usize::from(result.candidate) {
                assert!(score < result.confidence);
            }
        }
    }

    #[test]
    fn recovery_from_ten_thousand_samples() {
        let cipher = Spn::new();
        let key = fixed_key();
        let approximation = LinearApproximation::three_round();
        let samples = spread_corpus(&cipher, &key, 10_000);

        let result = recover_partial_subkey(&samples, &approximation, cipher.sbox()).unwrap();

        assert_eq!(result.candidate, 0x24);
        assert!(result.confidence > 0.03);
    }

    #[test]
    fn scores_cover_all_candidates() {
        let cipher = Spn::new();
        let key = fixed_key();
        let approximation = LinearApproximation::three_round();
        let samples = spread_corpus(&cipher, &key, 64);

        let result = recover_partial_subkey(&samples, &approximation, cipher.sbox()).unwrap();

        assert_eq!(result.scores.len(), CANDIDATES);
        assert!(result.scores.iter().all(|&s| (0.0..=0.5).contains(&s)));
    }
}
