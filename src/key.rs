//! Key material and the key schedule.

use rand::rngs::OsRng;
use rand::RngCore;
use sha1::{Digest, Sha1};

use crate::error::Error;

/// The number of 16-bit round subkeys, one per round plus a final
/// post-whitening key.
pub const NUM_SUBKEYS: usize = 5;

/// The minimum seed length in bytes accepted by the key schedule.
pub const MIN_SEED_LEN: usize = 16;

/// The five ordered round subkeys K1..K5 of one cipher session.
///
/// Key material is an immutable value: it is derived once and passed by
/// reference into every encrypt, decrypt and attack call that uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyMaterial {
    subkeys: [u16; NUM_SUBKEYS],
}

impl KeyMaterial {
    /// Derives key material from a high-entropy seed.
    ///
    /// The seed is hashed with SHA-1 and the first 80 bits of the digest are
    /// sliced into five big-endian 16-bit subkeys. Seeds shorter than 128
    /// bits are rejected with [`Error::EntropyUnavailable`].
    pub fn from_seed(seed: &[u8]) -> Result<KeyMaterial, Error> {
        if seed.len() < MIN_SEED_LEN {
            return Err(Error::EntropyUnavailable);
        }

        let digest = Sha1::digest(seed);
        let mut subkeys = [0; NUM_SUBKEYS];

        for (i, subkey) in subkeys.iter_mut().enumerate() {
            *subkey = u16::from_be_bytes([digest[2 * i], digest[2 * i + 1]]);
        }

        Ok(KeyMaterial { subkeys })
    }

    /// Generates key material from a fresh 128-bit seed drawn from the
    /// operating system entropy source.
    pub fn generate() -> Result<KeyMaterial, Error> {
        let mut seed = [0; MIN_SEED_LEN];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|_| Error::EntropyUnavailable)?;

        KeyMaterial::from_seed(&seed)
    }

    /// Assembles key material directly from five subkeys.
    pub fn from_subkeys(subkeys: &[u16]) -> Result<KeyMaterial, Error> {
        if subkeys.len() != NUM_SUBKEYS {
            return Err(Error::InvalidKeyMaterial);
        }

        let mut keys = [0; NUM_SUBKEYS];
        keys.copy_from_slice(subkeys);

        Ok(KeyMaterial { subkeys: keys })
    }

    /// Returns the subkey of round `round`, indexed from 0.
    ///
    /// # Panics
    /// The function panics if `round` is not smaller than [`NUM_SUBKEYS`].
    #[inline(always)]
    pub fn subkey(&self, round: usize) -> u16 {
        self.subkeys[round]
    }

    /// Returns the final subkey K5.
    pub fn last(&self) -> u16 {
        self.subkeys[NUM_SUBKEYS - 1]
    }

    /// Returns all subkeys in round order.
    pub fn subkeys(&self) -> [u16; NUM_SUBKEYS] {
        self.subkeys
    }
}
