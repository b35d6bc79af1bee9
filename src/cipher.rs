//! The 4-round substitution-permutation network under attack.

use crate::key::KeyMaterial;
use crate::permutation::BitPermutation;
use crate::sbox::Sbox;

/// The block size of the cipher in bits.
pub const BLOCK_SIZE: usize = 16;

/// The number of rounds of the cipher.
pub const ROUNDS: usize = 4;

/// The basic SPN cipher from Heys' tutorial on linear and differential
/// cryptanalysis: a 16-bit block, 4 rounds, one 4-bit S-box applied to all
/// four nibbles, and a bitwise transposition between rounds.
///
/// The final round deliberately omits the permutation and instead mixes in
/// a fifth subkey after the substitution layer, exposing the last round's
/// S-box outputs directly to the final key XOR. The attack in
/// [`crate::attack`] exploits exactly this.
#[derive(Clone, Debug)]
pub struct Spn {
    sbox: Sbox,
    pbox: BitPermutation,
}

impl Spn {
    const SBOX: [u8; 16] = [
        0xe, 0x4, 0xd, 0x1, 0x2, 0xf, 0xb, 0x8, 0x3, 0xa, 0x6, 0xc, 0x5, 0x9, 0x0, 0x7,
    ];

    const PBOX: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];

    /// Create a new instance of the cipher.
    pub fn new() -> Spn {
        Spn {
            sbox: Sbox::new(Spn::SBOX),
            pbox: BitPermutation::new(Spn::PBOX),
        }
    }

    /// Returns the S-box of the cipher.
    pub fn sbox(&self) -> &Sbox {
        &self.sbox
    }

    /// Returns the bit permutation of the cipher.
    pub fn pbox(&self) -> &BitPermutation {
        &self.pbox
    }

    /// Encrypts a 16-bit block.
    pub fn encrypt(&self, plaintext: u16, key: &KeyMaterial) -> u16 {
        let mut state = plaintext;

        for round in 0..ROUNDS - 1 {
            state ^= key.subkey(round);
            state = self.sbox.apply_to_state(state);
            state = self.pbox.apply(state);
        }

        // Final round: key mixing and substitution only.
        state ^= key.subkey(ROUNDS - 1);
        state = self.sbox.apply_to_state(state);
        state ^ key.last()
    }

    /// Decrypts a 16-bit block.
    pub fn decrypt(&self, ciphertext: u16, key: &KeyMaterial) -> u16 {
        let mut state = ciphertext ^ key.last();
        state = self.sbox.apply_inv_to_state(state);

        for round in (1..ROUNDS).rev() {
            state ^= key.subkey(round);
            state = self.pbox.apply_inv(state);
            state = self.sbox.apply_inv_to_state(state);
        }

        state ^ key.subkey(0)
    }
}

impl Default for Spn {
    fn default() -> Spn {
        Spn::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn fixed_key() -> KeyMaterial {
        KeyMaterial::from_subkeys(&[0x1a2b, 0x3c4d, 0x5e6f, 0x7081, 0x0204]).unwrap()
    }

    #[test]
    fn encryption_test() {
        // Test vectors computed with an independent implementation.
        let cipher = Spn::new();
        let key = fixed_key();

        assert_eq!(cipher.encrypt(0x0000, &key), 0x4bf3);
        assert_eq!(cipher.encrypt(0x1234, &key), 0xa40c);
        assert_eq!(cipher.encrypt(0xffff, &key), 0x1201);
        assert_eq!(cipher.encrypt(0xabcd, &key), 0x8d62);
    }

    #[test]
    fn decryption_test() {
        let cipher = Spn::new();
        let key = fixed_key();

        assert_eq!(cipher.decrypt(0x4bf3, &key), 0x0000);
        assert_eq!(cipher.decrypt(0xa40c, &key), 0x1234);
        assert_eq!(cipher.decrypt(0x1201, &key), 0xffff);
        assert_eq!(cipher.decrypt(0x8d62, &key), 0xabcd);
    }

    #[test]
    fn exhaustive_round_trip() {
        let cipher = Spn::new();
        let key = fixed_key();

        for plaintext in 0..=0xffffu16 {
            let ciphertext = cipher.encrypt(plaintext, &key);
            assert_eq!(cipher.decrypt(ciphertext, &key), plaintext);
        }
    }

    #[test]
    fn encryption_is_a_permutation_of_the_block_space() {
        let cipher = Spn::new();
        let key = fixed_key();
        let mut seen = vec![false; 1 << BLOCK_SIZE];

        for plaintext in 0..=0xffffu16 {
            let ciphertext = cipher.encrypt(plaintext, &key) as usize;
            assert!(!seen[ciphertext]);
            seen[ciphertext] = true;
        }
    }

    #[quickcheck]
    fn round_trip_with_random_keys(plaintext: u16, subkeys: (u16, u16, u16, u16, u16)) -> bool {
        let cipher = Spn::new();
        let (k1, k2, k3, k4, k5) = subkeys;
        let key = KeyMaterial::from_subkeys(&[k1, k2, k3, k4, k5]).unwrap();

        cipher.decrypt(cipher.encrypt(plaintext, &key), &key) == plaintext
    }
}
