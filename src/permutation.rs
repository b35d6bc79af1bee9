//! Bit-position permutation over the 16-bit state.

use crate::cipher::BLOCK_SIZE;

/// A bijective mapping of bit positions: bit `i` of the input lands in bit
/// `table[i]` of the output.
///
/// The true positional inverse is computed at construction and used for
/// un-permuting. For the permutation of this cipher the table happens to be
/// an involution, so the inverse coincides with the forward table; relying
/// on that coincidence is avoided so a non-involutive table would also
/// decrypt correctly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPermutation {
    table: [usize; BLOCK_SIZE],
    inverse: [usize; BLOCK_SIZE],
}

impl BitPermutation {
    /// Creates a new permutation from its table description.
    ///
    /// # Panics
    /// The function panics if `table` is not a bijection on the bit
    /// positions 0..16.
    pub fn new(table: [usize; BLOCK_SIZE]) -> BitPermutation {
        let mut inverse = [0; BLOCK_SIZE];
        let mut seen = [false; BLOCK_SIZE];

        for (i, &j) in table.iter().enumerate() {
            assert!(j < BLOCK_SIZE, "permutation target out of range: {}", j);
            assert!(!seen[j], "permutation table is not a bijection");
            seen[j] = true;
            inverse[j] = i;
        }

        BitPermutation { table, inverse }
    }

    /// Applies the permutation to the input state.
    pub fn apply(&self, state: u16) -> u16 {
        let mut output = 0;

        for (i, &j) in self.table.iter().enumerate() {
            if state & (1 << i) != 0 {
                output |= 1 << j;
            }
        }

        output
    }

    /// Applies the inverse permutation to the input state.
    pub fn apply_inv(&self, state: u16) -> u16 {
        let mut output = 0;

        for (i, &j) in self.inverse.iter().enumerate() {
            if state & (1 << i) != 0 {
                output |= 1 << j;
            }
        }

        output
    }

    /// Returns true if the permutation is its own inverse.
    pub fn is_involution(&self) -> bool {
        self.table == self.inverse
    }
}
