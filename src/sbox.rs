//! Type representing an S-box.

use crate::utility::parity_masks;

/// The size of the S-box in bits.
pub const SBOX_SIZE: usize = 4;

/// The number of entries in the S-box table, i.e. 2<sup>`SBOX_SIZE`</sup>.
pub const SBOX_VALUES: usize = 1 << SBOX_SIZE;

/// A structure that represents a bijective 4-bit S-box.
///
/// The inverse table and the linear approximation table (LAT) are derived
/// from the forward table at construction time, so the two tables cannot
/// silently diverge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sbox {
    table: [u8; SBOX_VALUES],
    inverse: [u8; SBOX_VALUES],
    lat: [[usize; SBOX_VALUES]; SBOX_VALUES],
}

impl Sbox {
    /// Creates a new S-box from its table description.
    ///
    /// # Panics
    /// The function panics if `table` is not a bijection on the nibble
    /// values 0..16.
    pub fn new(table: [u8; SBOX_VALUES]) -> Sbox {
        let mut inverse = [0; SBOX_VALUES];
        let mut seen = [false; SBOX_VALUES];

        for (x, &y) in table.iter().enumerate() {
            let y = y as usize;
            assert!(y < SBOX_VALUES, "S-box entry out of range: {:#x}", y);
            assert!(!seen[y], "S-box table is not a bijection");
            seen[y] = true;
            inverse[y] = x as u8;
        }

        let lat = Sbox::generate_lat(&table);

        Sbox {
            table,
            inverse,
            lat,
        }
    }

    /// Generates the LAT associated with the S-box.
    ///
    /// `lat[alpha][beta]` counts, over all 16 table entries, how often the
    /// parity of the input bits selected by `alpha` agrees with the parity
    /// of the output bits selected by `beta`.
    fn generate_lat(table: &[u8; SBOX_VALUES]) -> [[usize; SBOX_VALUES]; SBOX_VALUES] {
        let mut lat = [[0; SBOX_VALUES]; SBOX_VALUES];

        for (plaintext, &ciphertext) in table.iter().enumerate() {
            for alpha in 0..SBOX_VALUES {
                for beta in 0..SBOX_VALUES {
                    let parity = parity_masks(
                        plaintext as u16,
                        u16::from(ciphertext),
                        alpha as u16,
                        beta as u16,
                    );

                    lat[alpha][beta] += (1 - parity) as usize;
                }
            }
        }

        lat
    }

    /// Applies the S-box to a nibble.
    #[inline(always)]
    pub fn apply(&self, x: u8) -> u8 {
        debug_assert!((x as usize) < SBOX_VALUES);
        self.table[x as usize]
    }

    /// Applies the inverse S-box to a nibble.
    #[inline(always)]
    pub fn apply_inv(&self, x: u8) -> u8 {
        debug_assert!((x as usize) < SBOX_VALUES);
        self.inverse[x as usize]
    }

    /// Applies the S-box to each nibble of a 16-bit state, least
    /// significant nibble first, preserving nibble order.
    pub fn apply_to_state(&self, state: u16) -> u16 {
        let mut output = 0;

        for i in 0..4 {
            let nibble = ((state >> (SBOX_SIZE * i)) & 0xf) as u8;
            output |= u16::from(self.apply(nibble)) << (SBOX_SIZE * i);
        }

        output
    }

    /// Applies the inverse S-box to each nibble of a 16-bit state.
    pub fn apply_inv_to_state(&self, state: u16) -> u16 {
        let mut output = 0;

        for i in 0..4 {
            let nibble = ((state >> (SBOX_SIZE * i)) & 0xf) as u8;
            output |= u16::from(self.apply_inv(nibble)) << (SBOX_SIZE * i);
        }

        output
    }

    /// Returns the value of a balanced linear approximation of the S-box.
    pub fn linear_balance(&self) -> i16 {
        (SBOX_VALUES / 2) as i16
    }

    /// Returns the bias of the linear approximation `(alpha, beta)`, i.e.
    /// the LAT entry minus half the number of table entries.
    pub fn bias(&self, alpha: usize, beta: usize) -> i16 {
        self.lat[alpha][beta] as i16 - self.linear_balance()
    }

    /// Returns a reference to the LAT of the S-box.
    pub fn lat(&self) -> &[[usize; SBOX_VALUES]; SBOX_VALUES] {
        &self.lat
    }
}
