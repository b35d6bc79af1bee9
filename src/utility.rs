//! A collection of utility functions used throughout the library.

use std::io::{self, Write};

/// Calculates the modulo 2 sum of the bits in the input. Taken from
/// [here](http://www.graphics.stanford.edu/~seander/bithacks.html#ParityMultiply).
pub fn parity(input: u32) -> u32 {
    let mut y = input;

    y ^= y >> 1;
    y ^= y >> 2;
    y = (y & 0x1111_1111).wrapping_mul(0x1111_1111);
    (y >> 28) & 1
}

/// Finds the parity of `<input, alpha> ^ <output, beta>`, where `<_,_>` is the
/// inner product over GF(2).
pub fn parity_masks(input: u16, output: u16, alpha: u16, beta: u16) -> u32 {
    parity(u32::from(input & alpha) | (u32::from(output & beta) << 16))
}

/// A struct representing a progress bar for progress printing on the command line.
pub struct ProgressBar {
    current_items: f64,
    item_size: f64,
    used: bool,
}

impl ProgressBar {
    /// Creates a new progress for tracking progress of `num_items` steps.
    pub fn new(num_items: usize) -> ProgressBar {
        let item_size = 100.0 / (num_items as f64);

        ProgressBar {
            current_items: 0.0,
            item_size,
            used: false,
        }
    }

    /// Increment the current progress of the bar. The progress bar prints if
    /// a new step was reached.
    #[inline(always)]
    pub fn increment(&mut self) {
        self.current_items += self.item_size;

        while self.current_items >= 1.0 {
            print!("=");
            io::stdout().flush().expect("Could not flush stdout");
            self.current_items -= 1.0;
        }

        self.used = true;
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        if self.used {
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_known_values() {
        assert_eq!(parity(0), 0);
        assert_eq!(parity(1), 1);
        assert_eq!(parity(0b1011), 1);
        assert_eq!(parity(0xffff), 0);
        assert_eq!(parity(0xffff_fffe), 1);
    }

    #[test]
    fn parity_matches_popcount() {
        for x in (0..0x1_0000u32).step_by(7) {
            assert_eq!(parity(x), x.count_ones() & 1);
        }
    }

    #[test]
    fn parity_masks_matches_separate_parities() {
        for &(input, output, alpha, beta) in &[
            (0x1234u16, 0xabcdu16, 0x0f0fu16, 0xf0f0u16),
            (0xffff, 0x0000, 0xffff, 0xffff),
            (0x0001, 0x8000, 0x0001, 0x8000),
        ] {
            let expected = parity(u32::from(input & alpha)) ^ parity(u32::from(output & beta));
            assert_eq!(parity_masks(input, output, alpha, beta), expected);
        }
    }
}
