//! A miniature substitution-permutation network and a known-plaintext
//! linear cryptanalysis attack against it.
//!
//! The cipher operates on 16-bit blocks over 4 rounds and follows the
//! tutorial construction by Howard M. Heys. It is deliberately weak: the
//! point of the crate is the attack in the [`attack`] module, which recovers
//! 8 bits of the last round key from a corpus of plaintext/ciphertext pairs
//! by measuring the bias of a 3-round linear approximation.

pub mod attack;
pub mod cipher;
pub mod corpus;
pub mod error;
pub mod key;
pub mod options;
pub mod permutation;
pub mod sbox;
pub mod utility;
