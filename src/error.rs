//! Error kinds of the cipher and attack core.

use thiserror::Error;

use crate::key::NUM_SUBKEYS;

/// Errors raised by the cipher core and the recovery engine. All of these
/// are deterministic and non-retryable: there is no transient failure mode
/// in a pure computation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A block value does not fit in the 16-bit state.
    #[error("block value {0:#x} does not fit in a 16-bit state")]
    InvalidBlockSize(u32),

    /// Key material does not consist of exactly five 16-bit subkeys.
    #[error("key material must consist of exactly {NUM_SUBKEYS} 16-bit subkeys")]
    InvalidKeyMaterial,

    /// The entropy source failed or provided an insufficient seed.
    #[error("entropy source unavailable or seed shorter than 128 bits")]
    EntropyUnavailable,

    /// The recovery engine was invoked with zero samples, for which the
    /// deviation score is undefined.
    #[error("sample set is empty, deviation scores are undefined")]
    EmptySampleSet,
}
