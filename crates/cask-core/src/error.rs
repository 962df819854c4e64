//! Error types for the CASK codec.

use thiserror::Error;

/// Errors produced when minting keys or deriving hashes.
///
/// Recognition entry points ([`is_cask`], [`is_cask_bytes`],
/// [`compare_hash`]) never surface these: they absorb every failure
/// mode and return `false`. Minting refuses bad inputs; recognising
/// must never fail on adversarial input.
///
/// [`is_cask`]: crate::parse::is_cask
/// [`is_cask_bytes`]: crate::parse::is_cask_bytes
/// [`compare_hash`]: crate::hash::compare_hash
#[derive(Debug, Error)]
pub enum CaskError {
    /// A field failed a shape or range check, or a non-alphabet
    /// character was encountered while decoding.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller's output buffer cannot hold the required length.
    ///
    /// The required length is a pure function of the validated inputs,
    /// so this is reported before any side effect.
    #[error("output buffer too small: {required} bytes required, {provided} provided")]
    BufferTooSmall {
        /// Bytes the operation needs to write.
        required: usize,
        /// Bytes the caller supplied.
        provided: usize,
    },

    /// The platform CSPRNG reported failure.
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// The clock returned a year outside the encodable range.
    #[error("CASK requires the current year to be between 2024 and 2087, got {0}")]
    TimestampOutOfRange(i32),
}
