//! Raw byte layout of a CASK key.
//!
//! A key of `S` secret-entropy bytes and `P` provider-data bytes is the
//! concatenation, in order:
//!
//! ```text
//! secret (S) | providerData (P) | sentinel (3) | allocatorAndTimestamp (3)
//!            | providerSignature (3) | checksum (3)
//! ```
//!
//! `S` and `P` are multiples of 3, so the total `S + P + 12` is too and
//! the textual form is unpadded. The sentinel bytes encode to `"JQQJ"`,
//! the textual marker scanners look for.

use crate::checksum::CHECKSUM_LENGTH_IN_BYTES;
use crate::encoding::bytes_to_base64_chars;

/// The fixed sentinel bytes at raw offset `S + P`.
pub const CASK_SIGNATURE: [u8; 3] = [0x25, 0x04, 0x09];

/// Textual form of [`CASK_SIGNATURE`].
pub const CASK_SIGNATURE_TEXT: &str = "JQQJ";

/// Fixed envelope overhead: sentinel, allocator/timestamp, provider
/// signature, checksum — 3 bytes each.
pub const ENVELOPE_LENGTH_IN_BYTES: usize = 12;

/// First year encodable in the single timestamp character.
pub const YEAR_ORIGIN: i32 = 2024;

/// Last encodable year: origin plus the 63 remaining alphabet indexes.
pub const YEAR_MAX: i32 = 2087;

/// Minimum secret entropy: the 3-byte round-up of 16.
pub const MIN_SECRET_ENTROPY_IN_BYTES: usize = 18;

/// Maximum secret entropy: the 3-byte round-up of 64.
pub const MAX_SECRET_ENTROPY_IN_BYTES: usize = 66;

/// Entropy used when the caller does not specify a size.
pub const DEFAULT_SECRET_ENTROPY_IN_BYTES: usize = 32;

/// Maximum provider-reserved data, in raw bytes.
pub const MAX_PROVIDER_DATA_LENGTH_IN_BYTES: usize = 24;

/// Maximum provider-reserved data, in Base64 characters.
pub const MAX_PROVIDER_DATA_LENGTH_IN_CHARS: usize =
    bytes_to_base64_chars(MAX_PROVIDER_DATA_LENGTH_IN_BYTES);

/// Allocator codes are exactly this many characters.
pub const ALLOCATOR_CODE_LENGTH_IN_CHARS: usize = 2;

/// Provider signatures are exactly this many characters.
pub const PROVIDER_SIGNATURE_LENGTH_IN_CHARS: usize = 4;

/// Shortest raw key: minimum entropy, no provider data, envelope.
pub const MIN_KEY_LENGTH_IN_BYTES: usize = MIN_SECRET_ENTROPY_IN_BYTES + ENVELOPE_LENGTH_IN_BYTES;

/// Longest raw key: maximum entropy, maximum provider data, envelope.
pub const MAX_KEY_LENGTH_IN_BYTES: usize =
    MAX_SECRET_ENTROPY_IN_BYTES + MAX_PROVIDER_DATA_LENGTH_IN_BYTES + ENVELOPE_LENGTH_IN_BYTES;

/// Shortest textual key.
pub const MIN_KEY_LENGTH_IN_CHARS: usize = bytes_to_base64_chars(MIN_KEY_LENGTH_IN_BYTES);

/// Longest textual key.
pub const MAX_KEY_LENGTH_IN_CHARS: usize = bytes_to_base64_chars(MAX_KEY_LENGTH_IN_BYTES);

/// Raw length of a key built from `secret_entropy` and
/// `provider_data_length` bytes. Both are validated multiples of 3, so
/// the sum stays far below `usize::MAX`.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn key_length_in_bytes(secret_entropy: usize, provider_data_length: usize) -> usize {
    secret_entropy + provider_data_length + ENVELOPE_LENGTH_IN_BYTES
}

/// Whether `byte_length` could be the raw length of some key: a whole
/// number of 3-byte groups within the mintable range.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn is_valid_key_length_in_bytes(byte_length: usize) -> bool {
    byte_length % 3 == 0
        && byte_length >= MIN_KEY_LENGTH_IN_BYTES
        && byte_length <= MAX_KEY_LENGTH_IN_BYTES
}

/// Whether `secret_entropy` is a legal secret size for a key of
/// `byte_length` raw bytes, leaving a legal provider-data remainder.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn is_valid_entropy_for_length(secret_entropy: usize, byte_length: usize) -> bool {
    if !is_valid_key_length_in_bytes(byte_length)
        || secret_entropy % 3 != 0
        || secret_entropy < MIN_SECRET_ENTROPY_IN_BYTES
        || secret_entropy > MAX_SECRET_ENTROPY_IN_BYTES
    {
        return false;
    }
    let variable = byte_length - ENVELOPE_LENGTH_IN_BYTES;
    secret_entropy <= variable
        && variable - secret_entropy <= MAX_PROVIDER_DATA_LENGTH_IN_BYTES
}

/// The default secret/provider-data split for a key of `byte_length`
/// raw bytes: the largest legal secret size, equivalently the smallest
/// provider-data remainder. Provider data is optional and empty in the
/// common case, so ambiguity resolves in favor of entropy.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn default_entropy_for_length(byte_length: usize) -> Option<usize> {
    if !is_valid_key_length_in_bytes(byte_length) {
        return None;
    }
    let variable = byte_length - ENVELOPE_LENGTH_IN_BYTES;
    let secret = if variable > MAX_SECRET_ENTROPY_IN_BYTES {
        MAX_SECRET_ENTROPY_IN_BYTES
    } else {
        variable
    };
    Some(secret)
}

/// Offset of the sentinel in a raw key of `byte_length` bytes.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub(crate) const fn sentinel_offset(byte_length: usize) -> usize {
    byte_length - ENVELOPE_LENGTH_IN_BYTES
}

/// Offset of the checksum in a raw key of `byte_length` bytes.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub(crate) const fn checksum_offset(byte_length: usize) -> usize {
    byte_length - CHECKSUM_LENGTH_IN_BYTES
}
