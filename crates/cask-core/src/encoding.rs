//! Base64-URL transcoding and the alignment math that keeps it lossless.
//!
//! Every CASK key is a whole number of 3-byte groups, so its textual form
//! is a whole number of 4-character groups and never carries `=` padding.
//! This module wraps the URL-safe unpadded engine from the `base64` crate
//! and adds the byte/char size conversions the rest of the codec relies on.

use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};

use crate::error::CaskError;

/// The URL-safe Base64 alphabet, in index order.
///
/// Index lookups into this table encode the timestamp characters; the
/// reverse lookup recovers them at parse time.
pub const BASE64_URL_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Whether `c` is a member of the URL-safe Base64 alphabet.
#[must_use]
pub const fn is_base64_url_char(c: u8) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-' || c == b'_'
}

/// Whether every character of `value` is in the URL-safe Base64 alphabet.
#[must_use]
pub fn is_base64_url(value: &str) -> bool {
    value.bytes().all(is_base64_url_char)
}

/// Position of `c` in [`BASE64_URL_ALPHABET`], if any.
#[must_use]
pub fn alphabet_index(c: u8) -> Option<u8> {
    BASE64_URL_ALPHABET
        .iter()
        .position(|&a| a == c)
        .and_then(|i| u8::try_from(i).ok())
}

/// Round `value` up to the next multiple of `multiple`.
///
/// `multiple` is 3 or 4 at every call site, never zero; sizes here are
/// bounded by the key format well below `usize::MAX`.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn round_up_to_multiple_of(value: usize, multiple: usize) -> usize {
    value.saturating_add(multiple - 1) / multiple * multiple
}

/// Round a byte count up to the next 3-byte group boundary.
#[must_use]
pub const fn round_up_to_3_byte_alignment(bytes: usize) -> usize {
    round_up_to_multiple_of(bytes, 3)
}

/// Number of unpadded Base64 characters needed to encode `bytes` bytes,
/// after rounding up to a whole 3-byte group.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn bytes_to_base64_chars(bytes: usize) -> usize {
    round_up_to_multiple_of(bytes, 3) / 3 * 4
}

/// Number of bytes produced by decoding `chars` Base64 characters, after
/// rounding up to a whole 4-character group.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn base64_chars_to_bytes(chars: usize) -> usize {
    round_up_to_multiple_of(chars, 4) / 4 * 3
}

/// Whether `byte_length` is a whole number of 3-byte groups.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn is_3_byte_aligned(byte_length: usize) -> bool {
    byte_length % 3 == 0
}

/// Whether `char_length` is a whole number of 4-character groups.
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub const fn is_4_char_aligned(char_length: usize) -> bool {
    char_length % 4 == 0
}

/// Encode `bytes` as unpadded URL-safe Base64.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode 4-character-aligned URL-safe Base64 into `dst`, returning the
/// number of bytes written.
///
/// # Errors
///
/// [`CaskError::InvalidArgument`] if the input length is not a multiple
/// of 4, a character falls outside the alphabet, or `dst` is too short
/// for the decoded bytes.
pub fn decode_into(chars: &str, dst: &mut [u8]) -> Result<usize, CaskError> {
    if !is_4_char_aligned(chars.len()) {
        return Err(CaskError::InvalidArgument(format!(
            "Base64 input length must be a multiple of 4: {}",
            chars.len()
        )));
    }
    if !is_base64_url(chars) {
        return Err(CaskError::InvalidArgument(format!(
            "input is not a valid URL-safe Base64 string: '{chars}'"
        )));
    }
    BASE64_URL_SAFE_NO_PAD
        .decode_slice(chars, dst)
        .map_err(|e| CaskError::InvalidArgument(format!("Base64 decoding failed: {e}")))
}
