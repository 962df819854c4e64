//! Key recognition and field extraction.
//!
//! Recognition ([`is_cask`], [`is_cask_bytes`]) is total: every failure
//! mode on adversarial input collapses to `false`. Parsing returns a
//! [`CaskKey`] whose accessors borrow from the decoded buffer.
//!
//! The raw layout does not record where the secret ends and the
//! provider data begins; the checksum covers the whole body either way.
//! Callers that know the secret entropy pass it explicitly
//! ([`parse_key_with_entropy`]); otherwise the split defaults to the
//! largest legal secret, which matches the common empty-provider-data
//! case.

use core::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::checksum::checksum_bytes;
use crate::encoding::{
    self, alphabet_index, base64_chars_to_bytes, is_4_char_aligned, is_base64_url,
    round_up_to_3_byte_alignment,
};
use crate::error::CaskError;
use crate::layout::{
    checksum_offset, default_entropy_for_length, is_valid_entropy_for_length,
    is_valid_key_length_in_bytes, sentinel_offset, CASK_SIGNATURE, MAX_KEY_LENGTH_IN_CHARS,
    MIN_KEY_LENGTH_IN_CHARS, YEAR_ORIGIN,
};

/// Highest alphabet index that names a month (December).
const MAX_MONTH_INDEX: u8 = 11;

/// Decode a textual candidate into raw bytes, or `None` when the
/// length class or alphabet already rules it out.
fn decode_candidate(candidate: &str) -> Option<Vec<u8>> {
    let char_length = candidate.len();
    if !is_4_char_aligned(char_length)
        || !(MIN_KEY_LENGTH_IN_CHARS..=MAX_KEY_LENGTH_IN_CHARS).contains(&char_length)
        || !is_base64_url(candidate)
    {
        return None;
    }
    let byte_length = base64_chars_to_bytes(char_length);
    let mut raw = vec![0u8; byte_length];
    match encoding::decode_into(candidate, &mut raw) {
        Ok(written) if written == byte_length => Some(raw),
        _ => None,
    }
}

/// Envelope checks shared by the textual and byte-oriented paths:
/// length class, sentinel, month range, checksum.
// Offsets are derived from a length already validated against the
// layout bounds.
#[allow(clippy::arithmetic_side_effects)]
fn has_valid_envelope(raw: &[u8]) -> bool {
    let byte_length = raw.len();
    if !is_valid_key_length_in_bytes(byte_length) {
        return false;
    }

    let sentinel = sentinel_offset(byte_length);
    if raw[sentinel..sentinel + 3] != CASK_SIGNATURE {
        return false;
    }

    // The 6-bit year index always lands in [2024, 2087]; only the month
    // can decode out of range.
    let timestamp = encoding::encode(&raw[sentinel + 3..sentinel + 6]);
    match alphabet_index(timestamp.as_bytes()[3]) {
        Some(index) if index <= MAX_MONTH_INDEX => {}
        _ => return false,
    }

    let checksum_start = checksum_offset(byte_length);
    raw[checksum_start..] == checksum_bytes(&raw[..checksum_start])
}

/// Whether `candidate` is a well-formed textual CASK key or hash.
///
/// Never fails: malformed input of any kind returns `false`.
#[must_use]
pub fn is_cask(candidate: &str) -> bool {
    decode_candidate(candidate).is_some_and(|raw| has_valid_envelope(&raw))
}

/// Whether `candidate` is the raw-bytes form of a CASK key or hash.
///
/// Never fails: malformed input of any kind returns `false`.
#[must_use]
pub fn is_cask_bytes(candidate: &[u8]) -> bool {
    has_valid_envelope(candidate)
}

/// Parse a textual CASK key, splitting secret from provider data at
/// the default position (largest legal secret).
///
/// # Errors
///
/// [`CaskError::InvalidArgument`] when `candidate` is not a well-formed
/// key.
pub fn parse_key(candidate: &str) -> Result<CaskKey, CaskError> {
    let raw = decode_candidate(candidate)
        .filter(|raw| has_valid_envelope(raw))
        .ok_or_else(|| {
            CaskError::InvalidArgument("Candidate is not a well-formed CASK key.".into())
        })?;
    CaskKey::from_raw(raw, None)
}

/// Parse a textual CASK key whose secret entropy the caller knows.
///
/// `secret_entropy_in_bytes` is rounded up to a whole 3-byte group,
/// exactly as minting rounds it.
///
/// # Errors
///
/// [`CaskError::InvalidArgument`] when `candidate` is not a well-formed
/// key or the entropy does not yield a legal split for its length.
pub fn parse_key_with_entropy(
    candidate: &str,
    secret_entropy_in_bytes: usize,
) -> Result<CaskKey, CaskError> {
    let raw = decode_candidate(candidate)
        .filter(|raw| has_valid_envelope(raw))
        .ok_or_else(|| {
            CaskError::InvalidArgument("Candidate is not a well-formed CASK key.".into())
        })?;
    CaskKey::from_raw(raw, Some(secret_entropy_in_bytes))
}

/// A parsed CASK key: the raw bytes plus the secret/provider-data
/// split. The buffer is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CaskKey {
    raw: Vec<u8>,
    #[zeroize(skip)]
    secret_length: usize,
}

impl CaskKey {
    /// Parse the raw-bytes form of a key, default split.
    ///
    /// # Errors
    ///
    /// [`CaskError::InvalidArgument`] when `candidate` is not a
    /// well-formed raw key.
    pub fn from_bytes(candidate: &[u8]) -> Result<Self, CaskError> {
        if !has_valid_envelope(candidate) {
            return Err(CaskError::InvalidArgument(
                "Candidate is not a well-formed CASK key.".into(),
            ));
        }
        Self::from_raw(candidate.to_vec(), None)
    }

    /// Parse the raw-bytes form of a key with a known secret entropy.
    ///
    /// # Errors
    ///
    /// As [`parse_key_with_entropy`].
    pub fn from_bytes_with_entropy(
        candidate: &[u8],
        secret_entropy_in_bytes: usize,
    ) -> Result<Self, CaskError> {
        if !has_valid_envelope(candidate) {
            return Err(CaskError::InvalidArgument(
                "Candidate is not a well-formed CASK key.".into(),
            ));
        }
        Self::from_raw(candidate.to_vec(), Some(secret_entropy_in_bytes))
    }

    /// `raw` has already passed the envelope checks.
    fn from_raw(raw: Vec<u8>, secret_entropy_in_bytes: Option<usize>) -> Result<Self, CaskError> {
        let secret_length = match secret_entropy_in_bytes {
            Some(requested) => {
                let rounded = round_up_to_3_byte_alignment(requested);
                if !is_valid_entropy_for_length(rounded, raw.len()) {
                    return Err(CaskError::InvalidArgument(format!(
                        "Secret entropy of {requested} bytes is not consistent with a {}-byte key.",
                        raw.len()
                    )));
                }
                rounded
            }
            None => default_entropy_for_length(raw.len()).ok_or_else(|| {
                CaskError::InvalidArgument("Candidate is not a well-formed CASK key.".into())
            })?,
        };
        Ok(Self { raw, secret_length })
    }

    /// The CSPRNG-derived entropy bytes.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.raw[..self.secret_length]
    }

    /// The secret length this key was split at.
    #[must_use]
    pub const fn secret_entropy_in_bytes(&self) -> usize {
        self.secret_length
    }

    /// Provider-reserved bytes, raw.
    #[must_use]
    pub fn provider_data_bytes(&self) -> &[u8] {
        &self.raw[self.secret_length..sentinel_offset(self.raw.len())]
    }

    /// Provider-reserved data re-encoded to its original characters.
    #[must_use]
    pub fn provider_data(&self) -> String {
        encoding::encode(self.provider_data_bytes())
    }

    /// The 2-character allocator code.
    #[must_use]
    pub fn allocator_code(&self) -> String {
        let mut chars = self.timestamp_chars();
        chars.truncate(2);
        chars
    }

    /// UTC year of generation.
    #[must_use]
    pub fn year(&self) -> i32 {
        let chars = self.timestamp_chars();
        // Envelope validation pinned every character to the alphabet.
        let index = alphabet_index(chars.as_bytes()[2]).unwrap_or_default();
        YEAR_ORIGIN.saturating_add(i32::from(index))
    }

    /// UTC month of generation, in `[1, 12]`.
    #[must_use]
    pub fn month(&self) -> u32 {
        let chars = self.timestamp_chars();
        let index = alphabet_index(chars.as_bytes()[3]).unwrap_or_default();
        u32::from(index).saturating_add(1)
    }

    /// The 4-character provider signature.
    // Envelope offsets are in bounds for any validated length.
    #[allow(clippy::arithmetic_side_effects)]
    #[must_use]
    pub fn provider_signature(&self) -> String {
        let sentinel = sentinel_offset(self.raw.len());
        encoding::encode(&self.raw[sentinel + 6..sentinel + 9])
    }

    /// The three stored checksum bytes.
    // Envelope offsets are in bounds for any validated length.
    #[allow(clippy::arithmetic_side_effects)]
    #[must_use]
    pub fn checksum(&self) -> [u8; 3] {
        let start = checksum_offset(self.raw.len());
        [self.raw[start], self.raw[start + 1], self.raw[start + 2]]
    }

    /// The raw byte form.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Re-encode the textual form.
    #[must_use]
    pub fn to_text(&self) -> String {
        encoding::encode(&self.raw)
    }

    /// The non-secret fields as an owned, serializable value.
    #[must_use]
    pub fn metadata(&self) -> KeyMetadata {
        KeyMetadata {
            allocator_code: self.allocator_code(),
            provider_signature: self.provider_signature(),
            provider_data: self.provider_data(),
            year: self.year(),
            month: self.month(),
        }
    }

    /// The 4-character allocator/timestamp group.
    // Envelope offsets are in bounds for any validated length.
    #[allow(clippy::arithmetic_side_effects)]
    fn timestamp_chars(&self) -> String {
        let sentinel = sentinel_offset(self.raw.len());
        encoding::encode(&self.raw[sentinel + 3..sentinel + 6])
    }
}

impl fmt::Debug for CaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaskKey")
            .field("allocator_code", &self.allocator_code())
            .field("provider_signature", &self.provider_signature())
            .field("year", &self.year())
            .field("month", &self.month())
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// The self-describing, non-secret fields of a parsed key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetadata {
    /// 2-character identifier of the issuing party.
    pub allocator_code: String,
    /// 4-character identifier of the credential provider.
    pub provider_signature: String,
    /// Provider-reserved data in its original textual form.
    pub provider_data: String,
    /// UTC year of generation.
    pub year: i32,
    /// UTC month of generation, in `[1, 12]`.
    pub month: u32,
}
