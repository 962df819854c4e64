//! Field validators for key minting.
//!
//! Each check reports a single [`CaskError::InvalidArgument`] naming the
//! field and the offending value. Minting runs all of them before any
//! buffer is touched.

use crate::encoding::{is_4_char_aligned, is_base64_url};
use crate::error::CaskError;
use crate::layout::{
    ALLOCATOR_CODE_LENGTH_IN_CHARS, MAX_PROVIDER_DATA_LENGTH_IN_CHARS,
    MAX_SECRET_ENTROPY_IN_BYTES, MIN_SECRET_ENTROPY_IN_BYTES, PROVIDER_SIGNATURE_LENGTH_IN_CHARS,
};

/// Check an allocator code: exactly 2 URL-safe Base64 characters.
pub fn validate_allocator_code(allocator_code: &str) -> Result<(), CaskError> {
    if allocator_code.len() != ALLOCATOR_CODE_LENGTH_IN_CHARS {
        return Err(CaskError::InvalidArgument(format!(
            "Allocator code must be {ALLOCATOR_CODE_LENGTH_IN_CHARS} characters long: '{allocator_code}'."
        )));
    }
    if !is_base64_url(allocator_code) {
        return Err(CaskError::InvalidArgument(format!(
            "Allocator code must be a valid URL-safe Base64 string: '{allocator_code}'."
        )));
    }
    Ok(())
}

/// Check a provider signature: exactly 4 URL-safe Base64 characters.
pub fn validate_provider_signature(provider_signature: &str) -> Result<(), CaskError> {
    if provider_signature.len() != PROVIDER_SIGNATURE_LENGTH_IN_CHARS {
        return Err(CaskError::InvalidArgument(format!(
            "Provider signature must be {PROVIDER_SIGNATURE_LENGTH_IN_CHARS} characters long: '{provider_signature}'."
        )));
    }
    if !is_base64_url(provider_signature) {
        return Err(CaskError::InvalidArgument(format!(
            "Provider signature must be a valid URL-safe Base64 string: '{provider_signature}'."
        )));
    }
    Ok(())
}

/// Check provider data: at most 32 characters, a whole number of
/// 4-character groups, all from the URL-safe Base64 alphabet.
pub fn validate_provider_data(provider_data: &str) -> Result<(), CaskError> {
    if provider_data.len() > MAX_PROVIDER_DATA_LENGTH_IN_CHARS {
        return Err(CaskError::InvalidArgument(format!(
            "Provider data must be at most {MAX_PROVIDER_DATA_LENGTH_IN_CHARS} characters: '{}'.",
            provider_data.len()
        )));
    }
    if !is_4_char_aligned(provider_data.len()) {
        return Err(CaskError::InvalidArgument(format!(
            "Provider data length must be a multiple of 4: {}",
            provider_data.len()
        )));
    }
    if !is_base64_url(provider_data) {
        return Err(CaskError::InvalidArgument(format!(
            "Provider data must be a valid URL-safe Base64 string: '{provider_data}'."
        )));
    }
    Ok(())
}

/// Check a secret entropy size, after 3-byte round-up.
pub fn validate_secret_entropy(secret_entropy_in_bytes: usize) -> Result<(), CaskError> {
    if !(MIN_SECRET_ENTROPY_IN_BYTES..=MAX_SECRET_ENTROPY_IN_BYTES)
        .contains(&secret_entropy_in_bytes)
    {
        return Err(CaskError::InvalidArgument(format!(
            "Secret entropy must be between {MIN_SECRET_ENTROPY_IN_BYTES} and {MAX_SECRET_ENTROPY_IN_BYTES} bytes: {secret_entropy_in_bytes}."
        )));
    }
    Ok(())
}
