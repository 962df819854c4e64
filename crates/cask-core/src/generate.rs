//! Key minting.
//!
//! [`generate_key`] assembles the raw layout — CSPRNG entropy, decoded
//! provider data, sentinel, allocator/timestamp, provider signature,
//! checksum — then transcodes the whole buffer to its textual form in
//! the caller's output. The required output size is a pure function of
//! the validated inputs and is checked before any side effect.

use zeroize::Zeroizing;

use crate::checksum::checksum_bytes;
use crate::encoding::{
    self, base64_chars_to_bytes, bytes_to_base64_chars, round_up_to_3_byte_alignment,
    BASE64_URL_ALPHABET,
};
use crate::error::CaskError;
use crate::layout::{
    checksum_offset, key_length_in_bytes, sentinel_offset, CASK_SIGNATURE, YEAR_MAX, YEAR_ORIGIN,
};
use crate::platform::{OsRandom, RandomSource, SystemClock, UtcClock};
use crate::validate::{
    validate_allocator_code, validate_provider_data, validate_provider_signature,
    validate_secret_entropy,
};

/// Textual length of the key that [`generate_key`] would mint from
/// these inputs, so callers can allocate exactly.
///
/// # Errors
///
/// [`CaskError::InvalidArgument`] under the same field rules as
/// [`generate_key`].
pub fn required_key_length(
    secret_entropy_in_bytes: usize,
    provider_data: &str,
) -> Result<usize, CaskError> {
    let secret_length = round_up_to_3_byte_alignment(secret_entropy_in_bytes);
    validate_provider_data(provider_data)?;
    validate_secret_entropy(secret_length)?;
    let provider_data_length = base64_chars_to_bytes(provider_data.len());
    Ok(bytes_to_base64_chars(key_length_in_bytes(
        secret_length,
        provider_data_length,
    )))
}

/// Mint a CASK key with the platform CSPRNG and system UTC clock,
/// writing its textual form into `out` and returning the written length.
///
/// `secret_entropy_in_bytes` is rounded up to a whole 3-byte group;
/// pass [`DEFAULT_SECRET_ENTROPY_IN_BYTES`] when in doubt.
///
/// # Errors
///
/// - [`CaskError::InvalidArgument`] — a field failed validation (§ field
///   rules: allocator 2 chars, signature 4 chars, provider data ≤ 32
///   chars in whole 4-char groups, entropy in `[18, 66]` after round-up)
/// - [`CaskError::BufferTooSmall`] — `out` cannot hold the key
/// - [`CaskError::RandomnessUnavailable`] — the CSPRNG failed
/// - [`CaskError::TimestampOutOfRange`] — the UTC year is outside
///   `[2024, 2087]`
///
/// On any error `out` is untouched.
///
/// [`DEFAULT_SECRET_ENTROPY_IN_BYTES`]: crate::layout::DEFAULT_SECRET_ENTROPY_IN_BYTES
pub fn generate_key(
    allocator_code: &str,
    provider_signature: &str,
    provider_data: &str,
    secret_entropy_in_bytes: usize,
    out: &mut [u8],
) -> Result<usize, CaskError> {
    generate_key_with(
        &mut OsRandom,
        &SystemClock,
        allocator_code,
        provider_signature,
        provider_data,
        secret_entropy_in_bytes,
        out,
    )
}

/// Mint a CASK key with caller-supplied randomness and clock
/// capabilities. See [`generate_key`].
///
/// # Errors
///
/// As [`generate_key`].
// Offsets below are sums of validated field sizes, at most 102.
#[allow(clippy::arithmetic_side_effects)]
pub fn generate_key_with<R, C>(
    rng: &mut R,
    clock: &C,
    allocator_code: &str,
    provider_signature: &str,
    provider_data: &str,
    secret_entropy_in_bytes: usize,
    out: &mut [u8],
) -> Result<usize, CaskError>
where
    R: RandomSource,
    C: UtcClock,
{
    let secret_length = round_up_to_3_byte_alignment(secret_entropy_in_bytes);

    validate_provider_signature(provider_signature)?;
    validate_allocator_code(allocator_code)?;
    validate_provider_data(provider_data)?;
    validate_secret_entropy(secret_length)?;

    let provider_data_length = base64_chars_to_bytes(provider_data.len());
    let key_length = key_length_in_bytes(secret_length, provider_data_length);
    let output_length = bytes_to_base64_chars(key_length);

    if out.len() < output_length {
        return Err(CaskError::BufferTooSmall {
            required: output_length,
            provided: out.len(),
        });
    }

    let (year, month) = clock.utc_year_month();
    if !(YEAR_ORIGIN..=YEAR_MAX).contains(&year) {
        return Err(CaskError::TimestampOutOfRange(year));
    }
    if !(1..=12).contains(&month) {
        return Err(CaskError::InvalidArgument(format!(
            "UTC month must be between 1 and 12: {month}."
        )));
    }

    let mut key_bytes = Zeroizing::new(vec![0u8; key_length]);

    rng.fill(&mut key_bytes[..secret_length])?;

    let provider_data_end = secret_length + provider_data_length;
    let written = encoding::decode_into(provider_data, &mut key_bytes[secret_length..provider_data_end])?;
    debug_assert_eq!(written, provider_data_length);

    let sentinel = sentinel_offset(key_length);
    key_bytes[sentinel..sentinel + 3].copy_from_slice(&CASK_SIGNATURE);

    // Range checks above guarantee both indexes land in the 64-entry
    // alphabet.
    let year_index = (year - YEAR_ORIGIN).unsigned_abs() as usize;
    let month_index = (month - 1) as usize;
    let allocator = allocator_code.as_bytes();
    let allocator_and_timestamp = [
        allocator[0],
        allocator[1],
        BASE64_URL_ALPHABET[year_index],
        BASE64_URL_ALPHABET[month_index],
    ];
    // All four bytes come from the ASCII alphabet.
    let timestamp_text = core::str::from_utf8(&allocator_and_timestamp).map_err(|_| {
        CaskError::InvalidArgument("allocator/timestamp characters are not ASCII".into())
    })?;
    let written = encoding::decode_into(timestamp_text, &mut key_bytes[sentinel + 3..sentinel + 6])?;
    debug_assert_eq!(written, 3);

    let written =
        encoding::decode_into(provider_signature, &mut key_bytes[sentinel + 6..sentinel + 9])?;
    debug_assert_eq!(written, 3);

    let checksum_start = checksum_offset(key_length);
    let checksum = checksum_bytes(&key_bytes[..checksum_start]);
    key_bytes[checksum_start..].copy_from_slice(&checksum);

    let text = encoding::encode(&key_bytes);
    debug_assert_eq!(text.len(), output_length);
    out[..output_length].copy_from_slice(text.as_bytes());

    Ok(output_length)
}

/// Allocating convenience wrapper around [`generate_key`].
///
/// # Errors
///
/// As [`generate_key`], except `BufferTooSmall` cannot occur.
pub fn generate_key_string(
    allocator_code: &str,
    provider_signature: &str,
    provider_data: &str,
    secret_entropy_in_bytes: usize,
) -> Result<String, CaskError> {
    let required = required_key_length(secret_entropy_in_bytes, provider_data)?;
    let mut out = vec![0u8; required];
    let written = generate_key(
        allocator_code,
        provider_signature,
        provider_data,
        secret_entropy_in_bytes,
        &mut out,
    )?;
    out.truncate(written);
    String::from_utf8(out)
        .map_err(|_| CaskError::InvalidArgument("generated key is not ASCII".into()))
}
