//! Derivation hashes.
//!
//! [`generate_hash`] turns caller-supplied input bytes into a textual
//! artifact with the same shape as the stored key it derives from: the
//! envelope — provider data, sentinel, allocator/timestamp, provider
//! signature — is copied, the entropy is replaced by a keyed MAC of the
//! input under the key's entropy bytes, and the checksum is recomputed
//! so the hash itself satisfies [`is_cask`].
//!
//! [`compare_hash`] recomputes the expected hash and compares in
//! constant time over the candidate bytes.
//!
//! [`is_cask`]: crate::parse::is_cask

use ring::hmac;
use zeroize::Zeroizing;

use crate::checksum::checksum_bytes;
use crate::encoding;
use crate::error::CaskError;
use crate::layout::checksum_offset;
use crate::parse::parse_key_with_entropy;

/// Constant-time byte comparison for hash candidates.
///
/// Returns `true` iff both slices have equal length and identical
/// contents. Uses bitwise OR accumulation to avoid short-circuit timing
/// leaks.
///
/// Note: The early return on length mismatch is acceptable because a
/// hash's length follows from the stored key's length, which is public
/// information. The constant-time property protects the *contents*, not
/// the length.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// The MAC stream replacing a hash's entropy section: the first block
/// is HMAC-SHA-256 of `input` under `key`; each further block is the
/// HMAC of the previous block. Truncated to `out_len` bytes, so for
/// `out_len ≤ 32` this is the plain first-bytes truncation.
fn mac_stream(key: &[u8], input: &[u8], out_len: usize) -> Zeroizing<Vec<u8>> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    let mut stream = Zeroizing::new(Vec::with_capacity(out_len));
    let mut block = hmac::sign(&key, input);
    stream.extend_from_slice(block.as_ref());
    while stream.len() < out_len {
        block = hmac::sign(&key, block.as_ref());
        stream.extend_from_slice(block.as_ref());
    }
    stream.truncate(out_len);
    stream
}

/// Derive the hash of `derivation_input` under `secret`, writing its
/// textual form into `out` and returning the written length.
///
/// The hash has exactly the textual length of `secret`.
/// `secret_entropy_in_bytes` locates the entropy/provider-data split in
/// `secret` and is rounded up to a whole 3-byte group, exactly as
/// minting rounds it.
///
/// # Errors
///
/// - [`CaskError::InvalidArgument`] — `secret` is not a well-formed
///   CASK key, or the entropy size is not a legal split for it
/// - [`CaskError::BufferTooSmall`] — `out` cannot hold the hash
///
/// On any error `out` is untouched.
pub fn generate_hash(
    derivation_input: &[u8],
    secret: &str,
    secret_entropy_in_bytes: usize,
    out: &mut [u8],
) -> Result<usize, CaskError> {
    let parsed = parse_key_with_entropy(secret, secret_entropy_in_bytes)?;

    let required = secret.len();
    if out.len() < required {
        return Err(CaskError::BufferTooSmall {
            required,
            provided: out.len(),
        });
    }

    let secret_length = parsed.secret_entropy_in_bytes();
    let mut raw = Zeroizing::new(parsed.as_bytes().to_vec());

    let mac = mac_stream(parsed.secret(), derivation_input, secret_length);
    raw[..secret_length].copy_from_slice(&mac);

    let checksum_start = checksum_offset(raw.len());
    let checksum = checksum_bytes(&raw[..checksum_start]);
    raw[checksum_start..].copy_from_slice(&checksum);

    let text = encoding::encode(&raw);
    debug_assert_eq!(text.len(), required);
    out[..required].copy_from_slice(text.as_bytes());

    Ok(required)
}

/// Allocating convenience wrapper around [`generate_hash`].
///
/// # Errors
///
/// As [`generate_hash`], except `BufferTooSmall` cannot occur.
pub fn generate_hash_string(
    derivation_input: &[u8],
    secret: &str,
    secret_entropy_in_bytes: usize,
) -> Result<String, CaskError> {
    let mut out = vec![0u8; secret.len()];
    let written = generate_hash(derivation_input, secret, secret_entropy_in_bytes, &mut out)?;
    out.truncate(written);
    String::from_utf8(out)
        .map_err(|_| CaskError::InvalidArgument("derived hash is not ASCII".into()))
}

/// Whether `candidate` is the hash of `derivation_input` under
/// `secret`.
///
/// Never fails: a malformed candidate or secret returns `false`, with
/// no distinction between failure kinds. The comparison is constant
/// time over the candidate bytes.
#[must_use]
pub fn compare_hash(
    candidate: &str,
    derivation_input: &[u8],
    secret: &str,
    secret_entropy_in_bytes: usize,
) -> bool {
    let Ok(expected) = generate_hash_string(derivation_input, secret, secret_entropy_in_bytes)
    else {
        return false;
    };
    constant_time_eq(candidate.as_bytes(), expected.as_bytes())
}
