//! `cask-core` — mint and recognise CASK keys.
//!
//! A CASK key is a URL-safe textual credential that carries a
//! high-entropy secret together with self-describing metadata — an
//! allocator code, a UTC timestamp, a provider signature, and
//! provider-reserved data — and a CRC-32 integrity checksum. The fixed
//! sentinel bytes `0x25 0x04 0x09` encode to the marker `"JQQJ"`, which
//! lets secret scanners recognise a key without any out-of-band
//! context.
//!
//! The crate has two audiences: secret-issuing services, which mint
//! keys with [`generate_key`] and derive per-input hashes with
//! [`generate_hash`]; and scanners or validators, which recognise
//! candidates with [`is_cask`] / [`is_cask_bytes`] and extract fields
//! with [`parse_key`].
//!
//! The library is stateless and re-entrant. Randomness and the clock
//! are injected through the [`platform`] capability traits so tests can
//! supply deterministic fakes; production wiring uses the platform
//! CSPRNG and the system UTC clock.
//!
//! # Getting started
//!
//! ```
//! use cask_core::{
//!     generate_key_string, is_cask, parse_key, DEFAULT_SECRET_ENTROPY_IN_BYTES,
//! };
//!
//! # fn main() -> Result<(), cask_core::CaskError> {
//! let key = generate_key_string("AB", "ACME", "", DEFAULT_SECRET_ENTROPY_IN_BYTES)?;
//! assert!(is_cask(&key));
//!
//! let parsed = parse_key(&key)?;
//! assert_eq!(parsed.provider_signature(), "ACME");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod checksum;
pub mod encoding;
pub mod error;
pub mod generate;
pub mod hash;
pub mod layout;
pub mod parse;
pub mod platform;
pub mod validate;

pub use checksum::{checksum_bytes, crc32};
pub use encoding::{
    base64_chars_to_bytes, bytes_to_base64_chars, is_3_byte_aligned, is_4_char_aligned,
    round_up_to_3_byte_alignment, round_up_to_multiple_of, BASE64_URL_ALPHABET,
};
pub use error::CaskError;
pub use generate::{generate_key, generate_key_string, generate_key_with, required_key_length};
pub use hash::{compare_hash, generate_hash, generate_hash_string};
pub use layout::{
    key_length_in_bytes, CASK_SIGNATURE, CASK_SIGNATURE_TEXT, DEFAULT_SECRET_ENTROPY_IN_BYTES,
    ENVELOPE_LENGTH_IN_BYTES, MAX_KEY_LENGTH_IN_BYTES, MAX_KEY_LENGTH_IN_CHARS,
    MAX_PROVIDER_DATA_LENGTH_IN_BYTES, MAX_PROVIDER_DATA_LENGTH_IN_CHARS,
    MAX_SECRET_ENTROPY_IN_BYTES, MIN_KEY_LENGTH_IN_BYTES, MIN_KEY_LENGTH_IN_CHARS,
    MIN_SECRET_ENTROPY_IN_BYTES, YEAR_MAX, YEAR_ORIGIN,
};
pub use parse::{is_cask, is_cask_bytes, parse_key, parse_key_with_entropy, CaskKey, KeyMetadata};
pub use platform::{OsRandom, RandomSource, SystemClock, UtcClock};
pub use validate::{
    validate_allocator_code, validate_provider_data, validate_provider_signature,
    validate_secret_entropy,
};
