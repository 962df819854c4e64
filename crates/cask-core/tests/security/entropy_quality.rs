//! Entropy quality tests for minted secrets.
//!
//! Validates that keys minted with the production CSPRNG wiring carry
//! secret bytes whose Shannon entropy is appropriate for the sample
//! size. This is a smoke test that the underlying `OsRng` is
//! functioning and that no degenerate output (all zeros, repeated
//! patterns) reaches a key.

use cask_core::{generate_key_string, parse_key_with_entropy};

/// Shannon entropy of a byte slice (bits per byte).
///
/// H = -Σ p(x) * log2(p(x)) for each byte value x in [0, 255].
/// Maximum = 8.0 for uniformly distributed bytes.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] = freq[b as usize].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Pooled secrets from 256 keys (256 × 66 bytes ≈ 16.5 KB) — threshold
/// 7.9 bits/byte.
///
/// A single secret is too small for a meaningful entropy estimate
/// (birthday problem), so the secrets are pooled. At ~16 KB, truly
/// random data measures ~7.99; 7.9 catches degenerate output while
/// avoiding false positives from natural variance.
#[test]
fn pooled_minted_secrets_pass_entropy_test() {
    let mut pool = Vec::with_capacity(256 * 66);
    for _ in 0..256 {
        let key = generate_key_string("AB", "ACME", "", 66).expect("minting should succeed");
        let parsed = parse_key_with_entropy(&key, 66).expect("minted keys parse");
        pool.extend_from_slice(parsed.secret());
    }
    let entropy = shannon_entropy(&pool);
    assert!(
        entropy > 7.9,
        "pooled secret entropy too low: {entropy:.4} (expected > 7.9)"
    );
}

/// A single 66-byte secret — threshold 5.0 bits/byte.
///
/// At 66 bytes, expected entropy for uniform random data is ~5.8.
/// The 5.0 threshold catches repeated-byte output (0.0 entropy) while
/// passing legitimate random secrets.
#[test]
fn single_secret_entropy_is_plausible() {
    let key = generate_key_string("AB", "ACME", "", 66).expect("minting should succeed");
    let parsed = parse_key_with_entropy(&key, 66).expect("minted keys parse");
    let entropy = shannon_entropy(parsed.secret());
    assert!(
        entropy > 5.0,
        "single secret entropy too low: {entropy:.4} (expected > 5.0)"
    );
}

/// Two consecutive keys must carry distinct secrets.
///
/// The probability of collision for 66 random bytes is 2^(-528),
/// effectively zero. If this test fails, the CSPRNG is broken.
#[test]
fn consecutive_keys_have_distinct_secrets() {
    let a = generate_key_string("AB", "ACME", "", 66).expect("minting should succeed");
    let b = generate_key_string("AB", "ACME", "", 66).expect("minting should succeed");
    assert_ne!(
        a, b,
        "two consecutive keys are identical — the CSPRNG may be broken"
    );
}
