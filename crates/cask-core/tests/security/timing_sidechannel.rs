//! Timing side-channel validation for the constant-time hash comparison.
//!
//! Uses Welch's t-test to verify that `compare_hash` timing does not
//! leak the position of the first differing byte. The test compares
//! timing distributions for candidates that differ from the expected
//! hash at the first character vs the last character and asserts that
//! the t-statistic stays below a threshold (|t| < 4.5), indicating no
//! statistically significant timing difference.
//!
//! **Methodology:** a simplified dudect-style analysis:
//! 1. Derive the expected hash, then build class A (differs at the
//!    first character) and class B (differs at the last character)
//! 2. Time N interleaved iterations of `compare_hash` for each class
//! 3. Compute Welch's t-statistic on the two timing distributions
//! 4. Assert |t| < 4.5 (no detectable timing difference)
//!
//! **Caveat:** This is a statistical test. In rare cases, system
//! scheduling noise may cause false positives. The test uses 10,000+
//! iterations and black-box barriers to minimize this risk.

use std::time::Instant;

use cask_core::{compare_hash, generate_hash_string, generate_key_string};

/// Number of timing samples per class.
const SAMPLES: usize = 10_000;

/// Welch's t-test threshold. |t| < 4.5 means no detectable timing difference.
const T_THRESHOLD: f64 = 4.5;

/// Black-box hint to prevent the compiler from optimizing away a value.
#[inline(never)]
fn black_box_compare(candidate: &str, input: &[u8], secret: &str, entropy: usize) -> bool {
    let result = compare_hash(candidate, input, secret, entropy);
    std::hint::black_box(result)
}

/// Compute Welch's t-statistic for two independent samples.
///
/// `t = (mean_a - mean_b) / sqrt(var_a/n_a + var_b/n_b)`
///
/// Returns `f64::NAN` if either variance computation would divide by zero.
#[allow(clippy::cast_precision_loss)]
fn welch_t_statistic(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 || b.len() < 2 {
        return f64::NAN;
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let mean_a: f64 = a.iter().sum::<f64>() / n_a;
    let mean_b: f64 = b.iter().sum::<f64>() / n_b;

    let var_a: f64 = a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>() / (n_a - 1.0);
    let var_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / (n_b - 1.0);

    let denominator = (var_a / n_a + var_b / n_b).sqrt();
    if denominator == 0.0 {
        return 0.0; // Both distributions are constant — no timing difference.
    }

    (mean_a - mean_b) / denominator
}

/// Flip one character of `hash` at `position` to a different alphabet
/// character.
fn flip_char(hash: &str, position: usize) -> String {
    let mut bytes = hash.as_bytes().to_vec();
    bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).expect("keys are ASCII")
}

/// Validate that `compare_hash` does not leak the position of the
/// first mismatching byte.
#[test]
fn compare_hash_constant_time_no_timing_leak() {
    let entropy = 32;
    let secret =
        generate_key_string("AB", "ACME", "", entropy).expect("minting should succeed");
    let input = b"derivation input for timing analysis";
    let expected = generate_hash_string(input, &secret, entropy).expect("hashing should succeed");

    // Class A: mismatch at the first character.
    // Class B: mismatch at the last character.
    let early_mismatch = flip_char(&expected, 0);
    let late_mismatch = flip_char(&expected, expected.len() - 1);

    // Warm up to stabilize cache effects.
    for _ in 0..100 {
        black_box_compare(&early_mismatch, input, &secret, entropy);
        black_box_compare(&late_mismatch, input, &secret, entropy);
    }

    // Collect timing samples, interleaving A and B to cancel out drift.
    let mut times_a = Vec::with_capacity(SAMPLES);
    let mut times_b = Vec::with_capacity(SAMPLES);

    for _ in 0..SAMPLES {
        let start = Instant::now();
        let _ = black_box_compare(&early_mismatch, input, &secret, entropy);
        let elapsed_a = start.elapsed().as_nanos();

        let start = Instant::now();
        let _ = black_box_compare(&late_mismatch, input, &secret, entropy);
        let elapsed_b = start.elapsed().as_nanos();

        #[allow(clippy::cast_precision_loss)]
        {
            times_a.push(elapsed_a as f64);
            times_b.push(elapsed_b as f64);
        }
    }

    let t = welch_t_statistic(&times_a, &times_b);
    let abs_t = t.abs();

    eprintln!(
        "Timing side-channel test: |t| = {abs_t:.2} (threshold: {T_THRESHOLD}), \
         samples = {SAMPLES} per class"
    );

    assert!(
        abs_t < T_THRESHOLD,
        "Timing side-channel detected: |t| = {abs_t:.2} exceeds threshold {T_THRESHOLD}. \
         This suggests compare_hash leaks the position of the first mismatching byte."
    );
}

/// Sanity check: mismatching candidates of both classes are rejected.
#[test]
fn both_timing_classes_are_rejected() {
    let entropy = 32;
    let secret =
        generate_key_string("AB", "ACME", "", entropy).expect("minting should succeed");
    let input = b"derivation input";
    let expected = generate_hash_string(input, &secret, entropy).expect("hashing should succeed");

    assert!(compare_hash(&expected, input, &secret, entropy));
    assert!(!compare_hash(&flip_char(&expected, 0), input, &secret, entropy));
    assert!(!compare_hash(
        &flip_char(&expected, expected.len() - 1),
        input,
        &secret,
        entropy
    ));
}

/// Verify the Welch t-test implementation with known distributions.
#[test]
fn welch_t_test_identical_distributions() {
    let a = vec![1.0; 100];
    let b = vec![1.0; 100];
    let t = welch_t_statistic(&a, &b);
    assert!(
        t.abs() < 0.001,
        "identical distributions should yield t ≈ 0, got {t}"
    );
}

/// Verify Welch t-test detects clearly different distributions.
#[test]
fn welch_t_test_different_distributions() {
    let a: Vec<f64> = (0..1000).map(|i| 100.0 + f64::from(i % 3)).collect();
    let b: Vec<f64> = (0..1000).map(|i| 200.0 + f64::from(i % 3)).collect();
    let t = welch_t_statistic(&a, &b);
    assert!(
        t.abs() > 100.0,
        "clearly different distributions should yield |t| >> 4.5, got {t:.2}"
    );
}
