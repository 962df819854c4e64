//! Environmental capabilities: randomness and UTC calendar time.
//!
//! The codec is pure given its inputs and these two capabilities, which
//! are injected through small traits so tests can supply deterministic
//! fakes. Production wiring uses the platform CSPRNG and the system
//! UTC clock.

use chrono::{Datelike, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CaskError;

/// A source of cryptographically secure random bytes.
pub trait RandomSource {
    /// Fill `dst` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// [`CaskError::RandomnessUnavailable`] when entropy cannot be read.
    /// Implementations must not fall back to a non-cryptographic
    /// generator.
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), CaskError>;
}

/// A source of the current UTC calendar year and month.
pub trait UtcClock {
    /// The current `(year, month)` in UTC, month in `[1, 12]`.
    fn utc_year_month(&self) -> (i32, u32);
}

/// The platform CSPRNG, via [`rand::rngs::OsRng`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), CaskError> {
        OsRng
            .try_fill_bytes(dst)
            .map_err(|e| CaskError::RandomnessUnavailable(e.to_string()))
    }
}

/// The system UTC clock, via [`chrono::Utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl UtcClock for SystemClock {
    fn utc_year_month(&self) -> (i32, u32) {
        let now = Utc::now();
        (now.year(), now.month())
    }
}
