// ============================================================================
// Constant Pool Configuration
// Term counts that control how the derived constants are computed
// ============================================================================

use crate::numeric::{NumericError, NumericResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted series limit; keeps `i + 2` inside an `i64`.
const MAX_SERIES_LIMIT: u64 = 1 << 62;

/// Configuration for deriving a [`Constants`](super::Constants) pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantsConfig {
    /// Exclusive upper bound on the odd denominators of the alternating
    /// series for tau. Accuracy of pi and tau is a direct function of it.
    pub series_limit: u64,

    /// `q` in `(1 + 2^-q)^(2^q)`, the compounding used for e (1..=62).
    pub euler_exponent: u32,
}

impl Default for ConstantsConfig {
    fn default() -> Self {
        Self {
            series_limit: 1_000_000,
            euler_exponent: 32,
        }
    }
}

impl ConstantsConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set the series limit
    pub fn with_series_limit(mut self, limit: u64) -> Self {
        self.series_limit = limit;
        self
    }

    /// Builder method: Set the Euler compounding exponent
    pub fn with_euler_exponent(mut self, exponent: u32) -> Self {
        self.euler_exponent = exponent;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `ArgumentRange` if the series would have no terms or would
    /// leave the i64 range, or if the Euler exponent is outside `1..=62`.
    pub fn validate(&self) -> NumericResult<()> {
        if self.series_limit < 3 || self.series_limit > MAX_SERIES_LIMIT {
            return Err(NumericError::ArgumentRange);
        }
        if !(1..=62).contains(&self.euler_exponent) {
            return Err(NumericError::ArgumentRange);
        }
        Ok(())
    }

    /// Upper bound on `|pi - derived pi|` for this series limit.
    ///
    /// The truncated alternating series for tau is off by about
    /// `4 / series_limit`; pi is half of that. The bound doubles the tau
    /// estimate to cover rounding in the summation.
    pub fn series_error_bound(&self) -> f64 {
        8.0 / self.series_limit as f64
    }
}
