// ============================================================================
// Constant Pool
// Derived mathematical constants, computed once and shared read-only
// ============================================================================

use super::config::ConstantsConfig;
use crate::numeric::{FixedPoint, NumericError, NumericResult};
use parking_lot::{const_mutex, Mutex};
use std::sync::OnceLock;
use std::time::Instant;

/// Number of entries in the powers-of-two table (2^0 ..= 2^62).
const POWERS_OF_TWO: usize = 63;

/// Number of entries in the negative-powers-of-two table (2^0 ..= 2^-64).
const NEGATIVE_POWERS_OF_TWO: usize = 65;

/// Process-wide pool
static GLOBAL: ConstantCell = ConstantCell::new();

/// Immutable set of derived constants.
///
/// Derivation order: series constants (tau, pi, half-pi, quarter-pi), then
/// the compounded e, then the roots, then the power-of-two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constants {
    quarter_pi: FixedPoint,
    half_pi: FixedPoint,
    pi: FixedPoint,
    tau: FixedPoint,
    e: FixedPoint,
    sqrt2: FixedPoint,
    sqrt3: FixedPoint,
    cbrt2: FixedPoint,
    cbrt3: FixedPoint,
    powers_of_two: [FixedPoint; POWERS_OF_TWO],
    negative_powers_of_two: [FixedPoint; NEGATIVE_POWERS_OF_TWO],
    config: ConstantsConfig,
}

impl Constants {
    /// Derive a pool without touching the process-wide one.
    ///
    /// # Errors
    /// Returns `ArgumentRange` if `config` does not validate.
    pub fn compute(config: &ConstantsConfig) -> NumericResult<Self> {
        config.validate()?;

        let started = Instant::now();
        tracing::debug!("Deriving constant pool with {:?}", config);

        let tau = alternating_tau(config.series_limit)?;
        let pi = tau.checked_div(FixedPoint::TWO)?;
        let half_pi = pi.checked_div(FixedPoint::TWO)?;
        let quarter_pi = half_pi.checked_div(FixedPoint::TWO)?;

        let e = compounded_e(config.euler_exponent)?;

        let three = FixedPoint::from(3);
        let sqrt2 = FixedPoint::TWO.root(2)?;
        let sqrt3 = three.root(2)?;
        let cbrt2 = FixedPoint::TWO.root(3)?;
        let cbrt3 = three.root(3)?;

        let mut powers_of_two = [FixedPoint::ONE; POWERS_OF_TWO];
        for k in 1..POWERS_OF_TWO {
            powers_of_two[k] = powers_of_two[k - 1] + powers_of_two[k - 1];
        }

        let mut negative_powers_of_two = [FixedPoint::ONE; NEGATIVE_POWERS_OF_TWO];
        for k in 1..NEGATIVE_POWERS_OF_TWO {
            negative_powers_of_two[k] = negative_powers_of_two[k - 1] * FixedPoint::HALF;
        }

        tracing::info!(
            "Constant pool derived in {:?} (series_limit={}, euler_exponent={})",
            started.elapsed(),
            config.series_limit,
            config.euler_exponent
        );

        Ok(Self {
            quarter_pi,
            half_pi,
            pi,
            tau,
            e,
            sqrt2,
            sqrt3,
            cbrt2,
            cbrt3,
            powers_of_two,
            negative_powers_of_two,
            config: *config,
        })
    }

    // ========================================================================
    // Process-wide Pool
    // ========================================================================

    /// Derive the process-wide pool with the default configuration.
    ///
    /// # Errors
    /// Returns `UnsupportedOperation` if the pool already exists.
    pub fn initialize() -> NumericResult<&'static Self> {
        GLOBAL.initialize(ConstantsConfig::default())
    }

    /// Derive the process-wide pool with a custom configuration.
    ///
    /// # Errors
    /// - `UnsupportedOperation` if the pool already exists
    /// - `ArgumentRange` if `config` does not validate
    pub fn initialize_with(config: ConstantsConfig) -> NumericResult<&'static Self> {
        GLOBAL.initialize(config)
    }

    /// The process-wide pool, derived with the default configuration on
    /// first use.
    pub fn get() -> NumericResult<&'static Self> {
        GLOBAL.get()
    }

    /// The process-wide pool, if it has been derived.
    pub fn try_get() -> Option<&'static Self> {
        GLOBAL.try_get()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn quarter_pi(&self) -> FixedPoint {
        self.quarter_pi
    }

    #[inline]
    pub fn half_pi(&self) -> FixedPoint {
        self.half_pi
    }

    #[inline]
    pub fn pi(&self) -> FixedPoint {
        self.pi
    }

    /// Full turn, `2 * pi`
    #[inline]
    pub fn tau(&self) -> FixedPoint {
        self.tau
    }

    /// Euler's number
    #[inline]
    pub fn e(&self) -> FixedPoint {
        self.e
    }

    #[inline]
    pub fn sqrt2(&self) -> FixedPoint {
        self.sqrt2
    }

    #[inline]
    pub fn sqrt3(&self) -> FixedPoint {
        self.sqrt3
    }

    #[inline]
    pub fn cbrt2(&self) -> FixedPoint {
        self.cbrt2
    }

    #[inline]
    pub fn cbrt3(&self) -> FixedPoint {
        self.cbrt3
    }

    /// `2^k` for `k` in `0..=62`.
    #[inline]
    pub fn power_of_two(&self, k: u32) -> Option<FixedPoint> {
        self.powers_of_two.get(k as usize).copied()
    }

    /// `2^-k` for `k` in `0..=64`.
    #[inline]
    pub fn negative_power_of_two(&self, k: u32) -> Option<FixedPoint> {
        self.negative_powers_of_two.get(k as usize).copied()
    }

    /// Configuration the pool was derived with
    #[inline]
    pub fn config(&self) -> &ConstantsConfig {
        &self.config
    }
}

/// `sum over i = 1, 5, 9, ... < limit of (8/i - 8/(i+2))`, which tends to tau.
fn alternating_tau(limit: u64) -> NumericResult<FixedPoint> {
    let eight = FixedPoint::from(8);
    let mut tau = FixedPoint::ZERO;
    for i in (1..limit).step_by(4) {
        let i = i as i64;
        tau += eight.checked_div(FixedPoint::from(i))? - eight.checked_div(FixedPoint::from(i + 2))?;
    }
    Ok(tau)
}

/// `(1 + 2^-q)^(2^q)` by squaring `q` times, which tends to e.
fn compounded_e(q: u32) -> NumericResult<FixedPoint> {
    let n = FixedPoint::from(1i64 << q);
    let mut e = FixedPoint::ONE.checked_div(n)? + FixedPoint::ONE;
    for _ in 0..q {
        e = e.square();
    }
    Ok(e)
}

// ============================================================================
// Compute-once Cell
// ============================================================================

/// Write-once holder for a [`Constants`] pool.
///
/// The claim lock serializes derivation so concurrent first accesses race to
/// a single winner; later reads go straight to the `OnceLock`. An explicit
/// second initialization is rejected.
pub struct ConstantCell {
    claim: Mutex<()>,
    pool: OnceLock<Constants>,
}

impl ConstantCell {
    /// Create an empty cell
    pub const fn new() -> Self {
        Self {
            claim: const_mutex(()),
            pool: OnceLock::new(),
        }
    }

    /// Derive and install the pool.
    ///
    /// # Errors
    /// - `UnsupportedOperation` if the cell is already filled
    /// - `ArgumentRange` if `config` does not validate (the cell stays empty)
    pub fn initialize(&self, config: ConstantsConfig) -> NumericResult<&Constants> {
        let _claim = self.claim.lock();
        if self.pool.get().is_some() {
            return Err(NumericError::UnsupportedOperation);
        }
        let constants = Constants::compute(&config)?;
        Ok(self.pool.get_or_init(move || constants))
    }

    /// The pool, derived with the default configuration on first use.
    pub fn get(&self) -> NumericResult<&Constants> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }

        let _claim = self.claim.lock();
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }
        let constants = Constants::compute(&ConstantsConfig::default())?;
        Ok(self.pool.get_or_init(move || constants))
    }

    /// The pool, if it has been derived.
    #[inline]
    pub fn try_get(&self) -> Option<&Constants> {
        self.pool.get()
    }
}

impl Default for ConstantCell {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
