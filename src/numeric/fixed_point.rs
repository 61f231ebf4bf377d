// ============================================================================
// Fixed-Point Number
// 64.64 fixed-point value: signed integer part, unsigned binary fraction
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2^64 as an f64 (exactly representable)
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Deterministic fixed-point number with a 64-bit integer part and a
/// 64-bit binary fraction.
///
/// The value is `integer + fractional / 2^64`. For a fixed `integer`,
/// sweeping `fractional` from `0` to `u64::MAX` covers `[integer, integer + 1)`,
/// so negative values behave like a 128-bit two's complement number:
/// `-0.25` is stored as `(-1, 0.75 * 2^64)`.
///
/// # Value Range
/// - Minimum: `i64::MIN` (exactly)
/// - Maximum: `i64::MAX + (2^64 - 1) / 2^64`
/// - Precision: `2^-64` (one [`EPSILON`](Self::EPSILON))
///
/// # Example
/// ```
/// use precise::numeric::FixedPoint;
///
/// let a = FixedPoint::from(3);
/// let b = FixedPoint::from(2);
/// assert_eq!(a + b, FixedPoint::from(5));
/// assert_eq!(FixedPoint::HALF * FixedPoint::TWO, FixedPoint::ONE);
/// ```
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedPoint {
    integer: i64,
    fractional: u64,
}

// ============================================================================
// Named Values
// ============================================================================

impl FixedPoint {
    /// Zero value
    pub const ZERO: Self = Self::new(0, 0);

    /// One (1.0)
    pub const ONE: Self = Self::new(1, 0);

    /// Two (2.0)
    pub const TWO: Self = Self::new(2, 0);

    /// One half (0.5)
    pub const HALF: Self = Self::new(0, 1 << 63);

    /// One quarter (0.25)
    pub const QUARTER: Self = Self::new(0, 1 << 62);

    /// Smallest positive value, `2^-64`
    pub const EPSILON: Self = Self::new(0, 1);

    /// Largest negative value, `-2^-64`
    pub const NEG_EPSILON: Self = Self::new(-1, u64::MAX);

    /// Maximum representable value
    pub const MAX: Self = Self::new(i64::MAX, u64::MAX);

    /// Minimum representable value
    pub const MIN: Self = Self::new(i64::MIN, 0);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from the raw integer and fractional fields.
    #[inline]
    pub const fn new(integer: i64, fractional: u64) -> Self {
        Self {
            integer,
            fractional,
        }
    }

    /// Create from an integer value (fraction is zero).
    #[inline]
    pub const fn from_integer(value: i64) -> Self {
        Self::new(value, 0)
    }

    /// Create from an `f64`.
    ///
    /// `integer = floor(value)`, `fractional = trunc((value - integer) * 2^64)`.
    /// The integer part of `value` must fit in an `i64`; out-of-range input
    /// saturates and NaN maps to zero.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        let integer = value.floor() as i64;
        let fractional = ((value - integer as f64) * TWO_POW_64) as u64;
        Self::new(integer, fractional)
    }

    /// Create from an `f32` (exact widening to `f64` first).
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }

    /// Create from a `rust_decimal::Decimal`.
    ///
    /// # Errors
    /// Returns `ArgumentRange` if the integer part does not fit in an `i64`.
    pub fn from_decimal(value: Decimal) -> NumericResult<Self> {
        let floor = value.floor();
        let integer = floor.to_i64().ok_or(NumericError::ArgumentRange)?;
        let fractional = (value - floor)
            .checked_mul(two_pow_64_decimal())
            .and_then(|scaled| scaled.trunc().to_u64())
            .ok_or(NumericError::ArgumentRange)?;
        Ok(Self::new(integer, fractional))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Signed integer field (equal to `floor(self)`).
    #[inline]
    pub const fn integer(self) -> i64 {
        self.integer
    }

    /// Unsigned fractional field, in units of `2^-64`.
    #[inline]
    pub const fn fractional(self) -> u64 {
        self.fractional
    }

    /// Check if value is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.integer == 0 && self.fractional == 0
    }

    /// Check if value is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.integer < 0
    }

    /// Check if value is positive.
    #[inline]
    pub const fn is_positive(self) -> bool {
        !self.is_negative() && !self.is_zero()
    }

    // ========================================================================
    // Negation
    // ========================================================================

    /// Two's complement negation over the integer/fraction pair.
    ///
    /// Wraps for `MIN`, which has no positive counterpart.
    #[inline]
    pub const fn negate(self) -> Self {
        if self.fractional == 0 {
            Self::new(self.integer.wrapping_neg(), 0)
        } else {
            // -integer - 1 == !integer
            Self::new(!self.integer, 0u64.wrapping_sub(self.fractional))
        }
    }

    /// Add one to the integer part; the fraction is untouched.
    #[inline]
    pub const fn increment(self) -> Self {
        Self::new(self.integer.wrapping_add(1), self.fractional)
    }

    /// Subtract one from the integer part; the fraction is untouched.
    #[inline]
    pub const fn decrement(self) -> Self {
        Self::new(self.integer.wrapping_sub(1), self.fractional)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Convert to `f64` (lossy beyond 53 significant bits).
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.integer as f64 + self.fractional as f64 / TWO_POW_64
    }

    /// Convert to `f32` (lossy beyond 24 significant bits).
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Convert to the native integer part (rounds toward negative infinity).
    #[inline]
    pub const fn to_i64(self) -> i64 {
        self.integer
    }

    /// Convert to `rust_decimal::Decimal` (lossy beyond 28 significant digits).
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.integer) + Decimal::from(self.fractional) / two_pow_64_decimal()
    }
}

/// 2^64 as a `Decimal`
fn two_pow_64_decimal() -> Decimal {
    Decimal::from(u64::MAX) + Decimal::ONE
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for FixedPoint {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for FixedPoint {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.integer == other.integer && self.fractional == other.fractional
    }
}

impl Eq for FixedPoint {}

impl PartialOrd for FixedPoint {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPoint {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.integer
            .cmp(&other.integer)
            .then_with(|| self.fractional.cmp(&other.fractional))
    }
}

impl Hash for FixedPoint {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.integer.hash(state);
        self.fractional.hash(state);
    }
}

impl Neg for FixedPoint {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl From<i64> for FixedPoint {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<i32> for FixedPoint {
    #[inline]
    fn from(value: i32) -> Self {
        Self::from_integer(i64::from(value))
    }
}

impl From<u32> for FixedPoint {
    #[inline]
    fn from(value: u32) -> Self {
        Self::from_integer(i64::from(value))
    }
}

impl From<f64> for FixedPoint {
    #[inline]
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<f32> for FixedPoint {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl TryFrom<Decimal> for FixedPoint {
    type Error = NumericError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<FixedPoint> for f64 {
    #[inline]
    fn from(value: FixedPoint) -> Self {
        value.to_f64()
    }
}

impl From<FixedPoint> for f32 {
    #[inline]
    fn from(value: FixedPoint) -> Self {
        value.to_f32()
    }
}

impl From<FixedPoint> for Decimal {
    fn from(value: FixedPoint) -> Self {
        value.to_decimal()
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixedPoint({}, int={}, frac={:#018x})",
            self, self.integer, self.fractional
        )
    }
}

/// Formats the `f64` conversion; precision flags are forwarded.
impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

// ============================================================================
// Tests
// ============================================================================
