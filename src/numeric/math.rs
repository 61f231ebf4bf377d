// ============================================================================
// Math Functions
// Absolute value, clamping, interpolation, integer powers and roots
// ============================================================================

use super::arithmetic::multiply_magnitudes;
use super::errors::{NumericError, NumericResult};
use super::fixed_point::FixedPoint;

impl FixedPoint {
    /// Absolute value.
    ///
    /// `MIN` has no positive counterpart and is returned unchanged.
    #[inline]
    pub const fn abs(self) -> Self {
        self.magnitude()
    }

    /// Largest integer not greater than `self`.
    #[inline]
    pub const fn floor(self) -> i64 {
        self.integer()
    }

    /// Square of the value (always non-negative, wraps on overflow).
    #[inline]
    pub fn square(self) -> Self {
        let m = self.magnitude();
        let (integer, fractional, _) = multiply_magnitudes(
            m.integer() as u64,
            m.fractional(),
            m.integer() as u64,
            m.fractional(),
        );
        Self::new(integer as i64, fractional)
    }

    /// Raise to a small integer power.
    ///
    /// Exponents up to 4 use at most two squarings; larger exponents start
    /// from the 4th power and multiply once per remaining step.
    ///
    /// # Errors
    /// Returns `Arithmetic` for `0^0`.
    pub fn power(self, exponent: u8) -> NumericResult<Self> {
        match exponent {
            0 if self.is_zero() => Err(NumericError::Arithmetic),
            0 => Ok(Self::ONE),
            1 => Ok(self),
            2 => Ok(self.square()),
            3 => Ok(self.square() * self),
            _ => {
                let mut result = self.square().square();
                for _ in 4..exponent {
                    result *= self;
                }
                Ok(result)
            },
        }
    }

    /// Integer-degree root by bisection.
    ///
    /// The root is bracketed in `[1, self]` (or `[self, 1]` below one) and the
    /// bracket is halved until its width is at most [`EPSILON`](Self::EPSILON),
    /// so the result is accurate to the representation granularity.
    ///
    /// # Errors
    /// - `UnsupportedOperation` if `self` is negative
    /// - `ArgumentRange` if `degree` is zero
    pub fn root(self, degree: u8) -> NumericResult<Self> {
        if self.is_negative() {
            return Err(NumericError::UnsupportedOperation);
        }
        if degree == 0 {
            return Err(NumericError::ArgumentRange);
        }
        if degree == 1 || self.is_zero() || self == Self::ONE {
            return Ok(self);
        }

        let (mut lower, mut upper) = if self > Self::ONE {
            (Self::ONE, self)
        } else {
            (self, Self::ONE)
        };

        loop {
            let middle = lower + (upper - lower) * Self::HALF;
            match middle.repeated_power(degree) {
                Some(trial) if trial == self => return Ok(middle),
                Some(trial) if trial < self => lower = middle,
                // An overflowing trial is above any representable value
                _ => upper = middle,
            }
            if upper - lower <= Self::EPSILON {
                return Ok(middle);
            }
        }
    }

    /// `self^degree` by repeated multiplication from one; `None` on overflow.
    fn repeated_power(self, degree: u8) -> Option<Self> {
        let mut result = Self::ONE;
        for _ in 0..degree {
            let (next, overflow) = result.overflowing_mul(self);
            if overflow {
                return None;
            }
            result = next;
        }
        Some(result)
    }

    /// Clamp into `[0, 1]`.
    #[inline]
    pub fn clamp01(self) -> Self {
        clamp(self, Self::ZERO, Self::ONE)
    }

    /// Linear interpolation `from * (1 - time) + to * time`.
    #[inline]
    pub fn lerp(from: Self, to: Self, time: Self) -> Self {
        from * (Self::ONE - time) + to * time
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Absolute value of `value`.
#[inline]
pub fn abs(value: FixedPoint) -> FixedPoint {
    value.abs()
}

/// Integer part of `value` (rounds toward negative infinity).
#[inline]
pub fn floor(value: FixedPoint) -> i64 {
    value.floor()
}

#[inline]
pub fn min(a: FixedPoint, b: FixedPoint) -> FixedPoint {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
pub fn max(a: FixedPoint, b: FixedPoint) -> FixedPoint {
    if b > a {
        b
    } else {
        a
    }
}

/// Clamp `value` into `[lower, upper]`. Unlike `Ord::clamp` this never
/// panics; `lower` wins when the bounds are inverted.
#[inline]
pub fn clamp(value: FixedPoint, lower: FixedPoint, upper: FixedPoint) -> FixedPoint {
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Clamp `value` into `[0, 1]`.
#[inline]
pub fn clamp01(value: FixedPoint) -> FixedPoint {
    value.clamp01()
}

/// Linear interpolation between `from` and `to`.
#[inline]
pub fn lerp(from: FixedPoint, to: FixedPoint, time: FixedPoint) -> FixedPoint {
    FixedPoint::lerp(from, to, time)
}

#[inline]
pub fn square(value: FixedPoint) -> FixedPoint {
    value.square()
}

/// `value^exponent`, see [`FixedPoint::power`].
#[inline]
pub fn power(value: FixedPoint, exponent: u8) -> NumericResult<FixedPoint> {
    value.power(exponent)
}

/// `degree`-th root of `value`, see [`FixedPoint::root`].
#[inline]
pub fn root(value: FixedPoint, degree: u8) -> NumericResult<FixedPoint> {
    value.root(degree)
}

// ============================================================================
// Tests
// ============================================================================
