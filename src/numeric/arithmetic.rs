// ============================================================================
// Core Arithmetic
// Carry-propagating add/sub/mul, reciprocal-based division, modulo, bitwise
// ============================================================================
//
// Addition and multiplication wrap like native fixed-width integers; the
// `overflowing_*` variants report the wrap. Division and modulo can fail and
// return `NumericResult` from their `checked_*` forms.

use super::errors::{NumericError, NumericResult};
use super::fixed_point::FixedPoint;
use std::iter::{Product, Sum};
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, Mul, MulAssign, Rem, Sub, SubAssign,
};

/// Full 64x64 -> 128 bit product, returned as `(high, low)` halves.
#[inline]
pub(crate) const fn widening_mul(a: u64, b: u64) -> (u64, u64) {
    let wide = (a as u128) * (b as u128);
    ((wide >> 64) as u64, wide as u64)
}

/// Product of two non-negative magnitudes given as `(integer, fractional)`
/// pairs. Returns the wrapped `(integer, fractional)` result and whether the
/// integer part overflowed `u64`.
///
/// The low half of `frac_a * frac_b` is dropped, so for non-negative inputs
/// the result is the exact product rounded down to a multiple of `2^-64`.
#[inline]
pub(crate) fn multiply_magnitudes(
    int_a: u64,
    frac_a: u64,
    int_b: u64,
    frac_b: u64,
) -> (u64, u64, bool) {
    let (mut integer, mut overflow) = int_a.overflowing_mul(int_b);
    let (mut fractional, _) = widening_mul(frac_a, frac_b);

    for (int_x, frac_y) in [(int_a, frac_b), (int_b, frac_a)] {
        let (high, low) = widening_mul(int_x, frac_y);

        let (sum, wrapped) = integer.overflowing_add(high);
        integer = sum;
        overflow |= wrapped;

        let (frac_sum, carry) = fractional.overflowing_add(low);
        fractional = frac_sum;
        if carry {
            let (sum, wrapped) = integer.overflowing_add(1);
            integer = sum;
            overflow |= wrapped;
        }
    }

    (integer, fractional, overflow)
}

/// `floor(2^64 / divisor)` for `divisor >= 2`, computed from `u64::MAX`.
#[inline]
const fn reciprocal_fraction(divisor: u64) -> u64 {
    let quotient = u64::MAX / divisor;
    // 2^64 = u64::MAX + 1, so the quotient grows by one exactly when the
    // remainder of u64::MAX is divisor - 1.
    if u64::MAX % divisor == divisor - 1 {
        quotient + 1
    } else {
        quotient
    }
}

impl FixedPoint {
    // ========================================================================
    // Addition and Subtraction
    // ========================================================================

    /// Wrapping addition with carry from the fractional into the integer part.
    #[inline]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Addition that also reports whether the integer part wrapped.
    #[inline]
    pub const fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let (fractional, carry) = self.fractional().overflowing_add(rhs.fractional());
        let (integer, wrapped) = self.integer().overflowing_add(rhs.integer());
        let (integer, carried) = integer.overflowing_add(carry as i64);
        (Self::new(integer, fractional), wrapped != carried)
    }

    /// Wrapping subtraction, `self + (-rhs)`.
    #[inline]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        self.wrapping_add(rhs.negate())
    }

    // ========================================================================
    // Multiplication
    // ========================================================================

    /// Wrapping multiplication.
    ///
    /// Multiplies absolute values field by field (fraction x fraction through
    /// a 128-bit product, integer x integer, and both cross terms with carry
    /// propagation), then applies the XOR of the input signs.
    #[inline]
    pub fn wrapping_mul(self, rhs: Self) -> Self {
        self.overflowing_mul(rhs).0
    }

    /// Multiplication that also reports whether the result left the
    /// representable range.
    pub fn overflowing_mul(self, rhs: Self) -> (Self, bool) {
        let a = self.magnitude();
        let b = rhs.magnitude();
        // MIN negates to itself; read as u64 its integer is exactly 2^63.
        let (integer, fractional, wrapped) = multiply_magnitudes(
            a.integer() as u64,
            a.fractional(),
            b.integer() as u64,
            b.fractional(),
        );

        let negative = self.is_negative() ^ rhs.is_negative();
        let product = Self::new(integer as i64, fractional);

        let in_range = if negative {
            integer < 1 << 63 || (integer == 1 << 63 && fractional == 0)
        } else {
            integer <= i64::MAX as u64
        };

        if negative {
            (product.negate(), wrapped || !in_range)
        } else {
            (product, wrapped || !in_range)
        }
    }

    /// Absolute value by negation; `MIN` maps to itself.
    #[inline]
    pub(crate) const fn magnitude(self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            self
        }
    }

    // ========================================================================
    // Division
    // ========================================================================

    /// Exact reciprocal of a whole-number divisor.
    ///
    /// # Errors
    /// - `DivideByZero` if `self` is zero
    /// - `UnsupportedOperation` if `self` has a fractional part
    pub fn reciprocal(self) -> NumericResult<Self> {
        if self.is_zero() {
            return Err(NumericError::DivideByZero);
        }
        if self.fractional() != 0 {
            return Err(NumericError::UnsupportedOperation);
        }

        let divisor = self.integer().unsigned_abs();
        let magnitude = if divisor == 1 {
            Self::ONE
        } else {
            Self::new(0, reciprocal_fraction(divisor))
        };

        Ok(if self.is_negative() {
            magnitude.negate()
        } else {
            magnitude
        })
    }

    /// Checked division.
    ///
    /// - A dividend of exactly one yields the reciprocal of the divisor.
    /// - A purely fractional dividend over a positive whole divisor divides
    ///   the fractional fields directly.
    /// - Anything else is `self * (1 / rhs)`.
    ///
    /// # Errors
    /// - `DivideByZero` if `rhs` is zero
    /// - `UnsupportedOperation` if `rhs` has a fractional part, or if `rhs` is
    ///   negative and `self` is not one
    pub fn checked_div(self, rhs: Self) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivideByZero);
        }
        if self == Self::ONE {
            return rhs.reciprocal();
        }
        if rhs.is_negative() {
            return Err(NumericError::UnsupportedOperation);
        }
        if self.integer() == 0 && rhs.fractional() == 0 {
            return Ok(Self::new(0, self.fractional() / rhs.integer() as u64));
        }
        Ok(self.wrapping_mul(rhs.reciprocal()?))
    }

    // ========================================================================
    // Modulo
    // ========================================================================

    /// Checked remainder in `[0, rhs)`.
    ///
    /// Adds `rhs` while the value is negative, then subtracts it while the
    /// value is not below `rhs`. Runs in time linear in the quotient.
    ///
    /// # Errors
    /// Returns `Arithmetic` if `rhs` is not strictly positive.
    pub fn checked_rem(self, rhs: Self) -> NumericResult<Self> {
        if !rhs.is_positive() {
            return Err(NumericError::Arithmetic);
        }
        if self.is_zero() {
            return Ok(self);
        }

        let mut remainder = self;
        while remainder.is_negative() {
            remainder = remainder.wrapping_add(rhs);
        }
        while remainder >= rhs {
            remainder = remainder.wrapping_sub(rhs);
        }
        Ok(remainder)
    }
}

// ============================================================================
// Operator Traits
// ============================================================================

impl Add for FixedPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.wrapping_add(rhs)
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.wrapping_sub(rhs)
    }
}

impl Mul for FixedPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.wrapping_mul(rhs)
    }
}

// Div/Rem panic on failure for ergonomics - use checked_* in production
impl Div for FixedPoint {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(rhs)
            .unwrap_or_else(|err| panic!("FixedPoint division failed: {err}"))
    }
}

impl Rem for FixedPoint {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self::Output {
        self.checked_rem(rhs)
            .unwrap_or_else(|err| panic!("FixedPoint remainder failed: {err}"))
    }
}

impl AddAssign for FixedPoint {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedPoint {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FixedPoint {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl BitOr for FixedPoint {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(self.integer() | rhs.integer(), self.fractional() | rhs.fractional())
    }
}

impl BitAnd for FixedPoint {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self::new(self.integer() & rhs.integer(), self.fractional() & rhs.fractional())
    }
}

impl BitXor for FixedPoint {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::new(self.integer() ^ rhs.integer(), self.fractional() ^ rhs.fractional())
    }
}

impl Sum for FixedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Product for FixedPoint {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, Mul::mul)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quickcheck::{quickcheck, Arbitrary, Gen};

    /// Random operand shaped like the values the engine is exercised with:
    /// small integers with any fraction, i16 integers with any fraction, and
    /// whole i16 values.
    fn operand() -> impl Strategy<Value = FixedPoint> {
        prop_oneof![
            (-3i64..4, any::<u64>()).prop_map(|(i, f)| FixedPoint::new(i, f)),
            (any::<i16>(), any::<u64>()).prop_map(|(i, f)| FixedPoint::new(i64::from(i), f)),
            any::<i16>().prop_map(|i| FixedPoint::from_integer(i64::from(i))),
        ]
    }

    fn close(expected: f64, actual: FixedPoint) -> bool {
        (expected - actual.to_f64()).abs() < 0.01
    }

    #[derive(Clone, Debug)]
    struct AnyFixed(FixedPoint);

    impl Arbitrary for AnyFixed {
        fn arbitrary(g: &mut Gen) -> Self {
            AnyFixed(FixedPoint::new(i64::arbitrary(g), u64::arbitrary(g)))
        }
    }

    #[test]
    fn test_widening_mul() {
        assert_eq!(widening_mul(u64::MAX, u64::MAX), (u64::MAX - 1, 1));
        assert_eq!(widening_mul(1 << 63, 2), (1, 0));
    }

    #[test]
    fn test_reciprocal_fraction() {
        assert_eq!(reciprocal_fraction(2), 1 << 63);
        assert_eq!(reciprocal_fraction(3), 6_148_914_691_236_517_205);
        assert_eq!(reciprocal_fraction(4), 1 << 62);
        assert_eq!(reciprocal_fraction(1 << 63), 2);
        assert_eq!(reciprocal_fraction(u64::MAX), 1);
    }

    #[test]
    fn test_add() {
        assert_eq!(FixedPoint::from(3) + FixedPoint::from(2), FixedPoint::from(5));

        // 0.75 + 0.5 carries into the integer part
        let sum = FixedPoint::new(0, 3 << 62) + FixedPoint::HALF;
        assert_eq!(sum, FixedPoint::new(1, 1 << 62));

        // -0.25 + 1 = 0.75
        let sum = FixedPoint::from_f64(-0.25) + FixedPoint::ONE;
        assert_eq!(sum, FixedPoint::new(0, 3 << 62));
    }

    #[test]
    fn test_add_wraps() {
        let (wrapped, overflow) = FixedPoint::MAX.overflowing_add(FixedPoint::EPSILON);
        assert!(overflow);
        assert_eq!(wrapped, FixedPoint::MIN);

        let (sum, overflow) = FixedPoint::from(-5).overflowing_add(FixedPoint::from(5));
        assert!(!overflow);
        assert!(sum.is_zero());
    }

    #[test]
    fn test_sub() {
        let a = FixedPoint::from(100);
        let b = FixedPoint::from(30);
        assert_eq!(a - b, FixedPoint::from(70));
        assert_eq!(b - a, FixedPoint::from(-70));
        assert_eq!(FixedPoint::ZERO - FixedPoint::EPSILON, FixedPoint::NEG_EPSILON);
    }

    #[test]
    fn test_assign_ops() {
        let mut x = FixedPoint::from(2);
        x += FixedPoint::HALF;
        x -= FixedPoint::ONE;
        x *= FixedPoint::TWO;
        assert_eq!(x, FixedPoint::from(3));
    }

    #[test]
    fn test_mul() {
        // one-half doubled equals one
        assert_eq!(FixedPoint::new(0, 1 << 63) * FixedPoint::TWO, FixedPoint::ONE);

        // 1.5 * 1.5 = 2.25
        let x = FixedPoint::new(1, 1 << 63);
        assert_eq!(x * x, FixedPoint::new(2, 1 << 62));

        // -1.5 * 2 = -3
        assert_eq!(-x * FixedPoint::TWO, FixedPoint::from(-3));

        // -0.5 * -0.5 = 0.25
        let neg_half = -FixedPoint::HALF;
        assert_eq!(neg_half * neg_half, FixedPoint::QUARTER);
    }

    #[test]
    fn test_mul_truncates_low_bits() {
        // 2^-64 * 0.5 is below the representable increment
        assert_eq!(FixedPoint::EPSILON * FixedPoint::HALF, FixedPoint::ZERO);
    }

    #[test]
    fn test_overflowing_mul() {
        let big = FixedPoint::from(1i64 << 32);
        let (_, overflow) = big.overflowing_mul(big);
        assert!(overflow);

        let (product, overflow) = FixedPoint::from(1i64 << 30).overflowing_mul(big);
        assert!(!overflow);
        assert_eq!(product, FixedPoint::from(1i64 << 62));

        // 2^63 only fits on the negative side
        let (_, overflow) = FixedPoint::from(1i64 << 31).overflowing_mul(big);
        assert!(overflow);

        let (product, overflow) = FixedPoint::from(-(1i64 << 31)).overflowing_mul(big);
        assert!(!overflow);
        assert_eq!(product, FixedPoint::MIN);
    }

    #[test]
    fn test_reciprocal() {
        assert_eq!(FixedPoint::ONE.reciprocal(), Ok(FixedPoint::ONE));
        assert_eq!(FixedPoint::from(4).reciprocal(), Ok(FixedPoint::QUARTER));
        assert_eq!(FixedPoint::from(-2).reciprocal(), Ok(-FixedPoint::HALF));
        assert_eq!(FixedPoint::from(-1).reciprocal(), Ok(FixedPoint::from(-1)));
        assert_eq!(
            FixedPoint::ZERO.reciprocal(),
            Err(NumericError::DivideByZero)
        );
        assert_eq!(
            FixedPoint::new(2, 1).reciprocal(),
            Err(NumericError::UnsupportedOperation)
        );
    }

    #[test]
    fn test_div() {
        let third = FixedPoint::ONE / FixedPoint::from(3);
        assert_eq!(third, FixedPoint::new(0, 6_148_914_691_236_517_205));

        // Purely fractional dividend divides the fraction directly
        assert_eq!(FixedPoint::HALF / FixedPoint::TWO, FixedPoint::QUARTER);

        // General case goes through the reciprocal
        assert_eq!(FixedPoint::from(10) / FixedPoint::from(4), FixedPoint::new(2, 1 << 63));
        assert_eq!(FixedPoint::from(-9) / FixedPoint::from(2), FixedPoint::from_f64(-4.5));
    }

    #[test]
    fn test_div_by_zero() {
        for dividend in [FixedPoint::ONE, FixedPoint::HALF, FixedPoint::from(42), FixedPoint::ZERO] {
            assert_eq!(
                dividend.checked_div(FixedPoint::ZERO),
                Err(NumericError::DivideByZero)
            );
        }
    }

    #[test]
    fn test_div_unsupported() {
        // Fractional divisor
        assert_eq!(
            FixedPoint::ONE.checked_div(FixedPoint::new(1, 1 << 63)),
            Err(NumericError::UnsupportedOperation)
        );
        assert_eq!(
            FixedPoint::from(3).checked_div(FixedPoint::HALF),
            Err(NumericError::UnsupportedOperation)
        );

        // Negative divisor with a non-unit dividend
        assert_eq!(
            FixedPoint::HALF.checked_div(FixedPoint::from(-2)),
            Err(NumericError::UnsupportedOperation)
        );
        assert_eq!(
            FixedPoint::from(6).checked_div(FixedPoint::from(-3)),
            Err(NumericError::UnsupportedOperation)
        );
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_div_operator_panics() {
        let _ = FixedPoint::ONE / FixedPoint::ZERO;
    }

    #[test]
    fn test_rem() {
        assert_eq!(FixedPoint::from(7) % FixedPoint::from(3), FixedPoint::ONE);
        assert_eq!(FixedPoint::from(6) % FixedPoint::from(3), FixedPoint::ZERO);
        assert_eq!(FixedPoint::from(-1) % FixedPoint::from(3), FixedPoint::from(2));
        assert_eq!(
            FixedPoint::from_f64(5.75) % FixedPoint::HALF,
            FixedPoint::QUARTER
        );
        assert_eq!(FixedPoint::ZERO % FixedPoint::from(3), FixedPoint::ZERO);
    }

    #[test]
    fn test_rem_invalid_divisor() {
        assert_eq!(
            FixedPoint::from(7).checked_rem(FixedPoint::ZERO),
            Err(NumericError::Arithmetic)
        );
        assert_eq!(
            FixedPoint::from(7).checked_rem(FixedPoint::from(-3)),
            Err(NumericError::Arithmetic)
        );
    }

    #[test]
    fn test_bitwise() {
        let a = FixedPoint::new(0b1100, 0b1010);
        let b = FixedPoint::new(0b1010, 0b0110);
        assert_eq!(a | b, FixedPoint::new(0b1110, 0b1110));
        assert_eq!(a & b, FixedPoint::new(0b1000, 0b0010));
        assert_eq!(a ^ b, FixedPoint::new(0b0110, 0b1100));
    }

    #[test]
    fn test_sum_and_product() {
        let values = [FixedPoint::HALF, FixedPoint::QUARTER, FixedPoint::QUARTER];
        assert_eq!(values.iter().copied().sum::<FixedPoint>(), FixedPoint::ONE);
        let product: FixedPoint = [FixedPoint::TWO, FixedPoint::TWO, FixedPoint::HALF]
            .into_iter()
            .product();
        assert_eq!(product, FixedPoint::TWO);
    }

    quickcheck! {
        fn qc_add_commutes(a: AnyFixed, b: AnyFixed) -> bool {
            a.0 + b.0 == b.0 + a.0
        }

        fn qc_mul_commutes(a: AnyFixed, b: AnyFixed) -> bool {
            a.0 * b.0 == b.0 * a.0
        }

        fn qc_additive_inverse(a: AnyFixed) -> bool {
            (a.0 + (-a.0)).is_zero()
        }

        fn qc_sub_is_add_negated(a: AnyFixed, b: AnyFixed) -> bool {
            a.0 - b.0 == a.0 + (-b.0)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100_000))]

        #[test]
        fn prop_add_matches_f64(a in operand(), b in operand()) {
            prop_assert!(close(a.to_f64() + b.to_f64(), a + b));
        }

        #[test]
        fn prop_sub_matches_f64(a in operand(), b in operand()) {
            prop_assert!(close(a.to_f64() - b.to_f64(), a - b));
        }

        #[test]
        fn prop_mul_matches_f64(a in operand(), b in operand()) {
            prop_assert!(close(a.to_f64() * b.to_f64(), a * b));
        }

        #[test]
        fn prop_div_matches_f64(a in operand(), divisor in 1i64..=i64::from(i16::MAX)) {
            let b = FixedPoint::from(divisor);
            let quotient = a.checked_div(b).unwrap();
            prop_assert!(close(a.to_f64() / b.to_f64(), quotient));
        }

        #[test]
        fn prop_rem_matches_f64(a in 0.0f64..64.0, b in 0.25f64..64.0) {
            let fa = FixedPoint::from_f64(a);
            let fb = FixedPoint::from_f64(b);
            let remainder = fa.checked_rem(fb).unwrap();
            prop_assert!(remainder >= FixedPoint::ZERO && remainder < fb);
            prop_assert!(close(fa.to_f64() % fb.to_f64(), remainder));
        }
    }
}
