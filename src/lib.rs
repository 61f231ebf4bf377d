// ============================================================================
// Precise Library
// Deterministic 64.64 fixed-point arithmetic with a compute-once constant pool
// ============================================================================

//! # Precise
//!
//! A deterministic, platform-independent fixed-point number for computations
//! that need bit-identical results on every machine.
//!
//! ## Features
//!
//! - **64.64 layout**: signed 64-bit integer part, unsigned 64-bit fraction
//! - **Carry-safe arithmetic** without floating point in the arithmetic path
//! - **Integer powers and bisection roots** accurate to `2^-64`
//! - **Constant pool** (pi, tau, e, square/cube roots) derived once per process
//! - **Interop** with `f64`, `f32` and `rust_decimal::Decimal`
//!
//! ## Example
//!
//! ```rust
//! use precise::prelude::*;
//!
//! let a = FixedPoint::from(7);
//! let b = FixedPoint::from(3);
//!
//! assert_eq!(a + b, FixedPoint::from(10));
//! assert_eq!(a.checked_rem(b), Ok(FixedPoint::ONE));
//! assert_eq!(a.checked_div(FixedPoint::ZERO), Err(NumericError::DivideByZero));
//! assert_eq!(root(FixedPoint::from(4), 2), Ok(FixedPoint::TWO));
//!
//! let constants = Constants::get().unwrap();
//! println!("pi ~= {}", constants.pi());
//! ```

pub mod constants;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::constants::{ConstantCell, Constants, ConstantsConfig};
    pub use crate::numeric::math::{
        abs, clamp, clamp01, floor, lerp, max, min, power, root, square,
    };
    pub use crate::numeric::{FixedPoint, NumericError, NumericResult};
}
