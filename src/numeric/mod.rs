// ============================================================================
// Numeric Module
// Deterministic 64.64 fixed-point arithmetic
// ============================================================================
//
// This module provides:
// - FixedPoint: signed 64-bit integer part + unsigned 64-bit binary fraction
// - NumericError: Error types for arithmetic operations
// - math: free functions (abs, floor, min, max, clamp, lerp, power, root)
//
// Design principles:
// - No floating-point operations inside arithmetic
// - Fallible operations return Result; add/sub/mul wrap like native integers
// - Carry propagation across the integer/fraction split by hand
// - A 64x64 -> 128 widening multiply is the only double-width step

mod arithmetic;
mod errors;
mod fixed_point;
pub mod math;

pub use errors::{NumericError, NumericResult};
pub use fixed_point::FixedPoint;
