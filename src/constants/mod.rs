// ============================================================================
// Constants Module
// Lazily derived, process-wide pool of mathematical constants
// ============================================================================
//
// This module provides:
// - Constants: immutable pool (pi, tau, e, square/cube roots, power tables)
// - ConstantsConfig: term counts controlling the derivations
// - ConstantCell: compute-once holder; the process-wide pool lives in one
//
// The pool is derived from the arithmetic in `numeric` only: an alternating
// series for tau, compounding for e, and bisection roots.

mod config;
mod pool;

pub use config::ConstantsConfig;
pub use pool::{ConstantCell, Constants};
