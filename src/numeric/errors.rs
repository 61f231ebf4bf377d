// ============================================================================
// Numeric Errors
// Error types for fixed-point arithmetic operations
// ============================================================================

use std::fmt;

/// Errors that can occur during fixed-point arithmetic operations.
///
/// Every failure is raised at the call site and carries no partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Divisor was exactly zero
    DivideByZero,
    /// Mathematically undefined request (non-positive modulo divisor, 0^0)
    Arithmetic,
    /// Operation has no implementation for these operands
    UnsupportedOperation,
    /// Argument outside the accepted range
    ArgumentRange,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::DivideByZero => write!(f, "division by zero"),
            NumericError::Arithmetic => {
                write!(f, "arithmetic error: operation is undefined for these operands")
            },
            NumericError::UnsupportedOperation => {
                write!(f, "unsupported operation: no implementation for these operands")
            },
            NumericError::ArgumentRange => {
                write!(f, "argument out of range")
            },
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
