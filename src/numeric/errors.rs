// ============================================================================
// Numeric Errors
// Error types for the fixed-point encoding and its operators
// ============================================================================

use num_bigint::BigUint;
use std::fmt;

/// Errors that can occur while constructing or operating on quantized values.
///
/// `MagnitudeOverflow` and `DivisionByZero` are the operator failures: both
/// invalidate the computation that produced them and are propagated, never
/// recovered from mid-expression. The remaining variants belong to the
/// decimal boundary surface (parsing and `Decimal` conversion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// An operand's magnitude needs more bits than the operation's budget
    MagnitudeOverflow {
        /// The bit budget declared by the operation
        budget: u32,
        /// The offending operand's decoded magnitude
        magnitude: BigUint,
    },
    /// Attempted division by the zero residue
    DivisionByZero,
    /// A decimal conversion cannot represent the value exactly
    DecimalOutOfRange,
    /// Input string or value is invalid
    InvalidInput,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::MagnitudeOverflow { budget, magnitude } => {
                write!(
                    f,
                    "magnitude overflow: {} exceeds the {}-bit budget",
                    magnitude, budget
                )
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::DecimalOutOfRange => {
                write!(f, "value is outside the exactly-representable decimal range")
            },
            NumericError::InvalidInput => write!(f, "invalid input: could not parse value"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let overflow = NumericError::MagnitudeOverflow {
            budget: 63,
            magnitude: BigUint::from(1u128 << 64),
        };
        assert_eq!(
            overflow.to_string(),
            "magnitude overflow: 18446744073709551616 exceeds the 63-bit budget"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::DivisionByZero, NumericError::DivisionByZero);
        assert_ne!(NumericError::DivisionByZero, NumericError::InvalidInput);
    }
}
