// ============================================================================
// Quantized Field Library
// Signed fixed-point decimal arithmetic encoded in a 254-bit prime field
// ============================================================================

//! # Quantized Field
//!
//! A signed fixed-point numeric type built on unsigned arithmetic modulo a
//! fixed 254-bit prime.
//!
//! Values are stored as residues in `[0, p)`: the lower half of the ring
//! holds non-negative quantities scaled by `2^16`, the upper half holds
//! negative ones (as modular subtraction naturally leaves them). Sign is
//! recovered by comparing against the ring midpoint, and per-operation bit
//! budgets keep chained arithmetic from ever crossing between the halves.
//!
//! ## Features
//!
//! - **Signed add/sub/mul/div** over an unsigned modular domain, with
//!   truncation-toward-zero rescaling
//! - **Hard overflow boundaries**: every operator checks its operands
//!   against a declared bit budget and fails loudly instead of wrapping
//! - **Total ordering** consistent with the decoded values
//! - **Decimal boundary conversions** (`rust_decimal`) and string parsing
//!
//! ## Example
//!
//! ```rust
//! use quantized_field::prelude::*;
//!
//! let price: Quantized = "1.5".parse().unwrap();
//! let qty = Quantized::from_integer(4);
//!
//! let total = price.checked_mul(&qty).unwrap();
//! assert_eq!(total, Quantized::from_integer(6));
//!
//! let unit = total.checked_div(&qty).unwrap();
//! assert_eq!(unit, price);
//! assert!(unit > Quantized::zero());
//!
//! // overflow is an error, not a wrap
//! assert!(matches!(
//!     price.checked_div(&Quantized::zero()),
//!     Err(NumericError::DivisionByZero)
//! ));
//! ```

pub mod field;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::field::FieldElement;
    pub use crate::numeric::{NumericError, NumericResult, Quantized};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;

    #[test]
    fn test_chained_expression() {
        // (1.5 * 4 + 2) / 2 = 4.0
        let x: Quantized = "1.5".parse().unwrap();
        let result = x
            .checked_mul(&Quantized::from_integer(4))
            .and_then(|p| p.checked_add(&Quantized::from_integer(2)))
            .and_then(|s| s.checked_div(&Quantized::from_integer(2)))
            .unwrap();
        assert_eq!(result, Quantized::from_integer(4));
    }

    #[test]
    fn test_error_propagates_through_chain() {
        let x = Quantized::from_integer(7);
        let result = x
            .checked_mul(&Quantized::from_integer(3))
            .and_then(|p| p.checked_div(&Quantized::zero()))
            .and_then(|q| q.checked_add(&Quantized::one()));
        assert_eq!(result.unwrap_err(), NumericError::DivisionByZero);
    }

    #[test]
    fn test_raw_residue_round_trip() {
        let q: Quantized = "-2.5".parse().unwrap();
        let raw: FieldElement = q.clone().into_raw();
        assert_eq!(Quantized::new(raw).unwrap(), q);
    }

    #[test]
    fn test_sorting_mixed_signs() {
        let mut values: Vec<Quantized> = ["0.5", "-3", "2", "-0.25", "0"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        values.sort();
        let rendered: Vec<String> = values.iter().map(|v| v.integer_part().to_string()).collect();
        assert_eq!(rendered, vec!["-3", "0", "0", "0", "2"]);
        assert!(values[1].is_negative()); // -0.25 sits between -3 and 0
    }
}
