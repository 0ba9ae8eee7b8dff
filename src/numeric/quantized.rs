// ============================================================================
// Quantized Value
// Signed fixed-point arithmetic encoded in the prime field
// ============================================================================

use super::errors::{NumericError, NumericResult};
use crate::field::FieldElement;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A signed fixed-point number stored as a residue modulo the prime.
///
/// The decoded value is `raw / 2^16` when the residue lies in the lower half
/// of the ring and `(raw - p) / 2^16` when it lies in the upper half, so
/// negative quantities are represented the way modular subtraction naturally
/// leaves them. There is no signed or fractional storage anywhere; sign is
/// recovered by comparing against the ring midpoint.
///
/// Construction enforces a 126-bit magnitude budget, and every operator
/// re-checks its own (tighter) budget on its inputs before touching the
/// ring. Exceeding a budget is a hard error, never a wrap.
///
/// # Example
/// ```ignore
/// use quantized_field::numeric::Quantized;
///
/// let a = Quantized::from_integer(3);
/// let b: Quantized = "1.5".parse()?;
/// let product = a.checked_mul(&b)?;     // 4.5
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantized(FieldElement);

// ============================================================================
// Bit Budgets
// ============================================================================

/// Budget for addition and subtraction operands. One bit below the storage
/// budget, so the sum of two conforming magnitudes cannot reach the ring
/// midpoint and be misclassified.
const ADD_BITS: u32 = 125;

/// Budget for multiplication operands. The raw product carries the sum of
/// the operand bit-lengths plus a doubled scale that must be divided back
/// down.
const MUL_BITS: u32 = 63;

/// Budget for the division numerator: 126 minus the 17 bits consumed by
/// pre-scaling it before the 128-bit division step.
const DIV_NUMERATOR_BITS: u32 = 109;

/// Budget for the division denominator.
const DIV_DENOMINATOR_BITS: u32 = 126;

/// `5^16`: rescales a `2^-16` remainder to its exact 16-digit decimal
/// expansion.
const FRAC_UNIT: u64 = 152_587_890_625;

/// Largest mantissa `Decimal` can carry (96 bits).
const MAX_DECIMAL_MANTISSA: u128 = (1 << 96) - 1;

/// Check that a residue's magnitude fits in `budget` bits.
///
/// The magnitude is the residue itself in the lower half of the ring and
/// `p - residue` in the upper half. This is the only overflow defense in the
/// crate; nothing detects a wrap after the fact.
fn check_bits(raw: &FieldElement, budget: u32) -> NumericResult<()> {
    let magnitude = raw.magnitude();
    if magnitude.bits() > u64::from(budget) {
        tracing::debug!(
            "bit budget exceeded: magnitude needs {} bits, budget is {}",
            magnitude.bits(),
            budget
        );
        return Err(NumericError::MagnitudeOverflow { budget, magnitude });
    }
    Ok(())
}

impl Quantized {
    /// Scale factor exponent: values are stored as `value * 2^16`.
    pub const SCALE_BITS: u32 = 16;

    /// The scale factor `S = 2^16`.
    pub const SCALE: u64 = 1 << Self::SCALE_BITS;

    /// Magnitude budget every stored value must satisfy.
    pub const MAX_BITS: u32 = 126;

    // ========================================================================
    // Construction
    // ========================================================================

    /// Wrap a raw residue, checking the 126-bit magnitude budget.
    ///
    /// This is the only entry point for caller-supplied residues; values
    /// produced by the operators themselves are trusted at the producing
    /// site.
    pub fn new(raw: FieldElement) -> NumericResult<Self> {
        check_bits(&raw, Self::MAX_BITS)?;
        Ok(Self(raw))
    }

    /// The zero value. Always valid.
    pub fn zero() -> Self {
        Self(FieldElement::zero())
    }

    /// The value `1.0` (raw residue `2^16`).
    pub fn one() -> Self {
        Self(FieldElement::from(Self::SCALE))
    }

    /// Encode an integer. Infallible: any `i64` magnitude scaled by `2^16`
    /// stays below 80 bits, well inside the storage budget.
    pub fn from_integer(value: i64) -> Self {
        let scaled = FieldElement::new(BigUint::from(value.unsigned_abs()) * Self::SCALE);
        if value < 0 {
            Self(scaled.neg_mod())
        } else {
            Self(scaled)
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Borrow the raw residue.
    pub fn raw(&self) -> &FieldElement {
        &self.0
    }

    /// Consume into the raw residue.
    pub fn into_raw(self) -> FieldElement {
        self.0
    }

    /// Check if value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the decoded value is negative (upper half of the ring).
    pub fn is_negative(&self) -> bool {
        self.0.is_high_half()
    }

    /// Check if the decoded value is strictly positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && !self.is_negative()
    }

    /// Absolute value. Always valid: negation preserves magnitude.
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            Self(self.0.neg_mod())
        } else {
            self.clone()
        }
    }

    /// Integer part of the decoded value, truncated toward zero.
    pub fn integer_part(&self) -> i128 {
        let int = (self.0.magnitude() / Self::SCALE)
            .to_i128()
            .expect("magnitude is within the 126-bit budget");
        if self.is_negative() {
            -int
        } else {
            int
        }
    }

    /// Fractional part of the decoded magnitude, in units of `2^-16`.
    pub fn fractional_part(&self) -> u32 {
        (self.0.magnitude() % Self::SCALE)
            .to_u32()
            .expect("remainder is below the scale factor")
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition.
    ///
    /// Both operands must fit a 125-bit magnitude budget; the check is on the
    /// inputs, independent of whether the result would fit. The raw modular
    /// sum is the correct signed result: mixing signs lands in the right half
    /// of the ring with no special casing, and no rescale is needed since
    /// both operands share the scale.
    pub fn checked_add(&self, rhs: &Self) -> NumericResult<Self> {
        check_bits(&self.0, ADD_BITS)?;
        check_bits(&rhs.0, ADD_BITS)?;
        Ok(Self(self.0.add_mod(&rhs.0)))
    }

    /// Checked subtraction. Same contract as [`checked_add`](Self::checked_add).
    pub fn checked_sub(&self, rhs: &Self) -> NumericResult<Self> {
        check_bits(&self.0, ADD_BITS)?;
        check_bits(&rhs.0, ADD_BITS)?;
        Ok(Self(self.0.sub_mod(&rhs.0)))
    }

    /// Checked multiplication, truncating toward zero.
    ///
    /// Both operands must fit a 63-bit magnitude budget. The raw product
    /// carries a doubled scale; it is brought back to scale by dividing its
    /// *magnitude* by `2^16` and re-applying the sign, so the discarded
    /// remainder always shrinks the result toward zero for either sign (this
    /// is not floor division).
    pub fn checked_mul(&self, rhs: &Self) -> NumericResult<Self> {
        check_bits(&self.0, MUL_BITS)?;
        check_bits(&rhs.0, MUL_BITS)?;

        let product = self.0.mul_mod(&rhs.0);
        let negative = product.is_high_half();
        let descaled = FieldElement::new(product.magnitude() / Self::SCALE);

        Ok(Self(if negative { descaled.neg_mod() } else { descaled }))
    }

    /// Checked division, truncating toward zero.
    ///
    /// The numerator must fit a 109-bit magnitude budget (its magnitude is
    /// pre-scaled by `2^16` before the division), the denominator a 126-bit
    /// one. Both magnitudes are narrowed to `u128` and divided exactly; the
    /// result is negative iff exactly one operand is.
    ///
    /// # Errors
    /// `DivisionByZero` if `rhs` is the zero residue; `MagnitudeOverflow` if
    /// either operand exceeds its budget.
    pub fn checked_div(&self, rhs: &Self) -> NumericResult<Self> {
        if rhs.is_zero() {
            tracing::debug!("division by zero residue");
            return Err(NumericError::DivisionByZero);
        }
        check_bits(&self.0, DIV_NUMERATOR_BITS)?;
        check_bits(&rhs.0, DIV_DENOMINATOR_BITS)?;

        let negative = self.is_negative() != rhs.is_negative();
        let numerator = (self.0.magnitude() * Self::SCALE)
            .to_u128()
            .expect("scaled numerator fits in 128 bits after the budget check");
        let denominator = rhs
            .0
            .magnitude()
            .to_u128()
            .expect("denominator fits in 128 bits after the budget check");
        let quotient = FieldElement::from(numerator / denominator);

        Ok(Self(if negative { quotient.neg_mod() } else { quotient }))
    }

    // ========================================================================
    // Decimal Conversion (API boundaries)
    // ========================================================================

    /// Convert from a `Decimal`, truncating toward zero onto the `2^-16`
    /// grid.
    ///
    /// This is intended for API boundaries (parsing user input). Inputs
    /// whose scaled form exceeds `Decimal`'s 28-digit precision are rounded
    /// by `Decimal` itself before the truncation.
    ///
    /// # Errors
    /// `DecimalOutOfRange` if the scaled value overflows `Decimal`.
    pub fn from_decimal(value: Decimal) -> NumericResult<Self> {
        let scaled = value
            .checked_mul(Decimal::from(Self::SCALE))
            .ok_or(NumericError::DecimalOutOfRange)?
            .trunc();
        let raw = scaled.to_i128().ok_or(NumericError::DecimalOutOfRange)?;

        let magnitude = FieldElement::from(raw.unsigned_abs());
        Ok(Self(if raw < 0 { magnitude.neg_mod() } else { magnitude }))
    }

    /// Convert to a `Decimal`, exactly.
    ///
    /// Every multiple of `2^-16` has a finite 16-digit decimal expansion, so
    /// the conversion is exact whenever the expansion fits `Decimal`'s
    /// 96-bit mantissa (magnitudes up to roughly `2^59`).
    ///
    /// # Errors
    /// `DecimalOutOfRange` if the expansion does not fit.
    pub fn to_decimal(&self) -> NumericResult<Decimal> {
        let mantissa = self
            .0
            .magnitude()
            .to_u128()
            .and_then(|m| m.checked_mul(u128::from(FRAC_UNIT)))
            .filter(|m| *m <= MAX_DECIMAL_MANTISSA)
            .ok_or(NumericError::DecimalOutOfRange)?;

        let signed = if self.is_negative() {
            -(mantissa as i128)
        } else {
            mantissa as i128
        };
        Ok(Decimal::from_i128_with_scale(signed, 16))
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for Quantized {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for Quantized {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantized {
    /// Total order by decoded value.
    ///
    /// Equal residues compare equal; otherwise the half-space classification
    /// of `self - other` decides. Unlike the arithmetic operators, comparison
    /// does not bit-budget its operands: the classification tracks decoded
    /// order only while both magnitudes stay at or below 125 bits, which is
    /// a caller obligation for hand-built residues. Every value this crate
    /// constructs satisfies it (the difference of two in-budget values stays
    /// far from the ring midpoint), and the relation is still total and
    /// antisymmetric over arbitrary residues, since exactly one of `diff`
    /// and `p - diff` lies in the lower half.
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        if self.0.sub_mod(&other.0).is_high_half() {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl Neg for Quantized {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.neg_mod())
    }
}

// Infallible operators for ergonomics (panic on a violated contract - use
// checked_* in production)
impl Add for Quantized {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(&rhs).expect("quantized addition overflow")
    }
}

impl Sub for Quantized {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(&rhs).expect("quantized subtraction overflow")
    }
}

impl Mul for Quantized {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(&rhs).expect("quantized multiplication overflow")
    }
}

impl Div for Quantized {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(&rhs).expect("quantized division failure")
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for Quantized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantized({}, raw={})", self, self.0)
    }
}

impl fmt::Display for Quantized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.magnitude();
        let frac = (&magnitude % Self::SCALE)
            .to_u64()
            .expect("remainder is below the scale factor");
        let int_part = magnitude / Self::SCALE;

        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}.{:016}", sign, int_part, frac * FRAC_UNIT)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl std::str::FromStr for Quantized {
    type Err = NumericError;

    /// Parse a decimal string, truncating toward zero onto the `2^-16` grid.
    ///
    /// # Examples
    /// - "1.5" -> raw 98304
    /// - "-2" -> raw p - 131072
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| NumericError::InvalidInput)?;
        Self::from_decimal(value)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_integer_roundtrip(v in any::<i64>()) {
            let q = Quantized::from_integer(v);
            prop_assert_eq!(q.integer_part(), i128::from(v));
            prop_assert_eq!(q.fractional_part(), 0);
        }

        #[test]
        fn prop_add_matches_integer_arithmetic(
            a in -(1i64 << 40)..(1i64 << 40),
            b in -(1i64 << 40)..(1i64 << 40),
        ) {
            let sum = Quantized::from_integer(a)
                .checked_add(&Quantized::from_integer(b))
                .unwrap();
            prop_assert_eq!(sum, Quantized::from_integer(a + b));
        }

        #[test]
        fn prop_sub_matches_integer_arithmetic(
            a in -(1i64 << 40)..(1i64 << 40),
            b in -(1i64 << 40)..(1i64 << 40),
        ) {
            let diff = Quantized::from_integer(a)
                .checked_sub(&Quantized::from_integer(b))
                .unwrap();
            prop_assert_eq!(diff, Quantized::from_integer(a - b));
        }

        #[test]
        fn prop_mul_matches_integer_arithmetic(
            a in -(1i64 << 23)..(1i64 << 23),
            b in -(1i64 << 23)..(1i64 << 23),
        ) {
            let product = Quantized::from_integer(a)
                .checked_mul(&Quantized::from_integer(b))
                .unwrap();
            prop_assert_eq!(product, Quantized::from_integer(a * b));
        }

        #[test]
        fn prop_div_recovers_factor(
            a in -(1i64 << 20)..(1i64 << 20),
            b in -(1i64 << 20)..(1i64 << 20),
        ) {
            prop_assume!(b != 0);
            let quotient = Quantized::from_integer(a * b)
                .checked_div(&Quantized::from_integer(b))
                .unwrap();
            prop_assert_eq!(quotient, Quantized::from_integer(a));
        }

        #[test]
        fn prop_cmp_matches_integer_order(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(
                Quantized::from_integer(a).cmp(&Quantized::from_integer(b)),
                a.cmp(&b)
            );
        }

        #[test]
        fn prop_neg_is_involution(v in any::<i64>()) {
            let q = Quantized::from_integer(v);
            prop_assert_eq!(-(-q.clone()), q);
        }
    }
}
