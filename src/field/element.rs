// ============================================================================
// Field Element
// Canonical residues modulo the fixed prime, with half-space classification
// ============================================================================

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Decimal digits of the prime modulus.
///
/// This is the 254-bit scalar-field prime of the BN254 curve; the encoding
/// layer only relies on it being a fixed odd prime well above `2^253`.
const MODULUS_DIGITS: &[u8] =
    b"21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// The prime modulus `p`. All raw storage lives in `[0, p)`.
pub static MODULUS: Lazy<BigUint> =
    Lazy::new(|| BigUint::parse_bytes(MODULUS_DIGITS, 10).expect("modulus literal is valid"));

/// `(p - 1) / 2`, the largest residue in the non-negative half of the ring.
///
/// Residues in `[0, MIDPOINT]` decode as non-negative quantities; residues in
/// `(MIDPOINT, p)` decode as negative ones.
pub static MIDPOINT: Lazy<BigUint> = Lazy::new(|| (&*MODULUS - 1u32) / 2u32);

/// An unsigned integer reduced modulo the fixed prime.
///
/// This is a newtype over an arbitrary-precision unsigned integer that is
/// kept canonical (strictly below the modulus) at all times. It supplies the
/// primitive operations the numeric layer builds on: wrapping add/sub/mul,
/// modular negation, half-space classification, and bit-length measurement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// Create an element from an arbitrary unsigned integer, reducing it
    /// into `[0, p)`.
    pub fn new(value: BigUint) -> Self {
        Self(value % &*MODULUS)
    }

    /// The additive identity.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Whether this is the zero residue.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of bits needed to represent the raw residue (0 for zero).
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Whether the residue lies in the upper half `(MIDPOINT, p)` of the
    /// ring. Zero and `MIDPOINT` itself are in the lower half.
    pub fn is_high_half(&self) -> bool {
        self.0 > *MIDPOINT
    }

    /// Distance from zero measured through the nearer end of the ring:
    /// the residue itself in the lower half, `p - residue` in the upper.
    pub fn magnitude(&self) -> BigUint {
        if self.is_high_half() {
            &*MODULUS - &self.0
        } else {
            self.0.clone()
        }
    }

    /// Wrapping addition modulo `p`.
    pub fn add_mod(&self, other: &Self) -> Self {
        Self((&self.0 + &other.0) % &*MODULUS)
    }

    /// Wrapping subtraction modulo `p`.
    pub fn sub_mod(&self, other: &Self) -> Self {
        Self((&self.0 + &*MODULUS - &other.0) % &*MODULUS)
    }

    /// Wrapping multiplication modulo `p`.
    pub fn mul_mod(&self, other: &Self) -> Self {
        Self((&self.0 * &other.0) % &*MODULUS)
    }

    /// Modular negation: `p - x`, with zero mapping to zero rather than `p`.
    pub fn neg_mod(&self) -> Self {
        if self.0.is_zero() {
            Self::zero()
        } else {
            Self(&*MODULUS - &self.0)
        }
    }

    /// Borrow the raw residue.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consume into the raw residue.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// Narrow the residue to `u128` if it fits.
    pub fn to_u128(&self) -> Option<u128> {
        self.0.to_u128()
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        // u64 is always below the 254-bit modulus
        Self(BigUint::from(value))
    }
}

impl From<u128> for FieldElement {
    fn from(value: u128) -> Self {
        // u128 is always below the 254-bit modulus
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for FieldElement {
    fn from(value: BigUint) -> Self {
        Self::new(value)
    }
}

impl Add for FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: FieldElement) -> FieldElement {
        self.add_mod(&rhs)
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: FieldElement) -> FieldElement {
        self.sub_mod(&rhs)
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: FieldElement) -> FieldElement {
        self.mul_mod(&rhs)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.neg_mod()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_modulus_shape() {
        assert_eq!(MODULUS.bits(), 254);
        // p is odd, so the two halves tile the ring exactly
        assert_eq!(&*MIDPOINT * 2u32 + 1u32, *MODULUS);
    }

    #[test]
    fn test_new_reduces() {
        let wrapped = FieldElement::new(&*MODULUS + 5u32);
        assert_eq!(wrapped, FieldElement::from(5u64));
    }

    #[test]
    fn test_sub_wraps_into_high_half() {
        let diff = FieldElement::zero().sub_mod(&FieldElement::from(1u64));
        assert_eq!(diff.as_biguint(), &(&*MODULUS - 1u32));
        assert!(diff.is_high_half());
    }

    #[test]
    fn test_add_wraps_to_zero() {
        let top = FieldElement::new(&*MODULUS - 1u32);
        assert_eq!(top.add_mod(&FieldElement::from(1u64)), FieldElement::zero());
    }

    #[test]
    fn test_neg_mod() {
        assert_eq!(FieldElement::zero().neg_mod(), FieldElement::zero());

        let x = FieldElement::from(42u64);
        assert_eq!(x.neg_mod().as_biguint(), &(&*MODULUS - 42u32));
        assert_eq!(x.neg_mod().neg_mod(), x);
    }

    #[test]
    fn test_half_space_boundary() {
        assert!(!FieldElement::zero().is_high_half());
        assert!(!FieldElement::new(MIDPOINT.clone()).is_high_half());
        assert!(FieldElement::new(&*MIDPOINT + 1u32).is_high_half());
        assert!(FieldElement::new(&*MODULUS - 1u32).is_high_half());
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(FieldElement::from(7u64).magnitude(), BigUint::from(7u32));
        // -7 has magnitude 7
        let minus_seven = FieldElement::from(7u64).neg_mod();
        assert_eq!(minus_seven.magnitude(), BigUint::from(7u32));
    }

    #[test]
    fn test_bits() {
        assert_eq!(FieldElement::zero().bits(), 0);
        assert_eq!(FieldElement::from(1u64).bits(), 1);
        assert_eq!(FieldElement::from(u64::MAX).bits(), 64);
    }

    #[test]
    fn test_to_u128() {
        assert_eq!(FieldElement::from(u128::MAX).to_u128(), Some(u128::MAX));
        assert_eq!(FieldElement::new(MIDPOINT.clone()).to_u128(), None);
    }

    quickcheck! {
        fn prop_add_then_sub_is_identity(a: u64, b: u64) -> bool {
            let a = FieldElement::from(a);
            let b = FieldElement::from(b);
            a.add_mod(&b).sub_mod(&b) == a
        }

        fn prop_add_commutes(a: u64, b: u64) -> bool {
            let a = FieldElement::from(a);
            let b = FieldElement::from(b);
            a.add_mod(&b) == b.add_mod(&a)
        }

        fn prop_mul_commutes(a: u64, b: u64) -> bool {
            let a = FieldElement::from(a);
            let b = FieldElement::from(b);
            a.mul_mod(&b) == b.mul_mod(&a)
        }

        fn prop_neg_is_additive_inverse(a: u64) -> bool {
            let a = FieldElement::from(a);
            a.add_mod(&a.neg_mod()).is_zero()
        }
    }
}
