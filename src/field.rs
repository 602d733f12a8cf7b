//! BN254 scalar field element
//!
//! Thin wrapper over `ark_bn254::Fr` adding the integer-flavoured operations
//! circuit bodies need (shift, mask, conversion to loop indices) on top of
//! the field arithmetic. Values are always the canonical residue in `[0, P)`.
//!
//! P = 21888242871839275222246405745257275088548364400416034343698204186575808495617

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField};
use ark_std::{One, Zero};
use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WitnessError, WitnessResult};

/// Element of the BN254 scalar field
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement(Fr);

impl FieldElement {
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    pub fn one() -> Self {
        Self(Fr::one())
    }

    /// `2^n` reduced into the field
    pub fn two_pow(n: usize) -> Self {
        Self::from(2u64).pow(n as u64)
    }

    /// The field modulus as an unsigned integer
    pub fn modulus() -> BigUint {
        Fr::MODULUS.into()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn inner(&self) -> Fr {
        self.0
    }

    /// Multiplicative inverse, `None` for zero
    pub fn inverse(&self) -> Option<Self> {
        self.0.inverse().map(Self)
    }

    /// Field division; a zero divisor is an error, never a defined value
    pub fn div(self, rhs: Self) -> WitnessResult<Self> {
        rhs.inverse()
            .map(|inv| self * inv)
            .ok_or(WitnessError::DivisionByZero)
    }

    pub fn pow(self, exp: u64) -> Self {
        Self(self.0.pow([exp]))
    }

    /// Canonical representative as an unsigned integer
    pub fn to_biguint(&self) -> BigUint {
        self.0.into()
    }

    /// Embed an integer that must already be below the modulus
    pub fn from_biguint(value: &BigUint) -> WitnessResult<Self> {
        if *value >= Self::modulus() {
            return Err(WitnessError::InvalidInput {
                message: format!("{} is not below the field modulus", value),
            });
        }
        Ok(Self(Fr::from(value.clone())))
    }

    /// Right shift of the canonical representative
    pub fn shr(self, bits: usize) -> Self {
        Self(Fr::from(self.to_biguint() >> bits))
    }

    /// Bitwise AND of the canonical representatives
    pub fn band(self, rhs: Self) -> Self {
        Self(Fr::from(self.to_biguint() & rhs.to_biguint()))
    }

    /// Bit `i` of the canonical representative, as 0 or 1
    pub fn bit(self, i: usize) -> Self {
        self.shr(i).band(Self::one())
    }

    pub fn to_u64(&self) -> WitnessResult<u64> {
        let limbs = self.0.into_bigint().0;
        if limbs[1..].iter().any(|limb| *limb != 0) {
            return Err(WitnessError::IntegerOverflowOnConversion { value: *self });
        }
        Ok(limbs[0])
    }

    /// Conversion for loop bounds and indices
    pub fn to_usize(&self) -> WitnessResult<usize> {
        let value = self.to_u64()?;
        usize::try_from(value).map_err(|_| WitnessError::IntegerOverflowOnConversion { value: *self })
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl From<bool> for FieldElement {
    fn from(value: bool) -> Self {
        Self(Fr::from(value))
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl FromStr for FieldElement {
    type Err = WitnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let value = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| {
            WitnessError::InvalidInput {
                message: format!("'{}' is not a decimal field element", digits),
            }
        })?;
        Self::from_biguint(&value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self)
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldElementVisitor;

        impl<'de> Visitor<'de> for FieldElementVisitor {
            type Value = FieldElement;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or a decimal string below the field modulus")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FieldElement::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(FieldElement::from)
                    .map_err(|_| E::custom(format!("negative value {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FieldElementVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    fn fe(v: u64) -> FieldElement {
        FieldElement::from(v)
    }

    #[test]
    fn test_modulus_matches_bn254() {
        assert_eq!(FieldElement::modulus().to_string(), P);
    }

    #[test]
    fn test_arithmetic_wraps_modulo_p() {
        let minus_one = -FieldElement::one();
        assert_eq!(minus_one + FieldElement::one(), FieldElement::zero());
        assert_eq!(fe(3) - fe(5), -fe(2));
        assert_eq!(fe(6) * fe(7), fe(42));

        let expected: BigUint = FieldElement::modulus() - 1u8;
        assert_eq!(minus_one.to_biguint(), expected);
    }

    #[test]
    fn test_division() {
        assert_eq!(fe(42).div(fe(6)), Ok(fe(7)));

        let third = FieldElement::one().div(fe(3)).unwrap();
        assert_eq!(third * fe(3), FieldElement::one());

        assert_eq!(fe(1).div(FieldElement::zero()), Err(WitnessError::DivisionByZero));
        assert!(FieldElement::zero().inverse().is_none());
    }

    #[test]
    fn test_pow_and_two_pow() {
        assert_eq!(fe(3).pow(4), fe(81));
        assert_eq!(FieldElement::two_pow(10), fe(1024));
        assert_eq!(FieldElement::two_pow(64).to_biguint(), BigUint::from(1u8) << 64usize);
    }

    #[test]
    fn test_shift_and_mask() {
        let v = fe(0b1011_0110);
        assert_eq!(v.shr(1), fe(0b101_1011));
        assert_eq!(v.band(fe(0b1111)), fe(0b0110));
        assert_eq!(v.bit(0), fe(0));
        assert_eq!(v.bit(1), fe(1));
        assert_eq!(v.bit(7), fe(1));
        assert_eq!(v.bit(300), fe(0));

        // P - 1 is even, so its lowest bit is 0
        assert_eq!((-FieldElement::one()).bit(0), fe(0));
    }

    #[test]
    fn test_native_conversion() {
        assert_eq!(fe(100).to_usize(), Ok(100));
        assert_eq!(fe(u64::MAX).to_u64(), Ok(u64::MAX));

        let too_big = FieldElement::two_pow(64);
        assert_eq!(
            too_big.to_u64(),
            Err(WitnessError::IntegerOverflowOnConversion { value: too_big })
        );
        assert!((-FieldElement::one()).to_usize().is_err());
    }

    #[test]
    fn test_decimal_parsing() {
        assert_eq!("12345".parse::<FieldElement>(), Ok(fe(12345)));
        assert_eq!(" 7 ".parse::<FieldElement>(), Ok(fe(7)));
        assert!(P.parse::<FieldElement>().is_err());
        assert!("-1".parse::<FieldElement>().is_err());
        assert!("abc".parse::<FieldElement>().is_err());

        let max = (FieldElement::modulus() - 1u8).to_string();
        assert_eq!(max.parse::<FieldElement>(), Ok(-FieldElement::one()));
    }

    #[test]
    fn test_ordering_uses_canonical_value() {
        assert!(fe(1) < fe(2));
        assert!(fe(5) > FieldElement::zero());
        assert!(-FieldElement::one() > fe(u64::MAX));
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let values: Vec<FieldElement> = serde_json::from_str(r#"[1, "2", "300"]"#).unwrap();
        assert_eq!(values, vec![fe(1), fe(2), fe(300)]);

        assert!(serde_json::from_str::<FieldElement>("-4").is_err());
        assert!(serde_json::from_str::<FieldElement>(&format!("\"{}\"", P)).is_err());

        let json = serde_json::to_string(&fe(99)).unwrap();
        assert_eq!(json, "\"99\"");
    }

    #[test]
    fn test_sum() {
        let total: FieldElement = (1..=100u64).map(fe).sum();
        assert_eq!(total, fe(5050));
    }
}
