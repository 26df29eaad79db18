//! 256-bit token amounts with checked arithmetic
//!
//! Every operation that can wrap returns a [`MathError`] instead, mirroring
//! checked-math semantics of the chain the engine is modelled on. Division
//! always truncates toward zero.

use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::TOKEN_DECIMALS;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Arithmetic underflow")]
    Underflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid decimal amount")]
    InvalidDecimal,
}

pub type MathResult<T> = std::result::Result<T, MathError>;

/// Token amount in base units (18 decimals)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256([0, 0, 0, 0]));
    pub const ONE: Amount = Amount(U256([1, 0, 0, 0]));

    pub fn new(raw: U256) -> Self {
        Amount(raw)
    }

    /// Whole tokens, scaled by 10^18
    pub fn from_tokens(tokens: u64) -> Self {
        Amount(U256::from(tokens) * U256::exp10(TOKEN_DECIMALS))
    }

    /// Base units in decimal; surrounding whitespace is ignored
    pub fn from_dec_str(value: &str) -> MathResult<Self> {
        U256::from_dec_str(value.trim())
            .map(Amount)
            .map_err(|_| MathError::InvalidDecimal)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Amount) -> MathResult<Amount> {
        self.0.checked_add(other.0).map(Amount).ok_or(MathError::Overflow)
    }

    pub fn checked_sub(self, other: Amount) -> MathResult<Amount> {
        self.0.checked_sub(other.0).map(Amount).ok_or(MathError::Underflow)
    }

    pub fn checked_mul(self, other: Amount) -> MathResult<Amount> {
        self.0.checked_mul(other.0).map(Amount).ok_or(MathError::Overflow)
    }

    pub fn checked_div(self, other: Amount) -> MathResult<Amount> {
        if other.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Amount(self.0 / other.0))
    }

    pub fn checked_mul_u64(self, factor: u64) -> MathResult<Amount> {
        self.checked_mul(Amount::from(factor))
    }

    pub fn checked_div_u64(self, divisor: u64) -> MathResult<Amount> {
        self.checked_div(Amount::from(divisor))
    }

    /// `self * numerator / denominator`, multiplying first
    pub fn mul_div(self, numerator: Amount, denominator: Amount) -> MathResult<Amount> {
        self.checked_mul(numerator)?.checked_div(denominator)
    }

    pub fn mul_div_u64(self, numerator: u64, denominator: u64) -> MathResult<Amount> {
        self.mul_div(Amount::from(numerator), Amount::from(denominator))
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Sum of an iterator of amounts, failing on overflow
    pub fn checked_sum<I>(amounts: I) -> MathResult<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Value in whole tokens, truncated
    pub fn whole_tokens(&self) -> U256 {
        self.0 / U256::exp10(TOKEN_DECIMALS)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_dec_str(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or decimal string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_dec_str(v).map_err(|e| E::custom(format_args!("{} '{}'", e, v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Amount, E> {
        self.visit_str(&v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from)
            .map_err(|_| E::custom("amount cannot be negative"))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // bincode cannot drive deserialize_any
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(AmountVisitor)
        } else {
            deserializer.deserialize_str(AmountVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens() {
        let one = Amount::from_tokens(1);
        assert_eq!(one, Amount::from(1_000_000_000_000_000_000u64));
        assert_eq!(one.whole_tokens(), U256::from(1));
    }

    #[test]
    fn test_checked_ops() {
        let a = Amount::from(10u64);
        let b = Amount::from(3u64);

        assert_eq!(a.checked_add(b).unwrap(), Amount::from(13u64));
        assert_eq!(a.checked_sub(b).unwrap(), Amount::from(7u64));
        assert_eq!(b.checked_sub(a), Err(MathError::Underflow));
        assert_eq!(a.checked_div(b).unwrap(), Amount::from(3u64));
        assert_eq!(a.checked_div(Amount::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_reported() {
        let max = Amount::new(U256::MAX);
        assert_eq!(max.checked_add(Amount::ONE), Err(MathError::Overflow));
        assert_eq!(max.checked_mul_u64(2), Err(MathError::Overflow));
    }

    #[test]
    fn test_mul_div_multiplies_first() {
        // 7 * 3 / 2 = 10, dividing first would give 9
        let result = Amount::from(7u64).mul_div_u64(3, 2).unwrap();
        assert_eq!(result, Amount::from(10u64));
    }

    #[test]
    fn test_max_supply_products_fit() {
        let supply = Amount::from_tokens(100_000_000_000);
        let scaled = supply
            .checked_mul(Amount::from_tokens(1))
            .and_then(|v| v.checked_mul(supply));
        assert!(scaled.is_ok());
    }

    #[test]
    fn test_serde_decimal_string() {
        let amount = Amount::from_tokens(150_000_000);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"150000000000000000000000000\"");

        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);

        let from_number: Amount = serde_json::from_str("42").unwrap();
        assert_eq!(from_number, Amount::from(42u64));
    }

    #[test]
    fn test_decimal_parsing() {
        assert_eq!(Amount::from_dec_str(" 1500 "), Ok(Amount::from(1_500u64)));
        assert_eq!("7".parse::<Amount>(), Ok(Amount::from(7u64)));
        assert_eq!(Amount::from_dec_str("12.5"), Err(MathError::InvalidDecimal));
        assert_eq!("-3".parse::<Amount>(), Err(MathError::InvalidDecimal));
        // One past U256::MAX
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(Amount::from_dec_str(too_big), Err(MathError::InvalidDecimal));

        let err = serde_json::from_str::<Amount>("\"1e9\"").unwrap_err();
        assert!(err.to_string().contains("Invalid decimal amount '1e9'"));
    }

    #[test]
    fn test_bincode_roundtrip() {
        let amount = Amount::from_tokens(12_345);
        let bytes = bincode::serialize(&amount).unwrap();
        let back: Amount = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_checked_sum() {
        let total = Amount::checked_sum(vec![Amount::from(1u64), Amount::from(2u64)]).unwrap();
        assert_eq!(total, Amount::from(3u64));
    }
}
