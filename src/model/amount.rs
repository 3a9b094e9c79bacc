//! Amount type for non-negative numeric cells such as quantities and prices.
//!
//! This module provides the `Amount` type which wraps `Decimal` so that sums and products of
//! prices and quantities are exact, and handles parsing the loosely formatted numbers found in
//! spreadsheet exports.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Represents a non-negative quantity or money value.
///
/// Equality and hashing follow the numeric value, so `10` and `10.0` are the same amount.
///
/// # Examples
///
/// ```
/// # use sales_dash::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("10").unwrap();
/// let b = Amount::from_str(" 10.0 ").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.checked_mul(b).unwrap().to_string(), "100");
/// ```
///
/// Negative and empty values are rejected:
/// ```
/// # use sales_dash::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("-1").is_err());
/// assert!(Amount::from_str("").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, returning an error if `value` is negative.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `None` when the sum is too large for a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Returns `None` when the product is too large for a `Decimal`.
    pub fn checked_mul(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_mul(rhs.0).map(Amount)
    }

    /// Formats the value rounded to whole units with commas as thousands separators, preceded by
    /// `prefix` when it is not empty, e.g. `Rp 1,250,000`.
    pub fn grouped(&self, prefix: &str) -> String {
        let num = format_num::format_num!(",.0", self.0.round().to_f64().unwrap_or_default());
        if prefix.is_empty() {
            num
        } else {
            format!("{prefix} {num}")
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Empty,
    Negative(Decimal),
    Invalid(String, rust_decimal::Error),
    Overflow,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "an empty value is not a number"),
            AmountError::Negative(d) => write!(f, "negative value {d} is not allowed"),
            AmountError::Invalid(s, e) => write!(f, "'{s}' is not a number: {e}"),
            AmountError::Overflow => write!(f, "the value is too large"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AmountError::Invalid(_, e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // Spreadsheet exports sometimes write large numbers as `1.5e3`.
        let value = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str(trimmed)
        }
        .map_err(|e| AmountError::Invalid(trimmed.to_string(), e))?;

        Amount::new(value.normalize())
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0.normalize(), f)
    }
}

/// Panics on overflow, like `Decimal`. A `TransactionTable` guarantees that its total quantity and
/// total revenue fit, so sums over its records cannot overflow.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(amt("12").value(), Decimal::from(12));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(amt("149999.50").value(), Decimal::from_str("149999.5").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(amt("  50  ").value(), Decimal::from(50));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(amt("1.5e3").value(), Decimal::from(1500));
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(Amount::from_str("   "), Err(AmountError::Empty)));
    }

    #[test]
    fn test_parse_negative_is_error() {
        assert!(matches!(Amount::from_str("-5"), Err(AmountError::Negative(_))));
    }

    #[test]
    fn test_parse_negative_zero_is_zero() {
        assert!(amt("-0").is_zero());
    }

    #[test]
    fn test_parse_text_is_error() {
        let err = Amount::from_str("lima").unwrap_err();
        assert!(err.to_string().contains("'lima' is not a number"));
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(amt("10"), amt("10.00"));
        assert_eq!(amt("10").to_string(), amt("10.00").to_string());
    }

    #[test]
    fn test_multiply_is_exact() {
        let revenue = amt("3").checked_mul(amt("0.1")).unwrap();
        assert_eq!(revenue.value(), Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_checked_overflow() {
        let big = amt("100000000000000000000");
        assert_eq!(big.checked_mul(amt("10000000000")), None);
        let max = Amount::new(Decimal::MAX).unwrap();
        assert_eq!(max.checked_add(amt("1")), None);
        assert_eq!(amt("1").checked_add(amt("2")), Some(amt("3")));
    }

    #[test]
    fn test_sum() {
        let total: Amount = [amt("1.25"), amt("2"), amt("0.75")].iter().sum();
        assert_eq!(total, amt("4"));
    }

    #[test]
    fn test_grouped() {
        assert_eq!(amt("1250000").grouped("Rp"), "Rp 1,250,000");
        assert_eq!(amt("999.6").grouped(""), "1,000");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&amt("12.50")).unwrap();
        assert_eq!(json, "\"12.5\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amt("12.5"));
    }
}
