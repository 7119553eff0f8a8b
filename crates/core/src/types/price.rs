//! Type-safe price representation using decimal arithmetic.
//!
//! The backend is loose about price encoding: form submissions store prices
//! as strings (`"1200"`), while seeded documents use JSON numbers. [`Price`]
//! accepts either on the way in and always formats as Taka on the way out.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol used for display (Bangladeshi Taka).
pub const CURRENCY_SYMBOL: &str = "৳";

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number, got {0:?}")]
    NotANumber(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in Taka.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of Taka.
    #[must_use]
    pub fn from_taka(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }

    /// Parse a price from user or backend input.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` for a zero amount.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a quantity (line totals).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", self.0.round_dp(2).normalize())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

/// A price as it appears on the wire: number, string, or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
    Null,
}

impl RawPrice {
    fn into_price(self) -> Result<Option<Price>, PriceError> {
        match self {
            Self::Number(n) => Price::parse(&n.to_string()).map(Some),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => Price::parse(&s).map(Some),
            Self::Null => Ok(None),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawPrice::deserialize(deserializer)?
            .into_price()
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom(PriceError::Empty))
    }
}

/// Deserialize an optional price where `null`, `""`, and a missing field all
/// mean "no price".
///
/// Use with `#[serde(default, deserialize_with = "deserialize_optional_price")]`.
///
/// # Errors
///
/// Returns a deserialization error if a present value is not a valid price.
pub fn deserialize_optional_price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawPrice>::deserialize(deserializer)?
        .map_or(Ok(None), RawPrice::into_price)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("1200").unwrap(), Price::from_taka(1200));
        assert_eq!(Price::parse("  99.50 ").unwrap().to_string(), "৳99.5");
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
        assert!(matches!(Price::parse("abc"), Err(PriceError::NotANumber(_))));
        assert_eq!(Price::parse("-5"), Err(PriceError::Negative));
    }

    #[test]
    fn test_display_drops_trailing_zeros() {
        assert_eq!(Price::from_taka(150).to_string(), "৳150");
        assert_eq!(Price::parse("10.00").unwrap().to_string(), "৳10");
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: Price = serde_json::from_str("850").unwrap();
        let from_string: Price = serde_json::from_str("\"850\"").unwrap();
        assert_eq!(from_number, from_string);

        let fractional: Price = serde_json::from_str("12.75").unwrap();
        assert_eq!(fractional.to_string(), "৳12.75");
    }

    #[test]
    fn test_deserialize_required_price_rejects_null() {
        assert!(serde_json::from_str::<Price>("null").is_err());
        assert!(serde_json::from_str::<Price>("\"\"").is_err());
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_taka(120);
        assert_eq!(unit.times(3), Price::from_taka(360));

        let total: Price = [Price::from_taka(1), Price::from_taka(2)].into_iter().sum();
        assert_eq!(total, Price::from_taka(3));
    }
}
