//! ISO 4217 currency codes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::CheckoutError;

/// Currencies whose smallest unit is the major unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// Validated three-letter currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code, accepting either case.
    pub fn parse(code: &str) -> Result<Self, CheckoutError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CheckoutError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_upper(&self) -> &str {
        &self.0
    }

    /// Lowercase form, as Stripe expects.
    pub fn as_lower(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Number of decimal places between major and minor units.
    pub fn minor_unit_exponent(&self) -> u32 {
        if ZERO_DECIMAL_CURRENCIES.contains(&self.0.as_str()) {
            0
        } else {
            2
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CurrencyCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}
