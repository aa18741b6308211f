//! This file defines a newtype for validated currency codes.

use std::fmt::Display;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The ISO 4217 codes the ledger recognizes.
///
/// The list covers the currencies offered by the expense entry forms, not
/// the full ISO table.
const RECOGNIZED_CODES: [&str; 20] = [
    "AUD", "BRL", "CAD", "CHF", "CNY", "DKK", "EUR", "GBP", "HKD", "INR", "JPY", "KRW", "MXN",
    "NOK", "NZD", "SEK", "SGD", "THB", "USD", "ZAR",
];

/// A validated ISO 4217 currency code, e.g. "USD".
///
/// Parse one from a string with [str::parse]. Parsing is case-insensitive
/// and stores the code upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// The code used when a transaction does not specify a currency.
    pub const DEFAULT: &'static str = "USD";

    /// Create a `CurrencyCode` without checking that the code is recognized.
    ///
    /// The caller should ensure that `code` is an upper-cased, recognized
    /// currency code. Intended for restoring codes that were validated
    /// before they were persisted.
    pub fn new_unchecked(code: &str) -> Self {
        Self(code.to_owned())
    }

    /// The currency code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl FromStr for CurrencyCode {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let normalized = code.trim().to_uppercase();

        if RECOGNIZED_CODES.contains(&normalized.as_str()) {
            Ok(Self(normalized))
        } else {
            Err(Error::UnknownCurrency(code.to_owned()))
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for CurrencyCode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for CurrencyCode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        // Codes are validated before they are persisted, so restoring them
        // does not re-check the table.
        value.as_str().map(CurrencyCode::new_unchecked)
    }
}
