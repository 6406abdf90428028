use core::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A single non-null table cell.
///
/// Null cells are represented as `None` in an `Option<Value>` slot. Values are
/// totally ordered so they can key sets and maps in the verifier; across variants
/// the order is `Text < Number < Date`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Free-form text (identifiers, tickers, codes).
    Text(String),
    /// Exact decimal number (returns, balance sheet items).
    Number(Decimal),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the date payload, if this is a date.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Best-effort string coercion used for identifiers and tickers.
    ///
    /// Numbers are rendered without trailing fractional zeros, so an identifier
    /// that was parsed as `123.0` coerces back to `"123"`.
    #[must_use]
    pub fn to_key_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(d) => d.normalize().to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(d) => write!(f, "{d}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Number(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
