//! Deterministic CRSP-like and Compustat-like fixture tables.
//!
//! The fixtures exercise every pipeline edge case:
//! - `AAPL1234` joins the 9-character fundamentals identifier `AAPL123456`.
//! - A fundamentals-only report on 2020-02-15 falls outside the securities dates.
//! - `AAPL1234` on 2020-03-31 has a null return.
//! - `MSFT5678` first reports in March, so January and February rely on the
//!   backward fill.
//! - `XYZ11111` and `XYZ22222` share ticker `XYZ` with tics `XY1` and `XY2`.

pub mod fundamentals;
pub mod securities;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use panelmerge_core::Value;

pub(crate) fn date(s: &str) -> Option<Value> {
    Some(Value::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()))
}

pub(crate) fn dec(s: &str) -> Option<Value> {
    if s.is_empty() {
        None
    } else {
        Some(Value::Number(s.parse::<Decimal>().unwrap()))
    }
}

pub(crate) fn text(s: &str) -> Option<Value> {
    Some(Value::text(s))
}
