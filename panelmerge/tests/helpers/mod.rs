// Shared fixtures and lookups for orchestrator tests.
#![allow(dead_code)]

use panelmerge::{Decimal, NaiveDate, Table, Value};

pub use panelmerge_mock::{FailingSink, MemorySink, MockBehavior, MockSource, fixtures};

pub const AAPL: &str = "AAPL1234";
pub const MSFT: &str = "MSFT5678";

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> Value {
    Value::Number(s.parse::<Decimal>().unwrap())
}

/// Row index of (identifier, date) in a persisted panel table.
pub fn find_row(t: &Table, id: &str, date: NaiveDate) -> Option<usize> {
    (0..t.len()).find(|&i| {
        t.get(i, "cusip") == Some(&Value::text(id)) && t.get(i, "date") == Some(&Value::Date(date))
    })
}

/// Cell of (identifier, date, column) in a persisted panel table.
pub fn cell<'a>(t: &'a Table, id: &str, date: NaiveDate, column: &str) -> Option<&'a Value> {
    find_row(t, id, date).and_then(|i| t.get(i, column))
}
