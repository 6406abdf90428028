//! Date coercion shared by the normalizer, aligner, and reducer.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;

use crate::table::Table;
use crate::value::Value;
use panelmerge_types::{PanelError, Stage};

const TEXT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];

/// Coerce a cell to a calendar date.
///
/// Accepts native dates, text in `%Y-%m-%d`, `%Y%m%d` or `%m/%d/%Y` (a trailing
/// time component after `T` or a space is ignored), and integral `YYYYMMDD`
/// numbers. Returns `None` for anything else.
#[must_use]
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => {
            let s = s.trim();
            let head = s.split(['T', ' ']).next().unwrap_or(s);
            TEXT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
        }
        Value::Number(n) => {
            if !n.fract().is_zero() {
                return None;
            }
            let v = n.to_i64()?;
            let (y, md) = (v / 10_000, v % 10_000);
            let y = i32::try_from(y).ok()?;
            let m = u32::try_from(md / 100).ok()?;
            let d = u32::try_from(md % 100).ok()?;
            NaiveDate::from_ymd_opt(y, m, d)
        }
    }
}

/// Coerce a nullable date cell, failing on a non-null value that is not a date.
///
/// # Errors
/// Returns `Err(PanelError::Data)` naming the column and value if the cell is
/// present but cannot be read as a date.
pub fn date_cell(cell: Option<&Value>, column: &str) -> Result<Option<NaiveDate>, PanelError> {
    match cell {
        None => Ok(None),
        Some(v) => coerce_date(v).map(Some).ok_or_else(|| {
            PanelError::Data(format!("column '{column}': cannot read '{v}' as a date"))
        }),
    }
}

/// Collect the distinct dates of a table's date column.
///
/// Null dates are skipped.
///
/// # Errors
/// Returns `Err(PanelError::Schema)` if the column is absent, or
/// `Err(PanelError::Data)` if a non-null cell is not a date.
pub fn date_set(table: &Table, stage: Stage, column: &str) -> Result<BTreeSet<NaiveDate>, PanelError> {
    let idx = table.require_column(stage, column)?;
    let mut out = BTreeSet::new();
    for row in table.rows() {
        if let Some(d) = date_cell(row[idx].as_ref(), column)? {
            out.insert(d);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_common_text_layouts() {
        for s in ["2020-01-31", "20200131", "01/31/2020", "2020-01-31T00:00:00", "2020-01-31 00:00:00"] {
            assert_eq!(coerce_date(&Value::text(s)), Some(ymd(2020, 1, 31)), "{s}");
        }
    }

    #[test]
    fn accepts_integral_yyyymmdd_numbers() {
        assert_eq!(
            coerce_date(&Value::Number(Decimal::from(20_200_331))),
            Some(ymd(2020, 3, 31))
        );
        assert_eq!(coerce_date(&Value::Number(Decimal::new(202_003_315, 1))), None);
        assert_eq!(coerce_date(&Value::Number(Decimal::from(20_201_399))), None);
    }

    #[test]
    fn unreadable_cell_is_a_data_error() {
        let err = date_cell(Some(&Value::text("Q1-2020")), "datadate").unwrap_err();
        assert!(matches!(err, PanelError::Data(msg) if msg.contains("datadate")));
        assert_eq!(date_cell(None, "datadate").unwrap(), None);
    }
}
