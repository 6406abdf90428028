//! Conversion of tables into polars `DataFrame`s.

use chrono::NaiveDate;
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use rust_decimal::prelude::ToPrimitive;

use crate::table::Table;
use crate::value::Value;
use panelmerge_types::PanelError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Number,
    Date,
    Text,
}

fn column_kind<'a>(cells: impl Iterator<Item = Option<&'a Value>>) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for v in cells.flatten() {
        let k = match v {
            Value::Number(_) => ColumnKind::Number,
            Value::Date(_) => ColumnKind::Date,
            Value::Text(_) => ColumnKind::Text,
        };
        match kind {
            None => kind = Some(k),
            Some(prev) if prev != k => return ColumnKind::Text,
            Some(_) => {}
        }
    }
    kind.unwrap_or(ColumnKind::Text)
}

impl Table {
    /// Convert to a `DataFrame`.
    ///
    /// A column whose non-null cells are all numbers becomes `Float64`; all dates
    /// become `Date`; anything else (including mixed columns) becomes `String`.
    ///
    /// # Errors
    /// Returns `Err(PanelError::Data)` if polars rejects the assembled columns.
    pub fn to_dataframe(&self) -> Result<DataFrame, PanelError> {
        let mut columns = Vec::with_capacity(self.columns().len());
        for (idx, name) in self.columns().iter().enumerate() {
            let cells = self.rows().iter().map(|r| r[idx].as_ref());
            let series = match column_kind(cells.clone()) {
                ColumnKind::Number => {
                    let v: Vec<Option<f64>> = cells
                        .map(|c| c.and_then(Value::as_number).and_then(|d| d.to_f64()))
                        .collect();
                    Series::new(name.as_str().into(), v)
                }
                ColumnKind::Date => {
                    let v: Vec<Option<NaiveDate>> =
                        cells.map(|c| c.and_then(Value::as_date)).collect();
                    Series::new(name.as_str().into(), v)
                }
                ColumnKind::Text => {
                    let v: Vec<Option<String>> =
                        cells.map(|c| c.map(ToString::to_string)).collect();
                    Series::new(name.as_str().into(), v)
                }
            };
            columns.push(series.into_column());
        }
        DataFrame::new(columns).map_err(|e| PanelError::Data(e.to_string()))
    }
}
