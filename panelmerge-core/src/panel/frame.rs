use chrono::NaiveDate;

use crate::table::{Row, Table};
use crate::value::Value;
use panelmerge_types::PanelError;

/// Which input(s) an aligned row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrigin {
    /// Present only in the securities table.
    Security,
    /// Present only in the fundamentals table (an outer-join artifact).
    Fundamental,
    /// Present in both tables.
    Both,
}

impl RowOrigin {
    /// True if the securities table contributed this row.
    #[must_use]
    pub const fn has_security(self) -> bool {
        matches!(self, Self::Security | Self::Both)
    }
}

/// One keyed row of an aligned panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    /// Normalized join identifier.
    pub id: String,
    /// Common date key.
    pub date: NaiveDate,
    /// Contributing input(s).
    pub origin: RowOrigin,
    /// Non-key cells, aligned with `Panel::columns`.
    pub cells: Row,
}

/// Table keyed by (identifier, date) and kept sorted by that key.
///
/// The sort order is an invariant: every constructor sorts, and every stage that
/// consumes a panel relies on rows of one identifier being contiguous and in
/// ascending date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    identifier: String,
    date: String,
    columns: Vec<String>,
    rows: Vec<PanelRow>,
}

impl Panel {
    /// Build a panel from parts, sorting rows by (identifier, date).
    ///
    /// The sort is stable, so rows sharing a key keep their relative order.
    ///
    /// # Errors
    /// Returns `Err(PanelError::Data)` if a row's cell count differs from `columns`.
    pub fn from_rows(
        identifier: impl Into<String>,
        date: impl Into<String>,
        columns: Vec<String>,
        mut rows: Vec<PanelRow>,
    ) -> Result<Self, PanelError> {
        if let Some((i, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.cells.len() != columns.len())
        {
            return Err(PanelError::Data(format!(
                "panel row {i} ({}, {}) has {} cells, expected {}",
                r.id,
                r.date,
                r.cells.len(),
                columns.len()
            )));
        }
        rows.sort_by(|a, b| a.id.cmp(&b.id).then(a.date.cmp(&b.date)));
        Ok(Self {
            identifier: identifier.into(),
            date: date.into(),
            columns,
            rows,
        })
    }

    /// Build from rows the caller already sorted and width-checked.
    pub(crate) fn from_sorted(
        identifier: String,
        date: String,
        columns: Vec<String>,
        rows: Vec<PanelRow>,
    ) -> Self {
        debug_assert!(
            rows.windows(2)
                .all(|w| (&w[0].id, w[0].date) <= (&w[1].id, w[1].date))
        );
        Self {
            identifier,
            date,
            columns,
            rows,
        }
    }

    /// Name of the identifier key column.
    #[must_use]
    pub fn identifier_column(&self) -> &str {
        &self.identifier
    }

    /// Name of the date key column.
    #[must_use]
    pub fn date_column(&self) -> &str {
        &self.date
    }

    /// Non-key column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in (identifier, date) order.
    #[must_use]
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the panel has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a non-key column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Non-key cell at (row, column name).
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.cells.get(idx)?.as_ref()
    }

    /// Iterate identifier groups: maximal runs of rows sharing one identifier.
    pub fn groups(&self) -> impl Iterator<Item = &[PanelRow]> {
        self.rows.chunk_by(|a, b| a.id == b.id)
    }

    pub(crate) fn into_parts(self) -> (String, String, Vec<String>, Vec<PanelRow>) {
        (self.identifier, self.date, self.columns, self.rows)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [PanelRow] {
        &mut self.rows
    }

    /// Flatten into a raw table: identifier, date, then the non-key columns.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut columns = Vec::with_capacity(self.columns.len() + 2);
        columns.push(self.identifier.clone());
        columns.push(self.date.clone());
        columns.extend(self.columns.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut row: Row = Vec::with_capacity(r.cells.len() + 2);
                row.push(Some(Value::Text(r.id.clone())));
                row.push(Some(Value::Date(r.date)));
                row.extend(r.cells.iter().cloned());
                row
            })
            .collect();

        Table::from_parts_unchecked(columns, rows)
    }
}
