//! Row-major raw table exchanged with sources and sinks.

use crate::value::Value;
use panelmerge_types::{PanelError, Stage};

/// A row of nullable cells, positionally aligned with a table's columns.
pub type Row = Vec<Option<Value>>;

/// Named-column table with nullable cells.
///
/// Sources produce tables, sinks consume them, and the verifier reads them. The
/// pipeline never mutates an input table; every stage builds a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from columns and rows, checking every row's width.
    ///
    /// # Errors
    /// Returns `Err(PanelError::Data)` if any row does not have exactly one cell per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, PanelError> {
        let mut table = Self {
            columns,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table whose rows are known to match the column count.
    pub(crate) fn from_parts_unchecked(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Append a row.
    ///
    /// # Errors
    /// Returns `Err(PanelError::Data)` if the row width differs from the column count.
    pub fn push_row(&mut self, row: Row) -> Result<(), PanelError> {
        if row.len() != self.columns.len() {
            return Err(PanelError::Data(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the table into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column a stage cannot run without.
    ///
    /// # Errors
    /// Returns `Err(PanelError::Schema)` naming the stage and column if absent.
    pub fn require_column(&self, stage: Stage, name: &str) -> Result<usize, PanelError> {
        self.column_index(name)
            .ok_or_else(|| PanelError::schema(stage, name))
    }

    /// Cell at (row, column name); `None` for a null cell, an unknown column, or
    /// an out-of-range row.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Return a copy of this table with one column renamed.
    ///
    /// # Errors
    /// Returns `Err(PanelError::Schema)` if `from` is absent.
    /// Returns `Err(PanelError::Data)` if another column is already named `to`.
    pub fn renamed(&self, stage: Stage, from: &str, to: &str) -> Result<Self, PanelError> {
        let idx = self.require_column(stage, from)?;
        if self.columns.iter().enumerate().any(|(i, c)| i != idx && c == to) {
            return Err(PanelError::Data(format!(
                "cannot rename '{from}' to '{to}': column already exists"
            )));
        }
        let mut out = self.clone();
        out.columns[idx] = to.to_string();
        Ok(out)
    }
}
