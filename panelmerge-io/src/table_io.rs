use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::str::FromStr;

use panelmerge_core::{PanelError, Row, Table, Value, coerce_date};
use rust_decimal::Decimal;

/// Options controlling how CSV fields become cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Columns kept as text verbatim, never parsed as numbers or dates.
    pub text_columns: BTreeSet<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            text_columns: ["cusip", "tic", "ticker", "gvkey"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl CsvOptions {
    /// Keep `column` as text.
    #[must_use]
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_columns.insert(column.into());
        self
    }

    /// Use `delimiter` instead of a comma.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Parse one field: empty is null, then decimal, then date, then text.
#[must_use]
pub fn parse_field(raw: &str) -> Option<Value> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
        return Some(Value::Number(d));
    }
    let text = Value::text(s);
    Some(coerce_date(&text).map_or(text, Value::Date))
}

fn csv_err(e: &csv::Error) -> PanelError {
    if e.is_io_error() {
        return PanelError::io("csv", e.to_string());
    }
    match e.position() {
        Some(pos) => PanelError::Data(format!("csv line {}: {e}", pos.line())),
        None => PanelError::Data(e.to_string()),
    }
}

/// Read a table with a header row from `reader`.
///
/// # Errors
/// Returns `Err(PanelError::Data)` for malformed or ragged records and
/// `Err(PanelError::Io)` if the reader fails.
pub fn read_table<R: Read>(reader: R, opts: &CsvOptions) -> Result<Table, PanelError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| csv_err(&e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let text: Vec<bool> = headers
        .iter()
        .map(|h| opts.text_columns.contains(h))
        .collect();

    let mut table = Table::new(headers);
    for record in rdr.records() {
        let record = record.map_err(|e| csv_err(&e))?;
        let row: Row = record
            .iter()
            .zip(&text)
            .map(|(field, &is_text)| {
                if is_text {
                    let f = field.trim();
                    (!f.is_empty()).then(|| Value::text(f))
                } else {
                    parse_field(field)
                }
            })
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

/// Write a table with a header row to `writer`. Nulls become empty fields.
///
/// # Errors
/// Returns `Err(PanelError::Io)` if writing fails.
pub fn write_table<W: Write>(writer: W, table: &Table, delimiter: u8) -> Result<(), PanelError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    wtr.write_record(table.columns())
        .map_err(|e| PanelError::io("csv", e.to_string()))?;
    for row in table.rows() {
        wtr.write_record(
            row.iter()
                .map(|c| c.as_ref().map_or_else(String::new, ToString::to_string)),
        )
        .map_err(|e| PanelError::io("csv", e.to_string()))?;
    }
    wtr.flush().map_err(|e| PanelError::io("csv", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_parse_in_order() {
        assert_eq!(parse_field("  "), None);
        assert_eq!(parse_field("0.02"), Some(Value::Number(Decimal::new(2, 2))));
        assert_eq!(
            parse_field("1e-3"),
            Some(Value::Number(Decimal::new(1, 3)))
        );
        assert!(matches!(parse_field("2020-01-31"), Some(Value::Date(_))));
        assert_eq!(parse_field("USD"), Some(Value::text("USD")));
    }
}
