//! File-backed collaborators for panelmerge.
//!
//! - [`CsvSource`] reads the securities and fundamentals inputs from CSV files.
//!   Empty fields are null; configured text columns (identifiers and tickers by
//!   default) are kept verbatim so leading zeros survive; every other field is
//!   read as a decimal, then a date, then text.
//! - [`CsvSink`] writes the merged panel back to CSV.
//! - `FeatherSink` (feature `feather`) writes an Arrow IPC file through polars.
#![warn(missing_docs)]

mod sink;
mod source;
mod table_io;

#[cfg(feature = "feather")]
pub use sink::FeatherSink;
pub use sink::CsvSink;
pub use source::CsvSource;
pub use table_io::{CsvOptions, parse_field, read_table, write_table};
