use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use panelmerge_core::{PanelError, PanelSink, Table};

use crate::table_io::write_table;

/// Sink writing the merged panel to a CSV file, replacing any existing file.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    /// Write to `path` with comma delimiters.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use `delimiter` instead of a comma.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PanelSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&mut self, table: &Table) -> Result<(), PanelError> {
        let file = File::create(&self.path)
            .map_err(|e| PanelError::io("csv", format!("{}: {e}", self.path.display())))?;
        write_table(BufWriter::new(file), table, self.delimiter)?;

        #[cfg(feature = "tracing")]
        tracing::info!(path = %self.path.display(), rows = table.len(), "saved");

        Ok(())
    }
}

/// Sink writing the merged panel as an Arrow IPC (feather v2) file.
#[cfg(feature = "feather")]
#[derive(Debug, Clone)]
pub struct FeatherSink {
    path: PathBuf,
}

#[cfg(feature = "feather")]
impl FeatherSink {
    /// Write to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "feather")]
impl PanelSink for FeatherSink {
    fn name(&self) -> &'static str {
        "feather"
    }

    fn write(&mut self, table: &Table) -> Result<(), PanelError> {
        use polars::prelude::{IpcWriter, SerWriter};

        let mut df = table.to_dataframe()?;
        let file = File::create(&self.path)
            .map_err(|e| PanelError::io("feather", format!("{}: {e}", self.path.display())))?;
        IpcWriter::new(BufWriter::new(file))
            .finish(&mut df)
            .map_err(|e| PanelError::io("feather", e.to_string()))?;

        #[cfg(feature = "tracing")]
        tracing::info!(path = %self.path.display(), rows = table.len(), "saved");

        Ok(())
    }
}
