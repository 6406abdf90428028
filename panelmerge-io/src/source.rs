use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use panelmerge_core::{InputKind, PanelError, PanelSource, Table};

use crate::table_io::{CsvOptions, read_table};

/// Source reading the two inputs from CSV files.
#[derive(Debug, Clone)]
pub struct CsvSource {
    securities: PathBuf,
    fundamentals: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    /// Read securities and fundamentals from the given paths.
    pub fn new(securities: impl Into<PathBuf>, fundamentals: impl Into<PathBuf>) -> Self {
        Self {
            securities: securities.into(),
            fundamentals: fundamentals.into(),
            options: CsvOptions::default(),
        }
    }

    /// Replace the parsing options.
    #[must_use]
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Path configured for `input`.
    #[must_use]
    pub fn path(&self, input: InputKind) -> &Path {
        match input {
            InputKind::Securities => &self.securities,
            InputKind::Fundamentals => &self.fundamentals,
        }
    }
}

impl PanelSource for CsvSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "panelmerge_io::csv::load",
            skip(self),
            fields(path = %self.path(input).display()),
        )
    )]
    fn load(&self, input: InputKind) -> Result<Table, PanelError> {
        let path = self.path(input);
        let file = File::open(path).map_err(|e| {
            PanelError::missing_input(input, format!("{}: {e}", path.display()))
        })?;
        let table = read_table(BufReader::new(file), &self.options)
            .map_err(|e| PanelError::missing_input(input, format!("{}: {e}", path.display())))?;

        #[cfg(feature = "tracing")]
        tracing::info!(%input, rows = table.len(), columns = table.columns().len(), "read successfully");

        Ok(table)
    }
}
