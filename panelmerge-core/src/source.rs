use crate::table::Table;
use panelmerge_types::{InputKind, PanelError};

/// Collaborator that supplies the two raw input tables.
///
/// Implementations should report an absent or unreadable input as
/// `PanelError::MissingInput` naming the `InputKind`; the orchestrator maps any
/// other failure to that variant as well so the run halts before transforming.
pub trait PanelSource {
    /// Stable collaborator name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Load one of the two input tables.
    ///
    /// # Errors
    /// Returns an error if the input is absent or cannot be decoded.
    fn load(&self, input: InputKind) -> Result<Table, PanelError>;
}

/// Collaborator that persists the merged panel.
///
/// The orchestrator calls `write` at most once per run, and only after every
/// transform stage succeeded.
pub trait PanelSink {
    /// Stable collaborator name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Persist the merged table.
    ///
    /// # Errors
    /// Returns an error if the table cannot be written.
    fn write(&mut self, table: &Table) -> Result<(), PanelError>;
}

impl<T: PanelSource + ?Sized> PanelSource for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&self, input: InputKind) -> Result<Table, PanelError> {
        (**self).load(input)
    }
}

impl<T: PanelSink + ?Sized> PanelSink for &mut T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn write(&mut self, table: &Table) -> Result<(), PanelError> {
        (**self).write(table)
    }
}
