//! Mock panelmerge collaborators for CI-safe tests and examples.
//!
//! [`MockSource`] serves the deterministic [`fixtures`] by default; each input can
//! be replaced, removed, or forced to fail. [`MemorySink`] records what the
//! orchestrator writes and [`FailingSink`] rejects every write.

use std::cell::Cell;

use panelmerge_core::{InputKind, PanelError, PanelSink, PanelSource, Table};

pub mod fixtures;

/// Instruction for how `load` should behave for one input.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the provided table.
    Return(Table),
    /// Fail with the provided error.
    Fail(PanelError),
}

/// Mock source serving fixture tables.
#[derive(Debug)]
pub struct MockSource {
    securities: MockBehavior,
    fundamentals: MockBehavior,
    loads: Cell<usize>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Source serving both fixture tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            securities: MockBehavior::Return(fixtures::securities::table()),
            fundamentals: MockBehavior::Return(fixtures::fundamentals::table()),
            loads: Cell::new(0),
        }
    }

    /// Source serving the given tables.
    #[must_use]
    pub fn from_tables(securities: Table, fundamentals: Table) -> Self {
        Self {
            securities: MockBehavior::Return(securities),
            fundamentals: MockBehavior::Return(fundamentals),
            loads: Cell::new(0),
        }
    }

    /// Set the behavior for one input.
    #[must_use]
    pub fn with_behavior(mut self, input: InputKind, behavior: MockBehavior) -> Self {
        match input {
            InputKind::Securities => self.securities = behavior,
            InputKind::Fundamentals => self.fundamentals = behavior,
        }
        self
    }

    /// Serve `table` for one input.
    #[must_use]
    pub fn with_table(self, input: InputKind, table: Table) -> Self {
        self.with_behavior(input, MockBehavior::Return(table))
    }

    /// Make one input absent.
    #[must_use]
    pub fn without(self, input: InputKind) -> Self {
        self.with_behavior(
            input,
            MockBehavior::Fail(PanelError::missing_input(input, "not provided by mock source")),
        )
    }

    /// Number of `load` calls served so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl PanelSource for MockSource {
    fn name(&self) -> &'static str {
        "panelmerge-mock"
    }

    fn load(&self, input: InputKind) -> Result<Table, PanelError> {
        self.loads.set(self.loads.get() + 1);
        let behavior = match input {
            InputKind::Securities => &self.securities,
            InputKind::Fundamentals => &self.fundamentals,
        };
        match behavior {
            MockBehavior::Return(t) => Ok(t.clone()),
            MockBehavior::Fail(e) => Err(e.clone()),
        }
    }
}

/// Sink keeping every written table in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Vec<Table>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls received.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Most recently written table.
    #[must_use]
    pub fn last(&self) -> Option<&Table> {
        self.writes.last()
    }
}

impl PanelSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write(&mut self, table: &Table) -> Result<(), PanelError> {
        self.writes.push(table.clone());
        Ok(())
    }
}

/// Sink rejecting every write with an I/O error.
#[derive(Debug, Default)]
pub struct FailingSink {
    attempts: usize,
}

impl FailingSink {
    /// New failing sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rejected writes.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.attempts
    }
}

impl PanelSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn write(&mut self, _table: &Table) -> Result<(), PanelError> {
        self.attempts += 1;
        Err(PanelError::io("failing", "forced write failure"))
    }
}
