use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{InputKind, Stage};

/// Unified error type for the panelmerge workspace.
///
/// This covers missing inputs, schema mismatches at a given pipeline stage,
/// malformed cell data, invalid configuration, and collaborator (source/sink)
/// failures. Non-fatal findings are carried as values of this type inside the
/// `warnings` of the report envelopes.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PanelError {
    /// A required input table is absent or unreadable.
    #[error("missing input: {input} ({detail})")]
    MissingInput {
        /// Which of the two source tables is missing.
        input: InputKind,
        /// Collaborator-provided detail (path, reason).
        detail: String,
    },

    /// A column required by a pipeline stage is absent.
    #[error("schema error at {stage}: missing column '{column}'")]
    Schema {
        /// Stage that required the column.
        stage: Stage,
        /// Name of the missing column.
        column: String,
    },

    /// Issues with cell values (unparseable dates, ragged rows, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid configuration or argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A source or sink collaborator failed.
    #[error("{collaborator} failed: {msg}")]
    Io {
        /// Collaborator name that failed (e.g. "csv-sink").
        collaborator: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl PanelError {
    /// Helper: build a `Schema` error for a stage and column name.
    pub fn schema(stage: Stage, column: impl Into<String>) -> Self {
        Self::Schema {
            stage,
            column: column.into(),
        }
    }

    /// Helper: build a `MissingInput` error.
    pub fn missing_input(input: InputKind, detail: impl Into<String>) -> Self {
        Self::MissingInput {
            input,
            detail: detail.into(),
        }
    }

    /// Helper: build an `Io` error with the collaborator name and message.
    pub fn io(collaborator: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Io {
            collaborator: collaborator.into(),
            msg: msg.into(),
        }
    }
}
