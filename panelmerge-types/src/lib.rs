//! Panelmerge-specific configuration primitives, error type, and report envelopes.
#![warn(missing_docs)]

mod config;
mod error;
mod input;
mod reports;

pub use config::{FillMode, MismatchPolicy, PanelConfig, SchemaConfig, VerifyConfig};
pub use error::PanelError;
pub use input::{InputKind, Stage};
pub use reports::{
    DataQualityWarning, IdentifierMismatch, MergeReport, MergeStats, MismatchRow,
    TickerAssociation, TickerConflict, VerificationReport, VerificationSummary,
};
