//! Re-export of configuration, error, and report types from `panelmerge-types`.
// Consolidated re-exports so downstream crates can depend on `panelmerge-core` only

pub use panelmerge_types::{
    DataQualityWarning, IdentifierMismatch, MergeReport, MergeStats, MismatchRow,
    TickerAssociation, TickerConflict, VerificationReport, VerificationSummary,
};
pub use panelmerge_types::{FillMode, MismatchPolicy, PanelConfig, SchemaConfig, VerifyConfig};
pub use panelmerge_types::{InputKind, PanelError, Stage};

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
