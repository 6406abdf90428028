//! panelmerge-core
//!
//! Core types, collaborator traits, and pipeline stages shared across the
//! panelmerge workspace.
//!
//! - `value` / `table`: nullable cells and the raw tables sources produce.
//! - `source`: the `PanelSource` and `PanelSink` collaborator traits.
//! - `panel`: identifier normalization, outer join, roll-down fill, and row-set
//!   reduction over a panel keyed by (identifier, date).
//! - `verify`: identifier conflict checks over a merged panel.
//!
//! Everything here is synchronous and pure: stages take their inputs by
//! reference or by value and return new values, so a failed stage never leaves a
//! half-transformed table behind.
#![warn(missing_docs)]

/// Polars conversion (feature `dataframe`).
#[cfg(feature = "dataframe")]
pub mod dataframe;
/// Pipeline stages over keyed panels.
pub mod panel;
/// Source and sink collaborator traits.
pub mod source;
/// Raw row-major tables.
pub mod table;
/// Re-exports of configuration, error, and report types.
pub mod types;
/// Nullable cell values.
pub mod value;
/// Identifier conflict verification.
pub mod verify;

pub use panel::align::{Aligned, align};
pub use panel::dates::{coerce_date, date_set};
pub use panel::fill::roll_down;
pub use panel::frame::{Panel, PanelRow, RowOrigin};
pub use panel::normalize::{
    CrosswalkResolver, IdentifierResolver, TruncateResolver, normalize_identifiers,
    truncate_identifier,
};
pub use panel::reduce::{Reduced, reduce};
pub use source::{PanelSink, PanelSource};
pub use table::{Row, Table};
pub use types::*;
pub use value::Value;
pub use verify::{
    MismatchReviewer, PolicyReviewer, ReviewDecision, verify, verify_with_reviewer,
};
