//! panelmerge aligns a monthly securities panel with quarterly fundamentals.
//!
//! Overview
//! - Normalizes fundamentals identifiers into the securities' identifier space
//!   (truncation by default, or any `IdentifierResolver` such as a crosswalk).
//! - Outer-joins both inputs on (identifier, date), rolls quarterly fields down
//!   across monthly rows within each identifier, and keeps only securities rows
//!   with a return.
//! - Verifies that the join identifier maps to one economic entity by comparing
//!   two independently sourced ticker fields.
//!
//! Key behaviors and trade-offs
//! - Fill mode:
//!   - `ForwardOnly`: no look-ahead; rows before an identifier's first report
//!     stay null.
//!   - `ForwardThenBackward`: leading rows take the first report; complete
//!     panels at the cost of look-ahead bias.
//! - Duplicate (identifier, date) keys collapse to one row and are reported as
//!   warnings instead of multiplying rows. A securities key keeps its first row
//!   with a return.
//! - Verification never alters the panel; its findings are warnings.
//!
//! Examples
//! ```rust,ignore
//! use panelmerge::{FillMode, PanelMerge};
//!
//! let pm = PanelMerge::builder()
//!     .fill_mode(FillMode::ForwardOnly)
//!     .build()?;
//! let report = pm.run(&source, &mut sink)?;
//! println!("{} rows written", report.stats.output_rows);
//!
//! let verification = pm.verify(&merged_table)?;
//! println!("{verification}");
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;

pub use crate::core::{PanelMerge, PanelMergeBuilder};
pub use pipeline::MergeOutcome;

pub use panelmerge_core::{
    CrosswalkResolver, DataQualityWarning, Decimal, FillMode, IdentifierMismatch,
    IdentifierResolver, InputKind, MergeReport, MergeStats, MismatchPolicy, MismatchReviewer,
    MismatchRow, NaiveDate, Panel, PanelConfig, PanelError, PanelRow, PanelSink, PanelSource,
    PolicyReviewer, ReviewDecision, Row, RowOrigin, SchemaConfig, Stage, Table, TickerAssociation,
    TickerConflict, TruncateResolver, Value, VerificationReport, VerificationSummary,
    VerifyConfig,
};
