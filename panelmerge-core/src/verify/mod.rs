//! Identifier conflict verification over a merged panel.
//!
//! The join identifier is only trustworthy if it stands for one economic entity.
//! Two independently sourced ticker fields give an outside view of that: they
//! should agree within an identifier group, and a ticker should not map to
//! several counterparts across groups. Verification is read-only and reports
//! findings; it never alters the panel.
/// Cross-identifier ticker conflicts.
mod cross;
/// Within-identifier ticker mismatches and reviewer hooks.
mod within;

pub use within::{MismatchReviewer, PolicyReviewer, ReviewDecision};

use crate::table::Table;
use panelmerge_types::{
    PanelError, Stage, VerificationReport, VerificationSummary, VerifyConfig,
};

/// Verify a panel, deciding after each within-identifier mismatch with `reviewer`.
///
/// The table is read as persisted: it must carry the identifier and both ticker
/// columns. If `date_column` names an existing column its values are attached to
/// mismatch rows.
///
/// All conflict counts cover every conflicting group; `cfg.detail_limit` and
/// `cfg.sample_limit` only cap what the report renders.
///
/// # Errors
/// Returns `Err(PanelError::Schema)` at stage `verify` if the identifier or a
/// ticker column is absent.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "panelmerge::verify",
        skip_all,
        fields(rows = table.len(), field_a = %cfg.field_a, field_b = %cfg.field_b),
    )
)]
pub fn verify_with_reviewer(
    table: &Table,
    cfg: &VerifyConfig,
    date_column: Option<&str>,
    reviewer: &mut dyn MismatchReviewer,
) -> Result<VerificationReport, PanelError> {
    let id_idx = table.require_column(Stage::Verify, &cfg.identifier)?;
    let a_idx = table.require_column(Stage::Verify, &cfg.field_a)?;
    let b_idx = table.require_column(Stage::Verify, &cfg.field_b)?;
    let date_idx = date_column.and_then(|c| table.column_index(c));

    let within = within::check_within(table, id_idx, a_idx, b_idx, date_idx, reviewer);
    let cross = cross::check_across(table, id_idx, a_idx, b_idx);

    let summary = VerificationSummary {
        ticker_conflicts: cross.ticker_conflicts.len(),
        tic_conflicts: cross.tic_conflicts.len(),
        multi_identifier_tickers: cross.multi_identifier_tickers.len(),
        unique_pairs: cross.associations.len(),
        unique_field_b: cross.unique_field_b,
        unique_field_a: cross.unique_field_a,
    };

    #[cfg(feature = "tracing")]
    if summary.ticker_conflicts + summary.tic_conflicts + summary.multi_identifier_tickers > 0 {
        tracing::warn!(
            ticker_conflicts = summary.ticker_conflicts,
            tic_conflicts = summary.tic_conflicts,
            multi_identifier_tickers = summary.multi_identifier_tickers,
            "join identifier may not map 1:1 to economic entities"
        );
    }

    Ok(VerificationReport {
        labels: (cfg.identifier.clone(), cfg.field_a.clone(), cfg.field_b.clone()),
        mismatches: within.mismatches,
        stopped_early: within.stopped_early,
        ticker_conflicts: cross.ticker_conflicts,
        tic_conflicts: cross.tic_conflicts,
        multi_identifier_tickers: cross.multi_identifier_tickers,
        summary,
        detail_limit: cfg.detail_limit,
        sample_limit: cfg.sample_limit,
    })
}

/// Verify a panel non-interactively, following `cfg.policy`.
///
/// # Errors
/// See [`verify_with_reviewer`].
pub fn verify(
    table: &Table,
    cfg: &VerifyConfig,
    date_column: Option<&str>,
) -> Result<VerificationReport, PanelError> {
    let mut reviewer = PolicyReviewer::new(cfg.policy);
    verify_with_reviewer(table, cfg, date_column, &mut reviewer)
}
