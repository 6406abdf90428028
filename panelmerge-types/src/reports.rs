//! Report envelopes produced by the pipeline and the verifier.

use core::fmt;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PanelError;

/// Row counts observed at each pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeStats {
    /// Rows in the securities input.
    pub security_rows: usize,
    /// Rows in the fundamentals input.
    pub fundamental_rows: usize,
    /// Input rows skipped because their identifier or date was null.
    pub skipped_keys: usize,
    /// Input rows discarded because their (identifier, date) key repeated.
    pub duplicate_keys: usize,
    /// Rows in the aligned (outer-joined) panel.
    pub aligned_rows: usize,
    /// Rows removed because their date is not a securities date.
    pub dropped_foreign_dates: usize,
    /// Rows removed because their return is null.
    pub dropped_null_returns: usize,
    /// Rows in the final panel.
    pub output_rows: usize,
}

/// Summary of one pipeline run.
///
/// Carries per-stage row counts and any non-fatal warnings encountered while
/// keying the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MergeReport {
    /// Per-stage row counts.
    pub stats: MergeStats,
    /// Non-fatal issues encountered while building the panel.
    pub warnings: Vec<PanelError>,
}

/// One row of an identifier group whose two ticker fields disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchRow {
    /// Row date, if the panel carries one.
    pub date: Option<NaiveDate>,
    /// Value of ticker field A.
    pub field_a: String,
    /// Value of ticker field B.
    pub field_b: String,
}

/// An identifier group whose ticker fields disagree on at least one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierMismatch {
    /// The join identifier of the group.
    pub identifier: String,
    /// Rows where field A differs from field B.
    pub rows: Vec<MismatchRow>,
}

/// A distinct (field A, field B, identifier) association.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickerAssociation {
    /// Value of ticker field A.
    pub field_a: String,
    /// Value of ticker field B.
    pub field_b: String,
    /// Join identifier.
    pub identifier: String,
}

/// A ticker value that associates with more than one counterpart.
///
/// For a ticker conflict `key` is a field-B value seen with several field-A values;
/// for a tic conflict it is a field-A value seen with several field-B values; for a
/// multi-identifier ticker it is a field-B value seen with several identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConflict {
    /// Grouping value.
    pub key: String,
    /// Every distinct association that shares the grouping value.
    pub associations: Vec<TickerAssociation>,
}

/// Structured counts returned by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Field-B values seen with more than one field-A value.
    pub ticker_conflicts: usize,
    /// Field-A values seen with more than one field-B value.
    pub tic_conflicts: usize,
    /// Field-B values seen with more than one identifier.
    pub multi_identifier_tickers: usize,
    /// Distinct (A, B, identifier) associations.
    pub unique_pairs: usize,
    /// Distinct field-B values.
    pub unique_field_b: usize,
    /// Distinct field-A values.
    pub unique_field_a: usize,
}

/// Non-fatal data quality finding raised by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Ticker fields disagree within one identifier group.
    IdentifierMismatch {
        /// Offending identifier.
        identifier: String,
    },
    /// One field-B value maps to several field-A values.
    TickerConflict {
        /// Offending field-B value.
        ticker: String,
    },
    /// One field-A value maps to several field-B values.
    TicConflict {
        /// Offending field-A value.
        tic: String,
    },
    /// One field-B value maps to several identifiers.
    MultiIdentifierTicker {
        /// Offending field-B value.
        ticker: String,
        /// Number of distinct identifiers.
        identifiers: usize,
    },
}

/// Full verifier output: summary counts plus the detail behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VerificationReport {
    /// Column labels used for rendering (identifier, field A, field B).
    pub labels: (String, String, String),
    /// Identifier groups with disagreeing ticker fields, in identifier order.
    pub mismatches: Vec<IdentifierMismatch>,
    /// True if the within-identifier check was stopped before visiting every group.
    pub stopped_early: bool,
    /// Field-B values seen with several field-A values.
    pub ticker_conflicts: Vec<TickerConflict>,
    /// Field-A values seen with several field-B values.
    pub tic_conflicts: Vec<TickerConflict>,
    /// Field-B values seen with several identifiers.
    pub multi_identifier_tickers: Vec<TickerConflict>,
    /// Structured counts.
    pub summary: VerificationSummary,
    /// Maximum conflicting groups rendered per check.
    pub detail_limit: usize,
    /// Maximum multi-identifier samples rendered.
    pub sample_limit: usize,
}

impl VerificationReport {
    /// True if no finding of any kind was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
            && self.ticker_conflicts.is_empty()
            && self.tic_conflicts.is_empty()
            && self.multi_identifier_tickers.is_empty()
    }

    /// Flatten every finding into a list of data quality warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<DataQualityWarning> {
        let mut out = Vec::new();
        out.extend(
            self.mismatches
                .iter()
                .map(|m| DataQualityWarning::IdentifierMismatch {
                    identifier: m.identifier.clone(),
                }),
        );
        out.extend(
            self.ticker_conflicts
                .iter()
                .map(|c| DataQualityWarning::TickerConflict {
                    ticker: c.key.clone(),
                }),
        );
        out.extend(
            self.tic_conflicts
                .iter()
                .map(|c| DataQualityWarning::TicConflict { tic: c.key.clone() }),
        );
        out.extend(self.multi_identifier_tickers.iter().map(|c| {
            DataQualityWarning::MultiIdentifierTicker {
                ticker: c.key.clone(),
                identifiers: c
                    .associations
                    .iter()
                    .map(|a| a.identifier.as_str())
                    .collect::<BTreeSet<_>>()
                    .len(),
            }
        }));
        out
    }
}

fn write_conflicts(
    f: &mut fmt::Formatter<'_>,
    report: &VerificationReport,
    conflicts: &[TickerConflict],
    key_label: &str,
    other_label: &str,
    noun: &str,
) -> fmt::Result {
    let (id_label, a_label, b_label) = &report.labels;
    for c in conflicts.iter().take(report.detail_limit) {
        writeln!(
            f,
            "\n{} '{}' appears with different {}s:",
            key_label.to_uppercase(),
            c.key,
            other_label.to_uppercase()
        )?;
        for a in &c.associations {
            writeln!(
                f,
                "  {}: {} | {}: {} | {}: {}",
                id_label.to_uppercase(),
                a.identifier,
                a_label.to_uppercase(),
                a.field_a,
                b_label.to_uppercase(),
                a.field_b
            )?;
        }
    }
    if conflicts.len() > report.detail_limit {
        writeln!(
            f,
            "\n... and {} more {noun} conflicts",
            conflicts.len() - report.detail_limit
        )?;
    }
    writeln!(f, "\nTotal {noun} conflicts found: {}", conflicts.len())
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (id_label, a_label, b_label) = &self.labels;

        writeln!(f, "=== {} / {} MISMATCHES WITHIN {} ===", a_label, b_label, id_label)?;
        for m in &self.mismatches {
            writeln!(f, "\n{} {}:", id_label.to_uppercase(), m.identifier)?;
            for r in &m.rows {
                let date = r.date.map_or_else(|| "-".to_string(), |d| d.to_string());
                writeln!(f, "  {date}  {a_label}={}  {b_label}={}", r.field_a, r.field_b)?;
            }
        }
        if self.stopped_early {
            writeln!(f, "\n(stopped after {} mismatching groups)", self.mismatches.len())?;
        }

        writeln!(
            f,
            "\n=== CHECKING FOR {} / {} CONFLICTS ACROSS DIFFERENT {}s ===",
            a_label.to_uppercase(),
            b_label.to_uppercase(),
            id_label.to_uppercase()
        )?;
        writeln!(
            f,
            "\n1. Same {} with different {}s:",
            b_label.to_uppercase(),
            a_label.to_uppercase()
        )?;
        write_conflicts(f, self, &self.ticker_conflicts, b_label, a_label, b_label)?;
        writeln!(
            f,
            "\n2. Same {} with different {}s:",
            a_label.to_uppercase(),
            b_label.to_uppercase()
        )?;
        write_conflicts(f, self, &self.tic_conflicts, a_label, b_label, a_label)?;

        writeln!(
            f,
            "\n3. {}s appearing with multiple {}s: {}",
            b_label.to_uppercase(),
            id_label.to_uppercase(),
            self.multi_identifier_tickers.len()
        )?;
        for c in self.multi_identifier_tickers.iter().take(self.sample_limit) {
            writeln!(f, "\n{} '{}':", b_label.to_uppercase(), c.key)?;
            for a in &c.associations {
                writeln!(
                    f,
                    "  {}: {} | {}: {}",
                    id_label.to_uppercase(),
                    a.identifier,
                    a_label.to_uppercase(),
                    a.field_a
                )?;
            }
        }

        let s = &self.summary;
        writeln!(f, "\n=== SUMMARY ===")?;
        writeln!(f, "Unique {b_label}-{id_label} pairs: {}", s.unique_pairs)?;
        writeln!(f, "Unique {b_label}s: {}", s.unique_field_b)?;
        writeln!(f, "Unique {a_label}s: {}", s.unique_field_a)?;
        writeln!(
            f,
            "{b_label}s with multiple {id_label}s: {}",
            s.multi_identifier_tickers
        )?;
        writeln!(
            f,
            "{b_label} conflicts (same {b_label}, different {a_label}): {}",
            s.ticker_conflicts
        )?;
        write!(
            f,
            "{a_label} conflicts (same {a_label}, different {b_label}): {}",
            s.tic_conflicts
        )
    }
}
