//! Configuration types shared across the pipeline, the verifier, and collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How roll-down fields are filled within an identifier group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FillMode {
    /// Carry the most recent prior value forward; leading nulls stay null.
    ForwardOnly,
    /// Forward fill, then back-fill leading nulls from the earliest value in the group.
    /// No nulls remain in a group that has at least one value.
    #[default]
    ForwardThenBackward,
}

/// Column names that key the two sources and the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Identifier column shared by both sources (after normalization).
    pub identifier: String,
    /// Date-bearing column of the securities table.
    pub security_date: String,
    /// Date-bearing column of the fundamentals table.
    pub fundamental_date: String,
    /// Common date column name used in the merged output.
    pub date: String,
    /// Return column of the securities table; rows with a null return are dropped.
    pub security_return: String,
    /// Suffixes applied to non-key columns present in both sources
    /// (securities side, fundamentals side).
    pub suffixes: (String, String),
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            identifier: "cusip".into(),
            security_date: "caldt".into(),
            fundamental_date: "datadate".into(),
            date: "date".into(),
            security_return: "ret".into(),
            suffixes: ("_x".into(), "_y".into()),
        }
    }
}

/// Global configuration for the `PanelMerge` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Key column names.
    pub schema: SchemaConfig,
    /// Fundamental fields whose last known value persists until superseded.
    pub roll_down: Vec<String>,
    /// Columns carrying no discriminating information, removed from the output.
    pub drop: Vec<String>,
    /// Fill mode applied to every roll-down field without an override.
    pub fill_mode: FillMode,
    /// Per-field fill mode overrides.
    ///
    /// Keys must also appear in `roll_down`.
    pub fill_overrides: BTreeMap<String, FillMode>,
    /// Character width fundamentals identifiers are truncated to by the default resolver.
    pub identifier_width: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            schema: SchemaConfig::default(),
            roll_down: vec!["chq".into(), "actq".into(), "atq".into()],
            drop: vec![
                "curcdq".into(),
                "datafmt".into(),
                "indfmt".into(),
                "consol".into(),
            ],
            fill_mode: FillMode::default(),
            fill_overrides: BTreeMap::new(),
            identifier_width: 8,
        }
    }
}

impl PanelConfig {
    /// Effective fill mode for a roll-down field.
    #[must_use]
    pub fn fill_mode_for(&self, field: &str) -> FillMode {
        self.fill_overrides
            .get(field)
            .copied()
            .unwrap_or(self.fill_mode)
    }
}

/// What the within-identifier check does after each mismatching group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MismatchPolicy {
    /// Stop after the first mismatching identifier group.
    StopOnFirst,
    /// Visit every identifier group.
    #[default]
    CollectAll,
    /// Stop once this many mismatching groups have been collected; must be at
    /// least 1.
    CollectUpTo(usize),
}

/// Configuration for the identifier conflict verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Join identifier column.
    pub identifier: String,
    /// Ticker field A (grouped on for "tic conflicts").
    pub field_a: String,
    /// Ticker field B (grouped on for "ticker conflicts").
    pub field_b: String,
    /// Maximum number of conflicting groups rendered in detail per check.
    pub detail_limit: usize,
    /// Maximum number of multi-identifier tickers rendered as samples.
    pub sample_limit: usize,
    /// Policy for the within-identifier check when no interactive reviewer is used.
    pub policy: MismatchPolicy,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            identifier: "cusip".into(),
            field_a: "tic".into(),
            field_b: "ticker".into(),
            detail_limit: 10,
            sample_limit: 5,
            policy: MismatchPolicy::default(),
        }
    }
}
