//! Input and stage labels usable across crates.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The two source tables a pipeline run consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Primary, monthly security-return table.
    Securities,
    /// Secondary, quarterly firm-fundamentals table.
    Fundamentals,
}

impl InputKind {
    /// Returns the stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Securities => "securities",
            Self::Fundamentals => "fundamentals",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline component that raised a schema error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Identifier normalization.
    Normalize,
    /// Outer join on (identifier, date).
    Align,
    /// Roll-down fill of fundamentals.
    Fill,
    /// Row-set reduction and column drop.
    Reduce,
    /// Identifier conflict verification.
    Verify,
}

impl Stage {
    /// Returns the stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normalize => "normalize",
            Self::Align => "align",
            Self::Fill => "fill",
            Self::Reduce => "reduce",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
