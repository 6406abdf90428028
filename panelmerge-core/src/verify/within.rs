use std::collections::BTreeMap;

use crate::panel::dates::coerce_date;
use crate::table::Table;
use panelmerge_types::{IdentifierMismatch, MismatchPolicy, MismatchRow};

/// Decision taken after a mismatching identifier group has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Proceed to the next identifier group.
    Continue,
    /// Stop the within-identifier check immediately.
    Stop,
}

/// Receives each mismatching identifier group as it is found.
///
/// Interactive front ends prompt the operator; batch runs use a
/// [`PolicyReviewer`].
pub trait MismatchReviewer {
    /// Inspect a mismatch and decide whether to keep going.
    fn review(&mut self, mismatch: &IdentifierMismatch) -> ReviewDecision;
}

impl<F> MismatchReviewer for F
where
    F: FnMut(&IdentifierMismatch) -> ReviewDecision,
{
    fn review(&mut self, mismatch: &IdentifierMismatch) -> ReviewDecision {
        self(mismatch)
    }
}

/// Non-interactive reviewer driven by a [`MismatchPolicy`].
#[derive(Debug, Clone)]
pub struct PolicyReviewer {
    policy: MismatchPolicy,
    seen: usize,
}

impl PolicyReviewer {
    /// Create a reviewer for `policy`.
    #[must_use]
    pub const fn new(policy: MismatchPolicy) -> Self {
        Self { policy, seen: 0 }
    }
}

impl MismatchReviewer for PolicyReviewer {
    fn review(&mut self, _mismatch: &IdentifierMismatch) -> ReviewDecision {
        self.seen += 1;
        match self.policy {
            MismatchPolicy::StopOnFirst => ReviewDecision::Stop,
            MismatchPolicy::CollectUpTo(n) if self.seen >= n => ReviewDecision::Stop,
            _ => ReviewDecision::Continue,
        }
    }
}

pub(crate) struct WithinOutcome {
    pub mismatches: Vec<IdentifierMismatch>,
    pub stopped_early: bool,
}

/// Compare field A against field B inside every identifier group, in identifier
/// order. Rows missing either ticker or the identifier are ignored.
pub(crate) fn check_within(
    table: &Table,
    id_idx: usize,
    a_idx: usize,
    b_idx: usize,
    date_idx: Option<usize>,
    reviewer: &mut dyn MismatchReviewer,
) -> WithinOutcome {
    let mut groups: BTreeMap<String, Vec<MismatchRow>> = BTreeMap::new();
    for row in table.rows() {
        let (Some(id), Some(a), Some(b)) = (&row[id_idx], &row[a_idx], &row[b_idx]) else {
            continue;
        };
        let entry = groups.entry(id.to_key_string()).or_default();
        let (a, b) = (a.to_key_string(), b.to_key_string());
        if a != b {
            entry.push(MismatchRow {
                date: date_idx.and_then(|i| row[i].as_ref()).and_then(coerce_date),
                field_a: a,
                field_b: b,
            });
        }
    }

    let mut mismatches = Vec::new();
    let mut pending = groups.into_iter().filter(|(_, rows)| !rows.is_empty()).peekable();
    while let Some((identifier, mut rows)) = pending.next() {
        rows.sort_by_key(|r| r.date);
        let mismatch = IdentifierMismatch { identifier, rows };
        #[cfg(feature = "tracing")]
        tracing::warn!(
            identifier = %mismatch.identifier,
            rows = mismatch.rows.len(),
            "ticker fields disagree within identifier"
        );
        let decision = reviewer.review(&mismatch);
        mismatches.push(mismatch);
        if decision == ReviewDecision::Stop {
            return WithinOutcome {
                mismatches,
                stopped_early: pending.peek().is_some(),
            };
        }
    }
    WithinOutcome {
        mismatches,
        stopped_early: false,
    }
}
