//! Identifier normalization between sources with different identifier layouts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::panel::dates::coerce_date;
use crate::table::Table;
use crate::value::Value;
use panelmerge_types::{PanelError, Stage};

/// Maps a raw identifier from one source onto the identifier space of another.
///
/// The aligner only ever sees resolved identifiers, so swapping the heuristic
/// truncation for an exact crosswalk does not touch the join logic.
pub trait IdentifierResolver: Send + Sync {
    /// Short resolver name for logs.
    fn name(&self) -> &'static str;

    /// Resolve a raw identifier observed on `date` (if known).
    ///
    /// Returns `None` when the identifier has no counterpart; the row then has no
    /// join key.
    fn resolve(&self, raw: &str, date: Option<NaiveDate>) -> Option<String>;
}

/// Keep the first `width` characters of `raw`.
#[must_use]
pub fn truncate_identifier(raw: &str, width: usize) -> String {
    raw.chars().take(width).collect()
}

/// Heuristic resolver: truncate to the primary source's identifier width.
///
/// Nine-character CUSIPs carry a trailing check digit that eight-character CUSIPs
/// omit, so truncation usually lines them up. It is not an entity match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateResolver {
    width: usize,
}

impl TruncateResolver {
    /// Create a resolver truncating to `width` characters.
    #[must_use]
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    /// Configured width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}

impl Default for TruncateResolver {
    fn default() -> Self {
        Self::new(8)
    }
}

impl IdentifierResolver for TruncateResolver {
    fn name(&self) -> &'static str {
        "truncate"
    }

    fn resolve(&self, raw: &str, _date: Option<NaiveDate>) -> Option<String> {
        Some(truncate_identifier(raw, self.width))
    }
}

#[derive(Debug, Clone)]
struct CrosswalkEntry {
    canonical: String,
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
}

impl CrosswalkEntry {
    fn covers(&self, date: Option<NaiveDate>) -> bool {
        match date {
            None => self.valid_from.is_none() && self.valid_to.is_none(),
            Some(d) => {
                self.valid_from.is_none_or(|from| d >= from)
                    && self.valid_to.is_none_or(|to| d <= to)
            }
        }
    }
}

/// Exact lookup table from raw identifiers to canonical identifiers.
///
/// Entries may carry an inclusive validity range, so one raw identifier can map
/// to different canonical identifiers over time. The first entry (in insertion
/// order) covering the row date wins. Identifiers without a covering entry go to
/// the fallback resolver if one is set, otherwise they stay unresolved.
#[derive(Clone, Default)]
pub struct CrosswalkResolver {
    entries: HashMap<String, Vec<CrosswalkEntry>>,
    fallback: Option<Arc<dyn IdentifierResolver>>,
}

impl core::fmt::Debug for CrosswalkResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CrosswalkResolver")
            .field("entries", &self.entries.len())
            .field("fallback", &self.fallback.as_ref().map(|r| r.name()))
            .finish()
    }
}

impl CrosswalkResolver {
    /// Create an empty crosswalk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `raw` to `canonical` for all dates.
    #[must_use]
    pub fn with_entry(self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.with_ranged_entry(raw, canonical, None, None)
    }

    /// Map `raw` to `canonical` for dates within `[valid_from, valid_to]`.
    #[must_use]
    pub fn with_ranged_entry(
        mut self,
        raw: impl Into<String>,
        canonical: impl Into<String>,
        valid_from: Option<NaiveDate>,
        valid_to: Option<NaiveDate>,
    ) -> Self {
        self.entries
            .entry(raw.into())
            .or_default()
            .push(CrosswalkEntry {
                canonical: canonical.into(),
                valid_from,
                valid_to,
            });
        self
    }

    /// Resolve identifiers missing from the crosswalk with `fallback`.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn IdentifierResolver>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Number of distinct raw identifiers with at least one entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the crosswalk has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IdentifierResolver for CrosswalkResolver {
    fn name(&self) -> &'static str {
        "crosswalk"
    }

    fn resolve(&self, raw: &str, date: Option<NaiveDate>) -> Option<String> {
        self.entries
            .get(raw)
            .and_then(|list| list.iter().find(|e| e.covers(date)))
            .map(|e| e.canonical.clone())
            .or_else(|| self.fallback.as_ref()?.resolve(raw, date))
    }
}

/// Rewrite a table's identifier column through `resolver`.
///
/// Cells are coerced to strings first (see [`Value::to_key_string`]). Null or
/// unresolvable identifiers become null. When `date_column` is present its cells
/// are passed to the resolver; unreadable dates are passed as `None` and left for
/// the aligner to reject. The input table is not modified.
///
/// # Errors
/// Returns `Err(PanelError::Schema)` if the identifier column is absent.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "panelmerge::normalize",
        skip(table, resolver),
        fields(rows = table.len(), resolver = resolver.name()),
    )
)]
pub fn normalize_identifiers(
    table: &Table,
    identifier: &str,
    date_column: Option<&str>,
    resolver: &dyn IdentifierResolver,
) -> Result<Table, PanelError> {
    let id_idx = table.require_column(Stage::Normalize, identifier)?;
    let date_idx = date_column.and_then(|c| table.column_index(c));

    let (columns, mut rows) = table.clone().into_parts();
    let mut unresolved = 0usize;
    for row in &mut rows {
        let date = date_idx
            .and_then(|i| row[i].as_ref())
            .and_then(coerce_date);
        let resolved = row[id_idx].as_ref().and_then(|raw| {
            let out = resolver.resolve(&raw.to_key_string(), date);
            if out.is_none() {
                unresolved += 1;
            }
            out
        });
        row[id_idx] = resolved.map(Value::Text);
    }

    if unresolved > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(unresolved, resolver = resolver.name(), "identifiers left unresolved");
    }

    Ok(Table::from_parts_unchecked(columns, rows))
}
