use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::panel::frame::Panel;
use panelmerge_types::{PanelError, Stage};

/// Result of restricting an aligned panel to the securities' row set.
#[derive(Debug, Clone)]
pub struct Reduced {
    /// Surviving rows with drop-set columns removed.
    pub panel: Panel,
    /// Rows removed because their date is not a securities date.
    pub dropped_foreign_dates: usize,
    /// Rows removed because their return is null.
    pub dropped_null_returns: usize,
}

/// Keep only rows whose date is in `security_dates` and whose `return_column` is
/// non-null, then remove the `drop` columns.
///
/// A row failing both conditions is counted once, under foreign dates.
///
/// # Errors
/// Returns `Err(PanelError::Schema)` at stage `reduce` if the return column or a
/// drop column is absent.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "panelmerge::reduce",
        skip_all,
        fields(rows = panel.len(), dates = security_dates.len()),
    )
)]
pub fn reduce<S: AsRef<str>>(
    panel: Panel,
    security_dates: &BTreeSet<NaiveDate>,
    return_column: &str,
    drop: &[S],
) -> Result<Reduced, PanelError> {
    let ret_idx = panel
        .column_index(return_column)
        .ok_or_else(|| PanelError::schema(Stage::Reduce, return_column))?;
    let mut dropped_idx: Vec<usize> = drop
        .iter()
        .map(|name| {
            let name = name.as_ref();
            panel
                .column_index(name)
                .ok_or_else(|| PanelError::schema(Stage::Reduce, name))
        })
        .collect::<Result<_, _>>()?;
    dropped_idx.sort_unstable();
    dropped_idx.dedup();

    let (identifier, date, columns, rows) = panel.into_parts();
    let keep = |i: &usize| dropped_idx.binary_search(i).is_err();

    let mut dropped_foreign_dates = 0usize;
    let mut dropped_null_returns = 0usize;
    let mut out = Vec::with_capacity(rows.len());
    for mut row in rows {
        if !security_dates.contains(&row.date) {
            dropped_foreign_dates += 1;
            continue;
        }
        if row.cells[ret_idx].is_none() {
            dropped_null_returns += 1;
            continue;
        }
        if !dropped_idx.is_empty() {
            row.cells = row
                .cells
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep(i))
                .map(|(_, c)| c)
                .collect();
        }
        out.push(row);
    }

    let columns = columns
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep(i))
        .map(|(_, c)| c)
        .collect();

    #[cfg(feature = "tracing")]
    tracing::info!(
        kept = out.len(),
        dropped_foreign_dates,
        dropped_null_returns,
        "restricted panel to securities rows"
    );

    Ok(Reduced {
        panel: Panel::from_sorted(identifier, date, columns, out),
        dropped_foreign_dates,
        dropped_null_returns,
    })
}
