use crate::panel::frame::{Panel, PanelRow};
use crate::value::Value;
use panelmerge_types::{FillMode, PanelError, Stage};

fn forward_fill(group: &mut [PanelRow], idx: usize) {
    let mut last: Option<Value> = None;
    for row in group.iter_mut() {
        match &row.cells[idx] {
            Some(v) => last = Some(v.clone()),
            None => row.cells[idx] = last.clone(),
        }
    }
}

fn backward_fill(group: &mut [PanelRow], idx: usize) {
    let mut next: Option<Value> = None;
    for row in group.iter_mut().rev() {
        match &row.cells[idx] {
            Some(v) => next = Some(v.clone()),
            None => row.cells[idx] = next.clone(),
        }
    }
}

/// Roll fields down within each identifier group.
///
/// For every `(column, mode)` pair, nulls take the most recent earlier non-null
/// value of the same identifier. With [`FillMode::ForwardThenBackward`] any nulls
/// still leading the group then take the group's earliest non-null value. Values
/// never cross identifier groups, and a group with no value for a field stays
/// null. Relies on the panel's (identifier, date) ordering.
///
/// # Errors
/// Returns `Err(PanelError::Schema)` at stage `fill` if a column is absent.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "panelmerge::roll_down",
        skip_all,
        fields(rows = panel.len(), fields = fields.len()),
    )
)]
pub fn roll_down<S: AsRef<str>>(
    mut panel: Panel,
    fields: &[(S, FillMode)],
) -> Result<Panel, PanelError> {
    let targets: Vec<(usize, FillMode)> = fields
        .iter()
        .map(|(name, mode)| {
            let name = name.as_ref();
            panel
                .column_index(name)
                .map(|idx| (idx, *mode))
                .ok_or_else(|| PanelError::schema(Stage::Fill, name))
        })
        .collect::<Result<_, _>>()?;

    for group in panel.rows_mut().chunk_by_mut(|a, b| a.id == b.id) {
        for &(idx, mode) in &targets {
            forward_fill(group, idx);
            if mode == FillMode::ForwardThenBackward {
                backward_fill(group, idx);
            }
        }
    }
    Ok(panel)
}
