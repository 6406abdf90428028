use std::collections::{BTreeMap, HashMap, HashSet, btree_map::Entry};

use chrono::NaiveDate;

use crate::panel::dates::date_cell;
use crate::panel::frame::{Panel, PanelRow, RowOrigin};
use crate::table::{Row, Table};
use panelmerge_types::{InputKind, PanelError, SchemaConfig, Stage};

type Key = (String, NaiveDate);

/// Rows of one input keyed by (identifier, date).
///
/// The first appearance of a key wins, unless a `prefer` column is given: then
/// the first row with a value in that column wins, falling back to the first row.
struct Keyed {
    columns: Vec<String>,
    rows: BTreeMap<Key, Row>,
    skipped: usize,
    duplicates: usize,
}

fn key_table(
    table: &Table,
    input: InputKind,
    identifier: &str,
    date: &str,
    prefer: Option<&str>,
    warnings: &mut Vec<PanelError>,
) -> Result<Keyed, PanelError> {
    let id_idx = table.require_column(Stage::Align, identifier)?;
    let date_idx = table.require_column(Stage::Align, date)?;

    let columns: Vec<String> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_idx && *i != date_idx)
        .map(|(_, c)| c.clone())
        .collect();
    let prefer_pos = prefer.and_then(|p| columns.iter().position(|c| c == p));
    let kept = match (prefer, prefer_pos) {
        (Some(p), Some(_)) => format!("first row with `{p}` kept"),
        _ => "first occurrence kept".to_string(),
    };

    let mut rows: BTreeMap<Key, Row> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;
    let mut reported: HashSet<Key> = HashSet::new();

    for (n, row) in table.rows().iter().enumerate() {
        let id = row[id_idx].as_ref().map(crate::Value::to_key_string);
        let day = date_cell(row[date_idx].as_ref(), date)?;
        let (Some(id), Some(day)) = (id, day) else {
            skipped += 1;
            continue;
        };
        let cells: Row = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_idx && *i != date_idx)
            .map(|(_, c)| c.clone())
            .collect();
        match rows.entry((id, day)) {
            Entry::Vacant(v) => {
                v.insert(cells);
            }
            Entry::Occupied(mut o) => {
                duplicates += 1;
                if reported.insert(o.key().clone()) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%input, identifier = %o.key().0, date = %o.key().1, row = n, "duplicate key collapsed");
                    warnings.push(PanelError::Data(format!(
                        "{input}: duplicate key ({}, {}) at row {n}; {kept}",
                        o.key().0,
                        o.key().1
                    )));
                }
                if let Some(p) = prefer_pos {
                    if o.get()[p].is_none() && cells[p].is_some() {
                        o.insert(cells);
                    }
                }
            }
        }
    }

    if skipped > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(%input, skipped, "rows without identifier or date skipped");
        warnings.push(PanelError::Data(format!(
            "{input}: {skipped} rows without identifier or date skipped"
        )));
    }

    Ok(Keyed {
        columns,
        rows,
        skipped,
        duplicates,
    })
}

/// Result of aligning the two inputs.
#[derive(Debug, Clone)]
pub struct Aligned {
    /// Outer-joined panel sorted by (identifier, date).
    pub panel: Panel,
    /// Input rows skipped for lack of an identifier or date.
    pub skipped_keys: usize,
    /// Input rows discarded as repeated keys.
    pub duplicate_keys: usize,
    /// Non-fatal findings.
    pub warnings: Vec<PanelError>,
    renames: HashMap<(InputKind, String), String>,
}

impl Aligned {
    /// Name a source column carries in the merged panel.
    ///
    /// Columns present in both inputs receive the configured suffixes; all other
    /// columns keep their name. Returns `None` if `input` has no such column.
    #[must_use]
    pub fn column_name(&self, input: InputKind, original: &str) -> Option<&str> {
        self.renames
            .get(&(input, original.to_string()))
            .map(String::as_str)
    }
}

/// Outer-join securities and (normalized) fundamentals on (identifier, date).
///
/// Each table's date-bearing column is renamed to `schema.date` before keying.
/// The merged schema lists the securities' non-key columns followed by the
/// fundamentals' non-key columns; names occurring on both sides get
/// `schema.suffixes`. Cells missing on one side are null. Rows without an
/// identifier or date are skipped, and repeated keys within one input collapse to
/// a single row; both are recorded as warnings. A repeated securities key keeps
/// its first row with a non-null `schema.security_return`, or its first row if
/// none has one; a repeated fundamentals key keeps its first occurrence.
///
/// # Errors
/// - `PanelError::Schema` if either table lacks the identifier or its date column.
/// - `PanelError::Data` if a date cell cannot be read, or the rename collides.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "panelmerge::align",
        skip_all,
        fields(securities = securities.len(), fundamentals = fundamentals.len()),
    )
)]
pub fn align(
    securities: &Table,
    fundamentals: &Table,
    schema: &SchemaConfig,
) -> Result<Aligned, PanelError> {
    let securities = securities.renamed(Stage::Align, &schema.security_date, &schema.date)?;
    let fundamentals =
        fundamentals.renamed(Stage::Align, &schema.fundamental_date, &schema.date)?;

    let mut warnings = Vec::new();
    let sec = key_table(
        &securities,
        InputKind::Securities,
        &schema.identifier,
        &schema.date,
        Some(schema.security_return.as_str()),
        &mut warnings,
    )?;
    let fund = key_table(
        &fundamentals,
        InputKind::Fundamentals,
        &schema.identifier,
        &schema.date,
        None,
        &mut warnings,
    )?;

    let shared: HashSet<&String> = sec
        .columns
        .iter()
        .filter(|c| fund.columns.contains(c))
        .collect();
    let mut renames = HashMap::new();
    let mut columns = Vec::with_capacity(sec.columns.len() + fund.columns.len());
    for (input, cols, suffix) in [
        (InputKind::Securities, &sec.columns, &schema.suffixes.0),
        (InputKind::Fundamentals, &fund.columns, &schema.suffixes.1),
    ] {
        for c in cols {
            let merged = if shared.contains(c) {
                format!("{c}{suffix}")
            } else {
                c.clone()
            };
            renames.insert((input, c.clone()), merged.clone());
            columns.push(merged);
        }
    }

    let sec_width = sec.columns.len();
    let fund_width = fund.columns.len();
    let mut joined: BTreeMap<Key, (Option<Row>, Option<Row>)> = BTreeMap::new();
    for (k, r) in sec.rows {
        joined.entry(k).or_default().0 = Some(r);
    }
    for (k, r) in fund.rows {
        joined.entry(k).or_default().1 = Some(r);
    }

    let rows: Vec<PanelRow> = joined
        .into_iter()
        .map(|((id, date), (s, f))| {
            let origin = match (&s, &f) {
                (Some(_), Some(_)) => RowOrigin::Both,
                (Some(_), None) => RowOrigin::Security,
                _ => RowOrigin::Fundamental,
            };
            let mut cells: Row = s.unwrap_or_else(|| vec![None; sec_width]);
            cells.extend(f.unwrap_or_else(|| vec![None; fund_width]));
            PanelRow {
                id,
                date,
                origin,
                cells,
            }
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::info!(rows = rows.len(), columns = columns.len(), "merged securities and fundamentals");

    Ok(Aligned {
        panel: Panel::from_sorted(schema.identifier.clone(), schema.date.clone(), columns, rows),
        skipped_keys: sec.skipped + fund.skipped,
        duplicate_keys: sec.duplicates + fund.duplicates,
        warnings,
        renames,
    })
}
