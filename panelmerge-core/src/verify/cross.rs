use std::collections::{BTreeMap, BTreeSet};

use crate::table::Table;
use panelmerge_types::{TickerAssociation, TickerConflict};

pub(crate) struct CrossOutcome {
    pub associations: BTreeSet<TickerAssociation>,
    pub ticker_conflicts: Vec<TickerConflict>,
    pub tic_conflicts: Vec<TickerConflict>,
    pub multi_identifier_tickers: Vec<TickerConflict>,
    pub unique_field_a: usize,
    pub unique_field_b: usize,
}

/// Distinct (A, B, identifier) associations over rows where all three are present.
pub(crate) fn associations(
    table: &Table,
    id_idx: usize,
    a_idx: usize,
    b_idx: usize,
) -> BTreeSet<TickerAssociation> {
    table
        .rows()
        .iter()
        .filter_map(|row| match (&row[a_idx], &row[b_idx], &row[id_idx]) {
            (Some(a), Some(b), Some(id)) => Some(TickerAssociation {
                field_a: a.to_key_string(),
                field_b: b.to_key_string(),
                identifier: id.to_key_string(),
            }),
            _ => None,
        })
        .collect()
}

/// Group associations by `key`, keeping groups where `counterpart` takes more than
/// one distinct value. Groups come out in key order.
fn conflicts<K, C>(
    associations: &BTreeSet<TickerAssociation>,
    key: K,
    counterpart: C,
) -> (usize, Vec<TickerConflict>)
where
    K: Fn(&TickerAssociation) -> &str,
    C: Fn(&TickerAssociation) -> &str,
{
    let mut groups: BTreeMap<&str, Vec<&TickerAssociation>> = BTreeMap::new();
    for a in associations {
        groups.entry(key(a)).or_default().push(a);
    }
    let distinct_keys = groups.len();
    let out = groups
        .into_iter()
        .filter(|(_, members)| {
            members
                .iter()
                .map(|&m| counterpart(m))
                .collect::<BTreeSet<_>>()
                .len()
                > 1
        })
        .map(|(k, members)| TickerConflict {
            key: k.to_string(),
            associations: members.into_iter().cloned().collect(),
        })
        .collect();
    (distinct_keys, out)
}

pub(crate) fn check_across(
    table: &Table,
    id_idx: usize,
    a_idx: usize,
    b_idx: usize,
) -> CrossOutcome {
    let associations = associations(table, id_idx, a_idx, b_idx);

    let (unique_field_b, ticker_conflicts) =
        conflicts(&associations, |a| a.field_b.as_str(), |a| a.field_a.as_str());
    let (unique_field_a, tic_conflicts) =
        conflicts(&associations, |a| a.field_a.as_str(), |a| a.field_b.as_str());
    let (_, multi_identifier_tickers) =
        conflicts(&associations, |a| a.field_b.as_str(), |a| a.identifier.as_str());

    #[cfg(feature = "tracing")]
    for c in &ticker_conflicts {
        tracing::debug!(ticker = %c.key, associations = c.associations.len(), "ticker conflict");
    }
    #[cfg(feature = "tracing")]
    for c in &tic_conflicts {
        tracing::debug!(tic = %c.key, associations = c.associations.len(), "tic conflict");
    }

    CrossOutcome {
        associations,
        ticker_conflicts,
        tic_conflicts,
        multi_identifier_tickers,
        unique_field_a,
        unique_field_b,
    }
}
