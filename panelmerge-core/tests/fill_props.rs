use chrono::NaiveDate;
use panelmerge_core::{
    Decimal, FillMode, Panel, PanelError, PanelRow, RowOrigin, Stage, Value, roll_down,
};
use proptest::prelude::*;

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap() + chrono::Days::new(i as u64)
}

fn num(v: i64) -> Value {
    Value::Number(Decimal::new(v, 0))
}

/// One column `atq`; `groups` holds the per-identifier cell sequences in date order.
fn panel(groups: &[Vec<Option<i64>>]) -> Panel {
    let mut rows = Vec::new();
    for (g, cells) in groups.iter().enumerate() {
        for (i, c) in cells.iter().enumerate() {
            rows.push(PanelRow {
                id: format!("ID{g:03}"),
                date: day(i),
                origin: RowOrigin::Both,
                cells: vec![c.map(num)],
            });
        }
    }
    Panel::from_rows("cusip", "date", vec!["atq".to_string()], rows).unwrap()
}

fn column(p: &Panel) -> Vec<Vec<Option<Value>>> {
    p.groups()
        .map(|g| g.iter().map(|r| r.cells[0].clone()).collect())
        .collect()
}

fn arb_groups() -> impl Strategy<Value = Vec<Vec<Option<i64>>>> {
    proptest::collection::vec(
        proptest::collection::vec(proptest::option::of(0i64..50), 1..12),
        1..6,
    )
}

proptest! {
    #[test]
    fn forward_only_takes_most_recent_earlier_value(groups in arb_groups()) {
        let filled = roll_down(panel(&groups), &[("atq", FillMode::ForwardOnly)]).unwrap();
        for (orig, out) in groups.iter().zip(column(&filled)) {
            let mut last = None;
            for (o, v) in orig.iter().zip(out) {
                if let Some(x) = o {
                    last = Some(*x);
                    prop_assert_eq!(v, Some(num(*x)));
                } else {
                    prop_assert_eq!(v, last.map(num));
                }
            }
        }
    }

    #[test]
    fn forward_backward_fills_every_group_with_a_value(groups in arb_groups()) {
        let filled = roll_down(panel(&groups), &[("atq", FillMode::ForwardThenBackward)]).unwrap();
        for (orig, out) in groups.iter().zip(column(&filled)) {
            let first = orig.iter().flatten().next().copied();
            match first {
                // A group with no value for the field stays null.
                None => prop_assert!(out.iter().all(Option::is_none)),
                Some(f) => {
                    prop_assert!(out.iter().all(Option::is_some));
                    let lead = orig.iter().take_while(|c| c.is_none()).count();
                    for v in &out[..lead] {
                        prop_assert_eq!(v.clone(), Some(num(f)));
                    }
                }
            }
        }
    }

    #[test]
    fn non_null_cells_are_never_overwritten(groups in arb_groups()) {
        let filled = roll_down(panel(&groups), &[("atq", FillMode::ForwardThenBackward)]).unwrap();
        for (orig, out) in groups.iter().zip(column(&filled)) {
            for (o, v) in orig.iter().zip(out) {
                if let Some(x) = o {
                    prop_assert_eq!(v, Some(num(*x)));
                }
            }
        }
    }
}

#[test]
fn values_never_cross_identifier_groups() {
    let groups = vec![vec![Some(7), None], vec![None, None], vec![None, Some(3)]];
    let filled = roll_down(panel(&groups), &[("atq", FillMode::ForwardThenBackward)]).unwrap();
    let out = column(&filled);
    assert_eq!(out[0], vec![Some(num(7)), Some(num(7))]);
    assert_eq!(out[1], vec![None, None]);
    assert_eq!(out[2], vec![Some(num(3)), Some(num(3))]);
}

#[test]
fn missing_fill_column_is_a_schema_error() {
    let err = roll_down(panel(&[vec![Some(1)]]), &[("chq", FillMode::ForwardOnly)]).unwrap_err();
    assert_eq!(err, PanelError::schema(Stage::Fill, "chq"));
}

#[test]
fn empty_field_list_is_identity() {
    let p = panel(&[vec![None, Some(2)]]);
    let fields: [(&str, FillMode); 0] = [];
    let out = roll_down(p.clone(), &fields).unwrap();
    assert_eq!(column(&out), column(&p));
}
