use panelmerge_core::{InputKind, PanelError, PanelSink, PanelSource, Table};
use panelmerge_mock::{FailingSink, MemorySink, MockBehavior, MockSource, fixtures};

#[test]
fn default_source_serves_both_fixtures() {
    let src = MockSource::new();
    let sec = src.load(InputKind::Securities).unwrap();
    let fund = src.load(InputKind::Fundamentals).unwrap();
    assert_eq!(sec.len(), fixtures::securities::ROW_COUNT);
    assert_eq!(fund.len(), fixtures::fundamentals::ROW_COUNT);
    assert_eq!(sec.columns(), fixtures::securities::COLUMNS);
    assert_eq!(src.load_count(), 2);
}

#[test]
fn without_reports_missing_input_naming_the_input() {
    let src = MockSource::new().without(InputKind::Fundamentals);
    assert!(src.load(InputKind::Securities).is_ok());
    let err = src.load(InputKind::Fundamentals).unwrap_err();
    assert!(matches!(
        err,
        PanelError::MissingInput { input: InputKind::Fundamentals, .. }
    ));
}

#[test]
fn custom_behaviors_override_fixtures() {
    let src = MockSource::new()
        .with_table(InputKind::Securities, Table::new(["cusip"]))
        .with_behavior(
            InputKind::Fundamentals,
            MockBehavior::Fail(PanelError::Other("boom".into())),
        );
    assert!(src.load(InputKind::Securities).unwrap().is_empty());
    assert_eq!(
        src.load(InputKind::Fundamentals).unwrap_err(),
        PanelError::Other("boom".into())
    );
}

#[test]
fn sinks_record_writes() {
    let mut mem = MemorySink::new();
    mem.write(&fixtures::securities::table()).unwrap();
    assert_eq!(mem.write_count(), 1);
    assert_eq!(mem.last().map(Table::len), Some(fixtures::securities::ROW_COUNT));

    let mut failing = FailingSink::new();
    assert!(matches!(
        failing.write(&Table::default()),
        Err(PanelError::Io { .. })
    ));
    assert_eq!(failing.attempts(), 1);
}
