use panelmerge_types::{
    DataQualityWarning, IdentifierMismatch, MismatchRow, TickerAssociation, TickerConflict,
    VerificationReport, VerificationSummary,
};

fn assoc(a: &str, b: &str, id: &str) -> TickerAssociation {
    TickerAssociation {
        field_a: a.into(),
        field_b: b.into(),
        identifier: id.into(),
    }
}

fn report_with_conflicts(n: usize) -> VerificationReport {
    let ticker_conflicts: Vec<TickerConflict> = (0..n)
        .map(|i| TickerConflict {
            key: format!("T{i:02}"),
            associations: vec![
                assoc(&format!("A{i}"), &format!("T{i:02}"), "00000001"),
                assoc(&format!("B{i}"), &format!("T{i:02}"), "00000002"),
            ],
        })
        .collect();
    VerificationReport {
        labels: ("cusip".into(), "tic".into(), "ticker".into()),
        summary: VerificationSummary {
            ticker_conflicts: ticker_conflicts.len(),
            ..VerificationSummary::default()
        },
        ticker_conflicts,
        detail_limit: 10,
        sample_limit: 5,
        ..VerificationReport::default()
    }
}

#[test]
fn rendering_caps_detail_and_summarizes_remainder() {
    let report = report_with_conflicts(13);
    let text = report.to_string();

    assert!(text.contains("TICKER 'T09' appears with different TICs"));
    assert!(!text.contains("TICKER 'T10' appears"));
    assert!(text.contains("... and 3 more ticker conflicts"));
    assert!(text.contains("Total ticker conflicts found: 13"));
}

#[test]
fn clean_report_has_no_warnings() {
    let report = report_with_conflicts(0);
    assert!(report.is_clean());
    assert!(report.warnings().is_empty());
}

#[test]
fn warnings_flatten_every_finding() {
    let mut report = report_with_conflicts(1);
    report.mismatches.push(IdentifierMismatch {
        identifier: "12345678".into(),
        rows: vec![MismatchRow {
            date: None,
            field_a: "XY1".into(),
            field_b: "XYZ".into(),
        }],
    });

    let warnings = report.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(matches!(
        &warnings[0],
        DataQualityWarning::IdentifierMismatch { identifier } if identifier == "12345678"
    ));
    assert!(matches!(
        &warnings[1],
        DataQualityWarning::TickerConflict { ticker } if ticker == "T00"
    ));
}
