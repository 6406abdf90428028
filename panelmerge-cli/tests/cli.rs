use std::fs;
use std::path::{Path, PathBuf};
use assert_cmd::Command;

use panelmerge::PanelSink;
use panelmerge_io::CsvSink;
use panelmerge_mock::fixtures;
use predicates::prelude::*;

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let sec = dir.join("crsp.csv");
    let fund = dir.join("compustat.csv");
    CsvSink::new(&sec)
        .write(&fixtures::securities::table())
        .unwrap();
    CsvSink::new(&fund)
        .write(&fixtures::fundamentals::table())
        .unwrap();
    (sec, fund)
}

fn merge_into(dir: &Path, extra: &[&str]) -> PathBuf {
    let (sec, fund) = write_inputs(dir);
    let out = dir.join("merged.csv");
    Command::cargo_bin("panelmerge")
        .unwrap()
        .arg("merge")
        .arg("--securities")
        .arg(&sec)
        .arg("--fundamentals")
        .arg(&fund)
        .arg("--output")
        .arg(&out)
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 9 rows"));
    out
}

#[test]
fn merge_writes_the_panel() {
    let dir = tempfile::tempdir().unwrap();
    let out = merge_into(dir.path(), &[]);
    let text = fs::read_to_string(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "cusip,date,permno,ret,prc,ticker,gvkey,tic,chq,actq,atq");
    assert!(lines.contains(&"MSFT5678,2020-01-31,10107,0.01,170.23,MSFT,,,130,180,300"));
}

#[test]
fn forward_fill_flag_leaves_leading_rows_empty() {
    let dir = tempfile::tempdir().unwrap();
    let out = merge_into(dir.path(), &["--fill", "forward"]);
    let text = fs::read_to_string(out).unwrap();
    assert!(text.lines().any(|l| l == "MSFT5678,2020-01-31,10107,0.01,170.23,MSFT,,,,,"));
}

#[test]
fn merge_with_missing_input_fails_naming_it() {
    let dir = tempfile::tempdir().unwrap();
    let (sec, _) = write_inputs(dir.path());
    Command::cargo_bin("panelmerge")
        .unwrap()
        .arg("merge")
        .arg("--securities")
        .arg(&sec)
        .arg("--fundamentals")
        .arg(dir.path().join("nope.csv"))
        .arg("--output")
        .arg(dir.path().join("merged.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingInput").and(predicate::str::contains("Fundamentals")));
    assert!(!dir.path().join("merged.csv").exists());
}

#[test]
fn merge_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let (sec, fund) = write_inputs(dir.path());
    let cfg = dir.path().join("cfg.json");
    fs::write(&cfg, r#"{"panel": {"identifier_width": 0}}"#).unwrap();
    Command::cargo_bin("panelmerge")
        .unwrap()
        .args(["merge", "--securities"])
        .arg(&sec)
        .arg("--fundamentals")
        .arg(&fund)
        .arg("--output")
        .arg(dir.path().join("merged.csv"))
        .arg("--config")
        .arg(&cfg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("identifier_width"));
}

#[test]
fn verify_reports_ticker_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let out = merge_into(dir.path(), &[]);
    Command::cargo_bin("panelmerge")
        .unwrap()
        .arg("verify")
        .arg("--input")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("TICKER 'XYZ' appears with different TICs:"))
        .stdout(predicate::str::contains("Total ticker conflicts found: 1"));
}

#[test]
fn verify_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = merge_into(dir.path(), &[]);
    let assert = Command::cargo_bin("panelmerge")
        .unwrap()
        .args(["verify", "--json", "--policy", "first", "--input"])
        .arg(&out)
        .assert()
        .success();
    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["summary"]["ticker_conflicts"], 1);
    assert_eq!(report["mismatches"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["stopped_early"], true);
}

#[test]
fn interactive_verify_stops_on_no() {
    let dir = tempfile::tempdir().unwrap();
    let out = merge_into(dir.path(), &[]);
    Command::cargo_bin("panelmerge")
        .unwrap()
        .args(["verify", "--interactive", "--json", "--input"])
        .arg(&out)
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Continue checking? (y/n)"))
        .stdout(predicate::str::contains("\"stopped_early\": true"));
}

#[test]
fn bad_policy_is_a_usage_error() {
    Command::cargo_bin("panelmerge")
        .unwrap()
        .args(["verify", "--input", "x.csv", "--policy", "some"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected `all`, `first`, or a number"));
}

#[test]
fn zero_policy_is_a_usage_error() {
    Command::cargo_bin("panelmerge")
        .unwrap()
        .args(["verify", "--input", "x.csv", "--policy", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));
}
