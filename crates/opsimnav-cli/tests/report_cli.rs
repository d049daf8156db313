//! Integration tests for the `report` command.

mod common;

use std::fs;
use std::path::PathBuf;

use common::{cli, KCS_EXAMPLE};
use opsimnav_lib::{parse_report, ComplianceRating, REPORT_FILE_NAME};
use predicates::prelude::*;
use serde_json::Value;

#[test]
fn writes_and_verifies_report() {
    let (mut cmd, home) = cli();
    let out_dir = home.path().join("reports");

    let output = cmd
        .args(["--format", "json", "report"])
        .args(KCS_EXAMPLE)
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--verify")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let path = PathBuf::from(json["path"].as_str().unwrap());
    assert!(path.starts_with(&out_dir));
    assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);
    assert_eq!(
        path.parent().unwrap().file_name().unwrap(),
        json["id"].as_str().unwrap()
    );
    assert_eq!(json["verified"]["compliance_rating"], "C");

    let parsed = parse_report(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(parsed.ship_class, "KCS");
    assert_eq!(parsed.fuel_consumption_t_per_day, 66.5);
    assert_eq!(parsed.compliance_rating, ComplianceRating::C);
}

#[test]
fn text_output_names_the_file() {
    let (mut cmd, home) = cli();
    let out_dir = home.path().join("reports");

    cmd.arg("report")
        .args(KCS_EXAMPLE)
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"))
        .stdout(predicate::str::contains(REPORT_FILE_NAME))
        .stdout(predicate::str::contains("Verified:"));
}

#[test]
fn repeated_reports_do_not_overwrite_each_other() {
    let (_, home) = cli();
    let out_dir = home.path().join("reports");

    for _ in 0..2 {
        let (mut cmd, _other) = cli();
        cmd.arg("report")
            .args(KCS_EXAMPLE)
            .arg("--output-dir")
            .arg(&out_dir)
            .assert()
            .success();
    }

    let written: Vec<_> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path().join(REPORT_FILE_NAME))
        .collect();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|p| p.is_file()));
}

#[test]
fn report_dir_env_var_is_used() {
    let (mut cmd, home) = cli();
    let out_dir = home.path().join("from-env");

    cmd.env("OPSIMNAV_REPORT_DIR", &out_dir)
        .arg("report")
        .args(KCS_EXAMPLE)
        .assert()
        .success();

    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 1);
}

#[test]
fn unwritable_output_dir_fails() {
    let (mut cmd, home) = cli();
    let blocker = home.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();

    cmd.arg("report")
        .args(KCS_EXAMPLE)
        .arg("--output-dir")
        .arg(&blocker)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to write report"));
}

#[test]
fn invalid_scenario_writes_nothing() {
    let (mut cmd, home) = cli();
    let out_dir = home.path().join("reports");

    cmd.args(["report", "--class", "KCS", "--wave", "3", "--wind", "15"])
        .args(["--load", "120", "--trim", "0", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("engine_load_pct"));

    assert!(!out_dir.exists());
}
