use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_malformed_rows_are_skipped() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("calls.csv");
    common::write_script(
        &script,
        &[
            ["fund_airline", "0xa1", "", "", "", "", "4"],
            // Unknown operation
            ["teleport", "0xa1", "", "", "", "", ""],
            // Non-numeric timestamp
            ["register_flight", "0xa1", "", "", "ND1", "soon", ""],
            ["fund_airline", "0xa1", "", "", "", "", "6"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("flightsurety"));
    cmd.arg(&script)
        .arg("--config")
        .arg("tests/fixtures/config.json");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading call"))
        .stdout(predicate::str::contains("0xa1,Genesis Air,true,true,10,0"));
}

#[test]
fn test_rejected_calls_leave_no_trace() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("calls.csv");
    common::write_script(
        &script,
        &[
            // Genesis airline is not funded yet
            ["register_flight", "0xa1", "", "", "ND1", "42", ""],
            ["fund_airline", "0xa1", "", "", "", "", "10"],
            ["register_flight", "0xa1", "", "", "ND1", "42", ""],
            // Duplicate flight
            ["register_flight", "0xa1", "", "", "ND1", "42", ""],
            // Premium above the cap
            ["buy_insurance", "0xp1", "0xp1", "0xa1", "ND1", "42", "2"],
            // Not a known status code
            ["process_flight_status", "0xo", "", "0xa1", "ND1", "42", "21"],
            // Only the owner may pause
            ["set_operational", "0xa1", "", "", "", "", "false"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("flightsurety"));
    cmd.arg(&script)
        .arg("--config")
        .arg("tests/fixtures/config.json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(stderr.matches("Call rejected").count(), 5);
    assert!(stdout.contains(",0xa1,ND1,42,0"));
    assert_eq!(stdout.matches(",0xa1,ND1,42,").count(), 1);
    assert!(!stdout.contains("0xp1"));
}

#[test]
fn test_overflowing_funding_rejects_only_that_call() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("calls.csv");
    let max = rust_decimal::Decimal::MAX.to_string();
    common::write_script(
        &script,
        &[
            ["fund_airline", "0xbig", "", "", "", "", max.as_str()],
            ["fund_airline", "0xbig", "", "", "", "", max.as_str()],
            ["fund_airline", "0xa1", "", "", "", "", "10"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("flightsurety"));
    cmd.arg(&script)
        .arg("--config")
        .arg("tests/fixtures/config.json");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Call rejected").count(1))
        .stdout(predicate::str::contains("0xa1,Genesis Air,true,true,10,0"))
        .stdout(predicate::str::contains(format!("0xbig,,false,true,{max},0")));
}
