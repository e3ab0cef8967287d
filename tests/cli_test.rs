mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_full_lifecycle_flow() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("actions.csv");
    common::write_actions(
        &input,
        &[
            ["request", "alice", "", "10"],
            ["approve", "owner", "1", "15"],
            ["accept", "alice", "1", ""],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("microloan"));
    cmd.arg(&input);

    // Over-funded accept: borrower draws 10, surplus 5 returns to the lender.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "loan,borrower,lender,requested,approved,escrow,state",
        ))
        .stdout(predicate::str::contains("1,alice,owner,10,15,0,accepted"));
}

#[test]
fn test_close_before_funding_flow() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("actions.csv");
    common::write_actions(
        &input,
        &[["request", "alice", "", "10"], ["close", "alice", "1", ""]],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("microloan"));
    cmd.arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,alice,,10,,0,closed"));
}

#[test]
fn test_decline_after_funding_flow() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("actions.csv");
    common::write_actions(
        &input,
        &[
            ["request", "alice", "", "10"],
            ["approve", "owner", "1", "15"],
            ["decline", "owner", "1", ""],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("microloan"));
    cmd.arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,alice,owner,10,15,0,declined"));
}

#[test]
fn test_rejected_action_does_not_abort_the_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("actions.csv");
    common::write_actions(
        &input,
        &[
            ["request", "alice", "", "10"],
            ["approve", "mallory", "1", "15"],
            ["approve", "owner", "1", "10"],
            ["accept", "alice", "1", ""],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("microloan"));
    cmd.arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,alice,owner,10,10,0,accepted"))
        .stderr(predicate::str::contains("not allowed"));
}

#[test]
fn test_events_are_appended_as_json_lines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("actions.csv");
    let events = dir.path().join("events.jsonl");
    common::write_actions(
        &input,
        &[
            ["request", "alice", "", "10"],
            ["approve", "owner", "1", "15"],
            ["accept", "alice", "1", ""],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("microloan"));
    cmd.arg(&input).arg("--events").arg(&events);
    cmd.assert().success();

    let log = std::fs::read_to_string(&events).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"event\":\"AddNewLoanRequest\""));
    assert!(lines[1].contains("\"event\":\"RequestApproved\""));
    assert!(lines[2].contains("\"event\":\"RequestAccepted\""));
    // Audit amount on accept is the full escrow.
    assert!(lines[2].contains("\"amount\":\"15\""));
}

#[test]
fn test_owner_flag_selects_the_privileged_identity() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("actions.csv");
    common::write_actions(
        &input,
        &[
            ["request", "alice", "", "10"],
            ["approve", "bank", "1", "10"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("microloan"));
    cmd.arg(&input).arg("--owner").arg("bank");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,alice,bank,10,10,10,approved"));
}
