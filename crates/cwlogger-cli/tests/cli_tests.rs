//! Integration tests for the `put` subcommand.
//!
//! Only paths that finish before AWS configuration is loaded are covered
//! here; submission itself is tested against the recording sink.

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("cwlogger-cli").expect("binary exists")
}

#[test]
fn help_lists_put_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("put"));
}

#[test]
fn put_help_lists_options() {
    cli()
        .args(["put", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-group"))
        .stdout(predicate::str::contains("--attr"))
        .stdout(predicate::str::contains("--retention-days"));
}

#[test]
fn blank_log_group_is_rejected() {
    cli()
        .args(["put", "--log-group", "  ", "--message", "disk full"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            r#"{"success":false,"error":"log_group is required"}"#,
        ))
        .stderr(predicate::str::contains("log_group is required"));
}

#[test]
fn missing_log_group_argument_is_a_usage_error() {
    cli()
        .args(["put", "--message", "disk full"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--log-group"));
}

#[test]
fn malformed_attr_is_a_usage_error() {
    cli()
        .args([
            "put",
            "--log-group",
            "g1",
            "--attr",
            "no-separator",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}
