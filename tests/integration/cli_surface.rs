//! Basic command-line surface checks.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_every_command() {
    Command::cargo_bin("fxpm")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("status")
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("launch"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn version_flag_reports_the_crate_version() {
    Command::cargo_bin("fxpm")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_channel_is_a_usage_error() {
    Command::cargo_bin("fxpm")
        .unwrap()
        .args(["launch", "esr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn verbose_and_quiet_conflict() {
    Command::cargo_bin("fxpm")
        .unwrap()
        .args(["--verbose", "--quiet", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
