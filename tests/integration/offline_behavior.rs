//! Commands that must behave correctly without any network access.

use predicates::prelude::*;

use crate::common::Sandbox;

#[test]
fn status_on_an_empty_base_dir_reports_not_installed() {
    // Channels without an executable are classified locally; the sweep
    // never probes the network for them
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Stable")
                .and(predicate::str::contains("Beta"))
                .and(predicate::str::contains("Nightly"))
                .and(predicate::str::contains("Not installed"))
                .and(predicate::str::contains("All installations up to date.")),
        );
}

#[test]
fn delete_of_a_missing_channel_is_a_clean_no_op() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["delete", "stable", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not installed"));
}

#[test]
fn delete_removes_the_channel_directory() {
    let sandbox = Sandbox::new();
    sandbox.install_channel("Beta", "131.0");
    assert!(sandbox.base_dir.join("Beta").exists());

    sandbox
        .cmd()
        .args(["delete", "beta", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    assert!(!sandbox.base_dir.join("Beta").exists());
}

#[test]
fn delete_without_confirmation_declines_when_not_a_tty() {
    let sandbox = Sandbox::new();
    sandbox.install_channel("Stable", "131.0");

    sandbox
        .cmd()
        .args(["delete", "stable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    assert!(sandbox.base_dir.join("Stable").exists());
}

#[test]
fn launch_of_a_missing_channel_fails_with_a_typed_message() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["launch", "nightly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch").and(predicate::str::contains("not installed")));
}
