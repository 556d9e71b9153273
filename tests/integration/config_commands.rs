//! Settings persistence through the `config` subcommands.

use predicates::prelude::*;

use crate::common::Sandbox;

#[test]
fn show_reports_the_sandbox_settings() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(sandbox.base_dir.display().to_string())
                .and(predicate::str::contains(sandbox.config_path.display().to_string())),
        );
}

#[test]
fn set_base_dir_persists_across_invocations() {
    let sandbox = Sandbox::new();
    let new_base = sandbox.base_dir.parent().unwrap().join("relocated");

    sandbox
        .cmd()
        .args(["config", "set-base-dir"])
        .arg(&new_base)
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(new_base.display().to_string()));
}

#[test]
fn set_tool_persists_and_warns_on_missing_path() {
    let sandbox = Sandbox::new();
    let tool = sandbox.base_dir.join("7z-not-here-yet");

    sandbox
        .cmd()
        .args(["config", "set-tool"])
        .arg(&tool)
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist yet"));

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(configured)"));
}

#[test]
fn malformed_settings_file_is_reported() {
    let sandbox = Sandbox::new();
    std::fs::write(&sandbox.config_path, "base_dir = [this is not toml").unwrap();

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse settings"));
}
