//! CLI error handling specs
//!
//! Verify error messages for invalid commands and arguments.

use crate::prelude::*;

#[test]
fn unknown_subcommand_shows_error() {
    cli()
        .args(&["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn spawn_missing_project_shows_error() {
    cli()
        .args(&["spawn"])
        .fails()
        .stderr_has("required");
}

#[test]
fn batch_spawn_missing_issues_shows_error() {
    cli()
        .args(&["batch-spawn", "app"])
        .fails()
        .stderr_has("required");
}

#[test]
fn spawn_against_unknown_project_fails() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .args(&["spawn", "nonexistent"])
        .fails()
        .stderr_has("nonexistent");
}

#[test]
fn send_to_unknown_session_fails() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .args(&["send", "app-999", "hello"])
        .fails()
        .stderr_has("session_not_found");
}

#[test]
fn kill_unknown_session_fails() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .args(&["kill", "app-999"])
        .fails()
        .stderr_has("session_not_found");
}
