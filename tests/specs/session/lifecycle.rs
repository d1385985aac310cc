//! Session lifecycle specs
//!
//! Exercise `send`, `kill`, `cleanup`, and `restore` against a spawned
//! session.

use crate::prelude::*;

fn spawn_one(temp: &Project, claude_dir: &std::path::Path) {
    temp.fleet().args(&["start"]).passes();
    temp.fleet()
        .path_prepend(claude_dir)
        .args(&["spawn", "app", "ISSUE-1"])
        .passes();
}

#[test]
fn send_reports_success() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();
    spawn_one(&temp, claude_dir.path());

    temp.fleet()
        .args(&["send", "app-1", "keep going"])
        .passes()
        .stdout_has("Sent to session app-1");
}

#[test]
fn kill_is_idempotent() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();
    spawn_one(&temp, claude_dir.path());

    temp.fleet()
        .args(&["kill", "app-1"])
        .passes()
        .stdout_has("Session killed: app-1");

    // A second kill of the same, already-terminated session must not error.
    temp.fleet()
        .args(&["kill", "app-1"])
        .passes()
        .stdout_has("Session killed: app-1");
}

#[test]
fn restore_after_kill_reuses_the_same_id() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();
    spawn_one(&temp, claude_dir.path());

    temp.fleet().args(&["kill", "app-1"]).passes();

    temp.fleet()
        .args(&["restore", "app-1"])
        .fails()
        .stderr_has("session_not_restorable");
}

#[test]
fn cleanup_with_no_eligible_sessions_is_a_no_op() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();
    spawn_one(&temp, claude_dir.path());

    temp.fleet()
        .args(&["cleanup"])
        .passes()
        .stdout_has("No sessions to clean up");

    // The still-active session must survive an unrelated cleanup call.
    temp.fleet()
        .args(&["list"])
        .passes()
        .stdout_has("app-1");
}

#[test]
fn cleanup_can_be_scoped_to_a_project() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();
    spawn_one(&temp, claude_dir.path());

    temp.fleet()
        .args(&["cleanup", "--project", "other"])
        .passes()
        .stdout_has("No sessions to clean up");
}
