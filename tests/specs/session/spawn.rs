//! Session spawn and listing specs
//!
//! Exercise `spawn`, `batch-spawn`, `list`, and `status` against a real
//! git repo, tmux runtime, and a fake `claude` binary standing in for the
//! agent process.

use crate::prelude::*;

#[test]
fn spawn_creates_a_session() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();

    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .path_prepend(claude_dir.path())
        .args(&["spawn", "app", "ISSUE-1"])
        .passes()
        .stdout_has("Session: app-1")
        .stdout_has("Project: app")
        .stdout_has("Branch:");
}

#[test]
fn spawned_session_appears_in_list() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();

    temp.fleet().args(&["start"]).passes();
    temp.fleet()
        .path_prepend(claude_dir.path())
        .args(&["spawn", "app", "ISSUE-1"])
        .passes();

    temp.fleet()
        .args(&["list"])
        .passes()
        .stdout_has("app-1");
}

#[test]
fn list_filters_by_project() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();

    temp.fleet().args(&["start"]).passes();
    temp.fleet()
        .path_prepend(claude_dir.path())
        .args(&["spawn", "app", "ISSUE-1"])
        .passes();

    temp.fleet()
        .args(&["list", "--project", "other"])
        .passes()
        .stdout_has("No sessions");
}

#[test]
fn batch_spawn_creates_one_session_per_issue() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();

    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .path_prepend(claude_dir.path())
        .args(&["batch-spawn", "app", "ISSUE-1", "ISSUE-2"])
        .passes()
        .stdout_has("Spawned 2 session(s)");

    let list = temp.fleet().args(&["list"]).passes().stdout();
    assert!(list.contains("app-1"), "list should show first session");
    assert!(list.contains("app-2"), "list should show second session");
}

#[test]
fn status_reflects_spawned_sessions() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();

    temp.fleet().args(&["start"]).passes();
    temp.fleet()
        .path_prepend(claude_dir.path())
        .args(&["spawn", "app", "ISSUE-1"])
        .passes();

    temp.fleet()
        .args(&["status"])
        .passes()
        .stdout_has("Sessions: 1 total");
}

#[test]
fn json_output_is_machine_readable() {
    let temp = Project::empty();
    temp.git_init();
    temp.write_config("");
    let claude_dir = fake_claude_bin_dir();

    temp.fleet().args(&["start"]).passes();
    temp.fleet()
        .path_prepend(claude_dir.path())
        .args(&["spawn", "app", "ISSUE-1"])
        .passes();

    let out = temp
        .fleet()
        .args(&["--output", "json", "list"])
        .passes()
        .stdout();
    let parsed: serde_json::Value = serde_json::from_str(&out).expect("list -o json should parse");
    assert!(parsed.is_array(), "json list output should be an array");
    assert_eq!(parsed[0]["id"], "app-1");
}
