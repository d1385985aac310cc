//! Daemon lifecycle specs
//!
//! Verify daemon start/stop/status lifecycle.

use crate::prelude::*;

#[test]
fn status_reports_not_running_before_start() {
    let temp = Project::empty();
    temp.write_config("");

    temp.fleet()
        .args(&["status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn start_reports_success() {
    let temp = Project::empty();
    temp.write_config("");

    temp.fleet()
        .args(&["start"])
        .passes()
        .stdout_has("Daemon started");
}

#[test]
fn status_shows_running_after_start() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .args(&["status"])
        .passes()
        .stdout_has("Status: running");
}

#[test]
fn status_shows_uptime_and_version() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .args(&["status"])
        .passes()
        .stdout_has("Uptime:")
        .stdout_has("Version:");
}

#[test]
fn start_is_idempotent() {
    let temp = Project::empty();
    temp.write_config("");

    temp.fleet().args(&["start"]).passes();
    // A second start should recognize the running daemon rather than
    // erroring or spawning a second process.
    temp.fleet()
        .args(&["start"])
        .passes()
        .stdout_has("already running");
}

#[test]
fn stop_reports_success() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    temp.fleet()
        .args(&["stop"])
        .passes()
        .stdout_has("Daemon stopped");
}

#[test]
fn status_reports_not_running_after_stop() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();
    temp.fleet().args(&["stop"]).passes();

    temp.fleet()
        .args(&["status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn stop_when_not_running_is_a_no_op() {
    let temp = Project::empty();
    temp.write_config("");

    temp.fleet()
        .args(&["stop"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn start_creates_socket_and_pid_files() {
    let temp = Project::empty();
    temp.write_config("");
    temp.fleet().args(&["start"]).passes();

    let has_socket = wait_for(SPEC_WAIT_MAX_MS, || {
        temp.state_path().join("daemon.sock").exists()
    });
    let has_pid = wait_for(SPEC_WAIT_MAX_MS, || {
        temp.state_path().join("daemon.pid").exists()
    });

    assert!(has_socket, "daemon socket file should exist");
    assert!(has_pid, "daemon pid file should exist");
}

#[test]
fn start_fails_on_invalid_config() {
    let temp = Project::empty();
    std::fs::write(
        temp.state_path().join("config.toml"),
        "port = 99999\n[defaults]\n",
    )
    .unwrap();
    std::fs::create_dir_all(temp.state_path()).unwrap();

    temp.fleet()
        .args(&["start"])
        .fails()
        .stderr_has("port");
}
