// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for daemon client behavior.

use super::{ClientError, DaemonClient};
use crate::client_lifecycle::log_connection_error;
use crate::daemon_process::{cleanup_stale_socket, daemon_dir, probe_socket};
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

/// Verify that connect() does not delete state files when the daemon is not
/// running. Regression test for a race where connect() deleted the pid file
/// mid-startup before the daemon finished initializing.
#[test]
#[serial]
fn connect_does_not_delete_pid_file() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("XDG_STATE_HOME", state_dir.path());

    let dir = daemon_dir().unwrap();
    fs::create_dir_all(&dir).unwrap();
    let pid_path = dir.join("daemon.pid");
    fs::write(&pid_path, "12345\n").unwrap();

    let result = DaemonClient::connect();
    assert!(matches!(result, Err(ClientError::DaemonNotRunning)));

    assert!(pid_path.exists(), "connect() must not delete pid file");
}

#[test]
#[serial]
fn log_connection_error_creates_log_file() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("FLEET_STATE_DIR", state_dir.path());

    let error = ClientError::DaemonNotRunning;
    log_connection_error(&error);

    let log_path = state_dir.path().join("cli.log");
    assert!(log_path.exists(), "cli.log should be created");

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("pid="), "log should contain pid");
    assert!(content.contains("cwd="), "log should contain cwd");
    assert!(
        content.contains("FLEET_STATE_DIR="),
        "log should contain FLEET_STATE_DIR"
    );
    assert!(
        content.contains("socket="),
        "log should contain socket path"
    );
    assert!(
        content.contains("Daemon not running"),
        "log should contain error message"
    );
}

#[test]
#[serial]
fn log_connection_error_includes_socket_path() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("FLEET_STATE_DIR", state_dir.path());

    let error = ClientError::DaemonNotRunning;
    log_connection_error(&error);

    let log_path = state_dir.path().join("cli.log");
    let content = fs::read_to_string(&log_path).unwrap();

    let expected_socket = state_dir.path().join("daemon.sock");
    assert!(
        content.contains(&expected_socket.display().to_string()),
        "log should contain expected socket path"
    );
}

/// Simulates a crashed daemon: socket file exists, PID file references a dead
/// process. cleanup_stale_socket should remove both files.
#[test]
#[serial]
fn test_stale_socket_cleanup() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("FLEET_STATE_DIR", state_dir.path());

    let socket_path = state_dir.path().join("daemon.sock");
    fs::write(&socket_path, "").unwrap();

    let mut child = std::process::Command::new("true").spawn().unwrap();
    let dead_pid = child.id();
    child.wait().unwrap();

    let pid_path = state_dir.path().join("daemon.pid");
    fs::write(&pid_path, format!("{}\n", dead_pid)).unwrap();

    assert!(!probe_socket(&socket_path));

    cleanup_stale_socket().unwrap();

    assert!(!socket_path.exists(), "stale socket should be removed");
    assert!(!pid_path.exists(), "stale PID file should be removed");
}

/// If the socket file exists but there's no PID file at all, the socket is
/// definitely stale (a daemon can't be running without a PID file).
#[test]
#[serial]
fn test_stale_lock_cleanup() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("FLEET_STATE_DIR", state_dir.path());

    let socket_path = state_dir.path().join("daemon.sock");
    fs::write(&socket_path, "").unwrap();

    let pid_path = state_dir.path().join("daemon.pid");
    assert!(
        !pid_path.exists(),
        "PID file should not exist for this test"
    );

    assert!(!probe_socket(&socket_path));

    cleanup_stale_socket().unwrap();

    assert!(!socket_path.exists(), "stale socket should be removed");
}
