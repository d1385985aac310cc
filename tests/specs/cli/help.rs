//! CLI help output specs
//!
//! Verify help text displays for the operator surface.

use crate::prelude::*;

#[test]
fn fleet_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn fleet_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn fleet_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("init")
        .stdout_has("spawn")
        .stdout_has("batch-spawn")
        .stdout_has("status")
        .stdout_has("list")
        .stdout_has("attach")
        .stdout_has("send")
        .stdout_has("kill")
        .stdout_has("cleanup")
        .stdout_has("restore");
}

#[test]
fn fleet_spawn_help_shows_usage() {
    cli()
        .args(&["spawn", "--help"])
        .passes()
        .stdout_has("Usage: fleet spawn");
}

#[test]
fn fleet_list_help_shows_project_flag() {
    cli()
        .args(&["list", "--help"])
        .passes()
        .stdout_has("--project");
}

#[test]
fn fleet_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
