// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::error::ErrorKind;

use super::cli_command;

// -- Version flag -----------------------------------------------------------

#[test]
fn version_short_lowercase_v() {
    let err = cli_command()
        .try_get_matches_from(["fleet", "-v"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn version_short_uppercase_v() {
    let err = cli_command()
        .try_get_matches_from(["fleet", "-V"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn version_long() {
    let err = cli_command()
        .try_get_matches_from(["fleet", "--version"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn version_uppercase_v_hidden_in_help() {
    let mut buf = Vec::new();
    cli_command().write_help(&mut buf).unwrap();
    let help = String::from_utf8(buf).unwrap();
    assert!(
        help.contains("-v, --version"),
        "help should show -v, --version"
    );
    assert!(
        !help.contains("-V,"),
        "help should not show -V as a visible flag"
    );
}

// -- Subcommand parsing -------------------------------------------------------

#[test]
fn spawn_requires_project() {
    let err = cli_command()
        .try_get_matches_from(["fleet", "spawn"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn spawn_accepts_project_and_issue() {
    let matches = cli_command()
        .try_get_matches_from(["fleet", "spawn", "widgets", "ISSUE-1"])
        .unwrap();
    let sub = matches.subcommand_matches("spawn").unwrap();
    assert_eq!(sub.get_one::<String>("project").unwrap(), "widgets");
    assert_eq!(sub.get_one::<String>("issue").unwrap(), "ISSUE-1");
}

#[test]
fn batch_spawn_requires_at_least_one_issue() {
    let err = cli_command()
        .try_get_matches_from(["fleet", "batch-spawn", "widgets"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn list_project_flag_is_optional() {
    let matches = cli_command()
        .try_get_matches_from(["fleet", "list"])
        .unwrap();
    let sub = matches.subcommand_matches("list").unwrap();
    assert!(sub.get_one::<String>("project").is_none());
}

#[test]
fn help_subcommand_spawn_shows_usage() {
    let err = cli_command()
        .try_get_matches_from(["fleet", "help", "spawn"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    let help = err.to_string();
    assert!(
        help.contains("Usage: fleet spawn"),
        "should show spawn usage line, got:\n{help}"
    );
}
