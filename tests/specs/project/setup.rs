//! Project setup specs
//!
//! Verify `fleet init` scaffolds a usable `config.toml`.

use crate::prelude::*;

#[test]
fn init_scaffolds_config_toml() {
    let temp = Project::empty();

    temp.fleet()
        .args(&["init"])
        .passes()
        .stdout_has("Scaffolded config");

    let config_path = temp.state_path().join("config.toml");
    assert!(config_path.exists(), "config.toml should be created");

    let text = std::fs::read_to_string(&config_path).unwrap();
    assert!(text.contains("port = 7878"), "config should set a default port");
}

#[test]
fn init_is_not_idempotent_by_default() {
    let temp = Project::empty();

    temp.fleet().args(&["init"]).passes();

    temp.fleet()
        .args(&["init"])
        .fails()
        .stderr_has("already exists");
}

#[test]
fn scaffolded_config_is_accepted_by_daemon() {
    let temp = Project::empty();

    temp.fleet().args(&["init"]).passes();

    temp.fleet()
        .args(&["start"])
        .passes()
        .stdout_has("Daemon started");

    temp.fleet()
        .args(&["status"])
        .passes()
        .stdout_has("Status: running");
}
