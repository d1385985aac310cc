//! Behavioral specifications for the fleet CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// project/
#[path = "specs/project/setup.rs"]
mod project_setup;

// daemon/
#[path = "specs/daemon/lifecycle.rs"]
mod daemon_lifecycle;

// session/
#[path = "specs/session/lifecycle.rs"]
mod session_lifecycle;
#[path = "specs/session/spawn.rs"]
mod session_spawn;
