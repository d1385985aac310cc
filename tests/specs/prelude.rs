//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for testing fleet CLI behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timeouts for fast tests.
//
// IMPORTANT:
//   Do NOT change these.
//   File a performance bug instead.
const FLEET_TIMEOUT_CONNECT_MS: &str = "2000";
const FLEET_TIMEOUT_EXIT_MS: &str = "500";
const FLEET_TIMEOUT_IPC_MS: &str = "500";
const FLEET_CONNECT_POLL_MS: &str = "5";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the fleet CLI binary.
fn fleet_binary() -> PathBuf {
    binary_path("fleet")
}

/// Returns the path to the fleetd daemon binary.
pub fn fleetd_binary() -> PathBuf {
    binary_path("fleetd")
}

/// Returns a Command configured to run the fleet binary.
pub fn fleet_cmd() -> Command {
    Command::new(fleet_binary())
}

/// Create a CLI builder for fleet commands.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![
                (
                    "FLEET_DAEMON_BINARY".into(),
                    fleetd_binary().to_string_lossy().into(),
                ),
                (
                    "FLEET_TIMEOUT_CONNECT_MS".into(),
                    FLEET_TIMEOUT_CONNECT_MS.into(),
                ),
                ("FLEET_TIMEOUT_EXIT_MS".into(), FLEET_TIMEOUT_EXIT_MS.into()),
                ("FLEET_TIMEOUT_IPC_MS".into(), FLEET_TIMEOUT_IPC_MS.into()),
                (
                    "FLEET_CONNECT_POLL_MS".into(),
                    FLEET_CONNECT_POLL_MS.into(),
                ),
            ],
        }
    }

    /// Add CLI arguments.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory.
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable.
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Prepend a directory to PATH (used to inject a fake `claude` binary).
    pub fn path_prepend(mut self, dir: impl AsRef<Path>) -> Self {
        let existing = std::env::var("PATH").unwrap_or_default();
        let joined = format!("{}:{}", dir.as_ref().display(), existing);
        self.envs.push(("PATH".to_string(), joined));
        self
    }

    /// Build the command without running it.
    pub fn command(self) -> Command {
        let mut cmd = fleet_cmd();
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0).
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code).
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

/// Poll a condition until it returns true or the timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Project
// =============================================================================

/// Temporary test environment: an isolated state directory plus, on demand,
/// a git repo standing in for a project's source tree.
pub struct Project {
    state_dir: tempfile::TempDir,
    repo_dir: tempfile::TempDir,
}

impl Project {
    /// Create an empty environment with no project configured.
    pub fn empty() -> Self {
        Self {
            state_dir: tempfile::tempdir().unwrap(),
            repo_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    pub fn repo_path(&self) -> &Path {
        self.repo_dir.path()
    }

    /// Initialize a git repository with one commit on `main`, standing in
    /// for a project's source tree.
    pub fn git_init(&self) {
        let run = |args: &[&str]| {
            Command::new("git")
                .args(args)
                .current_dir(self.repo_path())
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .status()
                .expect("git should run")
        };
        run(&["init", "-q", "-b", "main"]);
        run(&["config", "user.email", "spec@example.com"]);
        run(&["config", "user.name", "spec"]);
        std::fs::write(self.repo_path().join("README.md"), "spec fixture\n").unwrap();
        run(&["add", "."]);
        run(&["commit", "-q", "-m", "initial commit"]);
    }

    /// Write `config.toml` with one project named `app` pointing at this
    /// environment's git repo.
    pub fn write_config(&self, extra_project_toml: &str) {
        let config = format!(
            r#"
data_dir = "{data_dir}"
worktree_dir = "{worktree_dir}"
port = 7878

[defaults]
runtime = "tmux"
agent = "generic-cli"
workspace = "git-worktree"

[projects.app]
name = "app"
repo = "{repo}"
path = "{repo}"
default_branch = "main"
session_prefix = "app"
{extra}
"#,
            data_dir = self.state_path().join("data").display(),
            worktree_dir = self.state_path().join("worktrees").display(),
            repo = self.repo_path().display(),
            extra = extra_project_toml,
        );
        std::fs::write(self.state_path().join("config.toml"), config).unwrap();
    }

    /// Run fleet command in this environment's context.
    pub fn fleet(&self) -> CliBuilder {
        cli().env("FLEET_STATE_DIR", self.state_path())
    }

    pub fn daemon_log(&self) -> String {
        let log_path = self.state_path().join("daemon.log");
        std::fs::read_to_string(&log_path).unwrap_or_else(|_| "(no daemon log)".to_string())
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        let mut cmd = self.fleet().args(&["stop"]).command();
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}

/// Install a fake `claude` executable (a no-op script accepting any flags
/// and staying alive) into a fresh directory and return that directory,
/// for prepending to PATH via [`CliBuilder::path_prepend`].
pub fn fake_claude_bin_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("claude");
    std::fs::write(&script_path, "#!/bin/sh\nexec sleep 3600\n").unwrap();
    let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
    std::os::unix::fs::PermissionsExt::set_mode(&mut perms, 0o755);
    std::fs::set_permissions(&script_path, perms).unwrap();
    dir
}
