// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime adapters: the process/pane host for an agent.

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRuntime, FakeRuntimeAdapter, RuntimeCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from runtime operations
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for the host that runs an agent process (tmux pane, detached
/// process group, container, ...).
#[async_trait]
pub trait RuntimeAdapter: Send + Sync + 'static {
    /// Spawn a new runtime instance and return its opaque handle id.
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, RuntimeError>;

    /// Send input followed by a newline/submit (buffered transport).
    async fn send(&self, id: &str, input: &str) -> Result<(), RuntimeError>;

    /// Send literal text with no key interpretation (direct keystroke path).
    async fn send_literal(&self, id: &str, text: &str) -> Result<(), RuntimeError>;

    /// Send the Enter key on its own.
    async fn send_enter(&self, id: &str) -> Result<(), RuntimeError>;

    /// Destroy the runtime instance. Idempotent: destroying an already-dead
    /// instance must not error.
    async fn destroy(&self, id: &str) -> Result<(), RuntimeError>;

    /// Check if the runtime instance is alive.
    async fn is_alive(&self, id: &str) -> Result<bool, RuntimeError>;

    /// Capture recent output from the runtime instance.
    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, RuntimeError>;

    /// Check if a process matching `pattern` is running inside the runtime.
    async fn is_process_running(&self, id: &str, pattern: &str) -> Result<bool, RuntimeError>;

    /// Exit code of the hosted process, if it has exited.
    async fn get_exit_code(&self, id: &str) -> Result<Option<i32>, RuntimeError>;
}
