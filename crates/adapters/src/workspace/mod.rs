// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace adapters: the isolated source tree a session's agent works in.

mod git_worktree;

pub use git_worktree::GitWorktreeAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorkspaceAdapter, WorkspaceCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("workspace not found: {0}")]
    NotFound(PathBuf),
    #[error("create failed: {0}")]
    CreateFailed(String),
    #[error("remove failed: {0}")]
    RemoveFailed(String),
}

/// Adapter for the isolated working tree a session's agent runs in.
#[async_trait]
pub trait WorkspaceAdapter: Send + Sync + 'static {
    /// Create an isolated workspace for `branch`, rooted under `worktree_dir`,
    /// checked out from `repo_path`. Returns the absolute path of the new
    /// workspace.
    async fn create(
        &self,
        repo_path: &Path,
        worktree_dir: &Path,
        branch: &str,
    ) -> Result<PathBuf, WorkspaceError>;

    /// Remove a previously created workspace. Idempotent: removing an
    /// already-gone workspace must not error.
    async fn remove(&self, repo_path: &Path, workspace_path: &Path) -> Result<(), WorkspaceError>;

    /// Does the workspace still exist on disk?
    async fn exists(&self, workspace_path: &Path) -> bool;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
