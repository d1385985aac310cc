// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git-worktree-backed workspace adapter

use super::{WorkspaceAdapter, WorkspaceError};
use crate::subprocess::{run_with_timeout, GIT_WORKTREE_TIMEOUT};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Workspace adapter backed by `git worktree add`/`remove`.
#[derive(Clone, Default)]
pub struct GitWorktreeAdapter;

impl GitWorktreeAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceAdapter for GitWorktreeAdapter {
    async fn create(
        &self,
        repo_path: &Path,
        worktree_dir: &Path,
        branch: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let dir_name = branch.replace('/', "-");
        let workspace_path = worktree_dir.join(dir_name);

        if workspace_path.exists() {
            return Err(WorkspaceError::AlreadyExists(workspace_path));
        }

        tokio::fs::create_dir_all(worktree_dir)
            .await
            .map_err(|e| WorkspaceError::CreateFailed(e.to_string()))?;

        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(repo_path)
            .args(["worktree", "add", "-b", branch])
            .arg(&workspace_path);

        let output = run_with_timeout(cmd, GIT_WORKTREE_TIMEOUT, "git worktree add")
            .await
            .map_err(WorkspaceError::CreateFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WorkspaceError::CreateFailed(stderr.to_string()));
        }

        Ok(workspace_path)
    }

    async fn remove(&self, repo_path: &Path, workspace_path: &Path) -> Result<(), WorkspaceError> {
        if !workspace_path.exists() {
            return Ok(());
        }

        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(repo_path)
            .args(["worktree", "remove", "--force"])
            .arg(workspace_path);

        let output = run_with_timeout(cmd, GIT_WORKTREE_TIMEOUT, "git worktree remove")
            .await
            .map_err(WorkspaceError::RemoveFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                workspace = %workspace_path.display(),
                stderr = %stderr,
                "git worktree remove failed, falling back to directory removal"
            );
            tokio::fs::remove_dir_all(workspace_path)
                .await
                .map_err(|e| WorkspaceError::RemoveFailed(e.to_string()))?;
        }

        Ok(())
    }

    async fn exists(&self, workspace_path: &Path) -> bool {
        workspace_path.exists()
    }
}

#[cfg(test)]
#[path = "git_worktree_tests.rs"]
mod tests;
