// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake workspace adapter for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{WorkspaceAdapter, WorkspaceError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded call to FakeWorkspaceAdapter
#[derive(Debug, Clone)]
pub enum WorkspaceCall {
    Create { repo_path: PathBuf, branch: String },
    Remove { workspace_path: PathBuf },
    Exists { workspace_path: PathBuf },
}

/// Fake workspace adapter for testing
#[derive(Clone)]
pub struct FakeWorkspaceAdapter {
    inner: Arc<Mutex<FakeWorkspaceState>>,
}

struct FakeWorkspaceState {
    calls: Vec<WorkspaceCall>,
    created: HashSet<PathBuf>,
    create_error: Option<String>,
}

impl Default for FakeWorkspaceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWorkspaceAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeWorkspaceState {
                calls: Vec::new(),
                created: HashSet::new(),
                create_error: None,
            })),
        }
    }

    pub fn calls(&self) -> Vec<WorkspaceCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_create_error(&self, message: impl Into<String>) {
        self.inner.lock().create_error = Some(message.into());
    }
}

#[async_trait]
impl WorkspaceAdapter for FakeWorkspaceAdapter {
    async fn create(
        &self,
        repo_path: &Path,
        worktree_dir: &Path,
        branch: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(WorkspaceCall::Create {
            repo_path: repo_path.to_path_buf(),
            branch: branch.to_string(),
        });

        if let Some(msg) = inner.create_error.take() {
            return Err(WorkspaceError::CreateFailed(msg));
        }

        let workspace_path = worktree_dir.join(branch.replace('/', "-"));
        if inner.created.contains(&workspace_path) {
            return Err(WorkspaceError::AlreadyExists(workspace_path));
        }
        inner.created.insert(workspace_path.clone());
        Ok(workspace_path)
    }

    async fn remove(&self, _repo_path: &Path, workspace_path: &Path) -> Result<(), WorkspaceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(WorkspaceCall::Remove {
            workspace_path: workspace_path.to_path_buf(),
        });
        inner.created.remove(workspace_path);
        Ok(())
    }

    async fn exists(&self, workspace_path: &Path) -> bool {
        let mut inner = self.inner.lock();
        inner.calls.push(WorkspaceCall::Exists {
            workspace_path: workspace_path.to_path_buf(),
        });
        inner.created.contains(workspace_path)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
