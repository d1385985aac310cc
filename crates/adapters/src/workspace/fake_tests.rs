// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

#[tokio::test]
async fn create_records_call_and_returns_joined_path() {
    let adapter = FakeWorkspaceAdapter::new();
    let workspace = adapter
        .create(Path::new("/repo"), Path::new("/worktrees"), "feat/x")
        .await
        .unwrap();

    assert_eq!(workspace, PathBuf::from("/worktrees/feat-x"));
    assert!(matches!(
        adapter.calls().as_slice(),
        [WorkspaceCall::Create { branch, .. }] if branch == "feat/x"
    ));
}

#[tokio::test]
async fn create_rejects_duplicate_branch() {
    let adapter = FakeWorkspaceAdapter::new();
    adapter
        .create(Path::new("/repo"), Path::new("/worktrees"), "feat/x")
        .await
        .unwrap();

    let result = adapter
        .create(Path::new("/repo"), Path::new("/worktrees"), "feat/x")
        .await;
    assert!(matches!(result, Err(WorkspaceError::AlreadyExists(_))));
}

#[tokio::test]
async fn create_propagates_configured_error() {
    let adapter = FakeWorkspaceAdapter::new();
    adapter.set_create_error("disk full");
    let result = adapter
        .create(Path::new("/repo"), Path::new("/worktrees"), "feat/x")
        .await;
    assert!(matches!(result, Err(WorkspaceError::CreateFailed(msg)) if msg == "disk full"));
}

#[tokio::test]
async fn remove_clears_existence() {
    let adapter = FakeWorkspaceAdapter::new();
    let workspace = adapter
        .create(Path::new("/repo"), Path::new("/worktrees"), "feat/x")
        .await
        .unwrap();
    assert!(adapter.exists(&workspace).await);

    adapter.remove(Path::new("/repo"), &workspace).await.unwrap();
    assert!(!adapter.exists(&workspace).await);
}

#[tokio::test]
async fn exists_false_for_unknown_path() {
    let adapter = FakeWorkspaceAdapter::new();
    assert!(!adapter.exists(Path::new("/nope")).await);
}
