// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::registry::CapabilityRegistry;
use fleet_adapters::tracker::{Issue, IssueState};
use fleet_adapters::{
    FakeAgentAdapter, FakeRuntimeAdapter, FakeTrackerAdapter, FakeWorkspaceAdapter, RuntimeCall,
    WorkspaceCall,
};
use fleet_core::{Config, Defaults, FakeClock, ProjectConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    registry: Arc<CapabilityRegistry>,
    store: Arc<SessionStore>,
    workspace: Arc<FakeWorkspaceAdapter>,
    runtime: Arc<FakeRuntimeAdapter>,
    agent: Arc<FakeAgentAdapter>,
    tracker: Arc<FakeTrackerAdapter>,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SessionStore::open(dir.path()).unwrap());
    let registry = Arc::new(CapabilityRegistry::new());
    let workspace = Arc::new(FakeWorkspaceAdapter::new());
    let runtime = Arc::new(FakeRuntimeAdapter::new());
    let agent = Arc::new(FakeAgentAdapter::new());
    let tracker = Arc::new(FakeTrackerAdapter::new());
    registry.register_workspace("git-worktree", workspace.clone());
    registry.register_runtime("tmux", runtime.clone());
    registry.register_agent("generic-cli", agent.clone());
    registry.register_tracker("github", tracker.clone());
    Fixture {
        _dir: dir,
        registry,
        store,
        workspace,
        runtime,
        agent,
        tracker,
    }
}

fn project() -> ProjectConfig {
    ProjectConfig {
        name: "demo".to_string(),
        repo: "acme/demo".to_string(),
        path: PathBuf::from("/repos/demo"),
        default_branch: "main".to_string(),
        session_prefix: "demo".to_string(),
        agent_rules: None,
        orchestrator_rules: None,
        symlinks: Vec::new(),
        post_create: Vec::new(),
        tracker_config: toml::Table::new(),
        agent_config: toml::Table::new(),
        reactions: HashMap::new(),
    }
}

fn config() -> Config {
    let mut projects = HashMap::new();
    projects.insert("demo".to_string(), project());
    Config {
        data_dir: PathBuf::from("/data"),
        worktree_dir: PathBuf::from("/data/worktrees"),
        port: 7878,
        defaults: Defaults {
            runtime: "tmux".to_string(),
            agent: "generic-cli".to_string(),
            workspace: "git-worktree".to_string(),
            notifiers: Vec::new(),
        },
        projects,
        notifiers: HashMap::new(),
        notification_routing: HashMap::new(),
        reactions: HashMap::new(),
    }
}

fn pipeline(fx: &Fixture) -> SpawnPipeline<FakeClock> {
    SpawnPipeline {
        registry: fx.registry.clone(),
        store: fx.store.clone(),
        ids: Arc::new(IdAllocator::new()),
        clock: FakeClock::default(),
    }
}

fn request(issue_id: Option<&str>) -> SpawnRequest {
    SpawnRequest {
        project_id: "demo".to_string(),
        issue_id: issue_id.map(str::to_string),
    }
}

#[tokio::test]
async fn spawn_without_an_issue_creates_a_working_session() {
    let fx = fixture();
    let cfg = config();
    let pipeline = pipeline(&fx);

    let session = pipeline.spawn(&cfg, request(None)).await.unwrap();

    assert_eq!(session.id.as_str(), "demo-1");
    assert_eq!(session.status, fleet_core::SessionStatus::Working);
    assert!(session.branch.starts_with("demo-"));
    assert_eq!(fx.workspace.calls().len(), 1);
    assert_eq!(fx.runtime.calls().len(), 1);
    assert!(fx.store.load(&session.id).is_ok());
}

#[tokio::test]
async fn spawn_with_a_known_issue_uses_the_tracker_branch_name() {
    let fx = fixture();
    let cfg = config();
    fx.tracker.insert_issue(Issue {
        id: "42".to_string(),
        title: "Fix the thing".to_string(),
        body: "details".to_string(),
        state: IssueState::Open,
        labels: Vec::new(),
        url: "https://example.test/issues/42".to_string(),
    });
    let pipeline = pipeline(&fx);

    let session = pipeline.spawn(&cfg, request(Some("42"))).await.unwrap();

    assert_eq!(session.issue_id.as_deref(), Some("42"));
    assert!(fx
        .tracker
        .calls()
        .iter()
        .any(|c| matches!(c, fleet_adapters::TrackerCall::GetIssue { issue_id } if issue_id == "42")));
}

#[tokio::test]
async fn spawn_for_an_unknown_project_fails_before_touching_any_adapter() {
    let fx = fixture();
    let cfg = config();
    let pipeline = pipeline(&fx);

    let err = pipeline
        .spawn(
            &cfg,
            SpawnRequest {
                project_id: "ghost".to_string(),
                issue_id: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SpawnError::UnknownProject(_)));
    assert!(fx.workspace.calls().is_empty());
}

#[tokio::test]
async fn spawn_for_a_missing_issue_fails_and_reserves_no_id() {
    let fx = fixture();
    let cfg = config();
    let pipeline = pipeline(&fx);

    let err = pipeline.spawn(&cfg, request(Some("404"))).await.unwrap_err();

    assert!(matches!(err, SpawnError::IssueNotFound { .. }));
    assert!(fx.store.list().unwrap().is_empty());
    assert!(fx.store.list_archived().unwrap().is_empty());
}

#[tokio::test]
async fn a_workspace_failure_rolls_back_the_reserved_session_id() {
    let fx = fixture();
    let cfg = config();
    fx.workspace.set_create_error("disk full");
    let pipeline = pipeline(&fx);

    let err = pipeline.spawn(&cfg, request(None)).await.unwrap_err();

    assert!(matches!(err, SpawnError::Workspace(_)));
    // The sentinel was archived by the rollback, not left dangling active.
    assert!(fx.store.list().unwrap().is_empty());
    assert!(!fx.store.list_archived().unwrap().is_empty());
}

#[tokio::test]
async fn an_agent_launch_failure_rolls_back_the_created_workspace() {
    let fx = fixture();
    let cfg = config();
    fx.agent.set_launch_error("agent binary missing");
    let pipeline = pipeline(&fx);

    let err = pipeline.spawn(&cfg, request(None)).await.unwrap_err();

    assert!(matches!(err, SpawnError::Agent(_)));
    assert!(fx.store.list().unwrap().is_empty());
    assert!(fx
        .workspace
        .calls()
        .iter()
        .any(|c| matches!(c, WorkspaceCall::Remove { .. })));
    // The launch command build failed, so the runtime was never reached.
    assert!(fx.runtime.calls().is_empty());
}

#[tokio::test]
async fn a_post_launch_setup_failure_rolls_back_the_runtime_and_the_workspace() {
    let fx = fixture();
    let cfg = config();
    fx.agent.set_setup_error("setup script failed");
    let pipeline = pipeline(&fx);

    let err = pipeline.spawn(&cfg, request(None)).await.unwrap_err();

    assert!(matches!(err, SpawnError::Agent(_)));
    assert!(fx.store.list().unwrap().is_empty());
    assert!(!fx.store.list_archived().unwrap().is_empty());
    assert!(fx
        .workspace
        .calls()
        .iter()
        .any(|c| matches!(c, WorkspaceCall::Remove { .. })));
    assert!(fx
        .runtime
        .calls()
        .iter()
        .any(|c| matches!(c, RuntimeCall::Destroy { .. })));
}

#[tokio::test]
async fn successive_spawns_reserve_successive_ids() {
    let fx = fixture();
    let cfg = config();
    let pipeline = pipeline(&fx);

    let first = pipeline.spawn(&cfg, request(None)).await.unwrap();
    let second = pipeline.spawn(&cfg, request(None)).await.unwrap();

    assert_eq!(first.id.as_str(), "demo-1");
    assert_eq!(second.id.as_str(), "demo-2");
}

#[tokio::test]
async fn spawn_for_a_project_missing_a_required_plugin_fails_without_reserving_an_id() {
    let fx = fixture();
    let mut cfg = config();
    cfg.defaults.runtime = "ssh".to_string();
    let pipeline = pipeline(&fx);

    let err = pipeline.spawn(&cfg, request(None)).await.unwrap_err();

    assert!(matches!(err, SpawnError::Registry(_)));
    assert!(fx.store.list().unwrap().is_empty());
    assert!(fx.store.list_archived().unwrap().is_empty());
}
