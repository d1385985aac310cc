// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session spawn pipeline: atomically provisions a workspace, a
//! runtime, and an agent process, rolling back everything it created if
//! any later step fails.
//!
//! Implemented as an explicit stack of undo closures pushed after each
//! commit point, matching the compensating-actions idiom the codebase uses
//! for its own multi-step provisioning. A `?`-propagated error unwinds the
//! stack in reverse; a rollback step's own failure is logged, never
//! propagated, so the original error always reaches the caller.

use crate::error::SpawnError;
use crate::id_alloc::IdAllocator;
use crate::registry::{CapabilityRegistry, Slot};
use fleet_adapters::{AgentAdapter, LaunchRequest, RuntimeAdapter, TrackerAdapter, WorkspaceAdapter};
use fleet_core::{Clock, Config, ProjectConfig, Session, SessionId, SessionStatus};
use fleet_storage::SessionStore;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// One best-effort compensating action, run in reverse commit order.
type RollbackStep = Pin<Box<dyn Future<Output = ()> + Send>>;

struct RollbackStack(Vec<RollbackStep>);

impl RollbackStack {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn push(&mut self, step: RollbackStep) {
        self.0.push(step);
    }

    /// Run every rollback step in reverse order. Each step already swallows
    /// its own errors (logging instead), so unwinding never fails.
    async fn unwind(mut self) {
        while let Some(step) = self.0.pop() {
            step.await;
        }
    }

    /// Spawn succeeded; discard the compensating actions.
    fn disarm(mut self) {
        self.0.clear();
    }
}

pub struct SpawnRequest {
    pub project_id: String,
    pub issue_id: Option<String>,
}

pub struct SpawnPipeline<C: Clock> {
    pub registry: Arc<CapabilityRegistry>,
    pub store: Arc<SessionStore>,
    pub ids: Arc<IdAllocator>,
    pub clock: C,
}

impl<C: Clock> SpawnPipeline<C> {
    pub async fn spawn(&self, config: &Config, req: SpawnRequest) -> Result<Session, SpawnError> {
        let project = config
            .projects
            .get(&req.project_id)
            .ok_or_else(|| SpawnError::UnknownProject(req.project_id.clone()))?
            .clone();

        // Step 1: resolve + validate the plugins this project needs.
        self.registry
            .require(&req.project_id, Slot::Runtime, &config.defaults.runtime)?;
        self.registry
            .require(&req.project_id, Slot::Agent, &config.defaults.agent)?;
        self.registry
            .require(&req.project_id, Slot::Workspace, &config.defaults.workspace)?;

        let tracker = self.registry.tracker("github");
        let runtime = self
            .registry
            .runtime(&config.defaults.runtime)
            .expect("validated above");
        let agent = self
            .registry
            .agent(&config.defaults.agent)
            .expect("validated above");
        let workspace = self
            .registry
            .workspace(&config.defaults.workspace)
            .expect("validated above");

        // Step 2: validate the issue exists, read-only, no side effects yet.
        if let (Some(issue_id), Some(tracker)) = (req.issue_id.as_deref(), tracker.as_ref()) {
            tracker
                .get_issue(issue_id, &project)
                .await
                .map_err(|source| SpawnError::IssueNotFound {
                    issue_id: issue_id.to_string(),
                    source,
                })?;
        }

        let mut rollback = RollbackStack::new();

        // Step 3: reserve the session id (writes the sentinel record).
        let now = self.clock.now();
        let id = self
            .ids
            .reserve(&self.store, &project.session_prefix, now)?;
        {
            let store = Arc::clone(&self.store);
            let id = id.clone();
            rollback.push(Box::pin(async move {
                if let Err(e) = store.archive(&id) {
                    tracing::error!(session_id = %id, error = %e, "rollback: failed to archive reserved sentinel");
                }
            }));
        }

        let result = self
            .spawn_inner(
                config, &project, &id, req.issue_id.as_deref(), tracker, runtime, agent,
                workspace, now, &mut rollback,
            )
            .await;

        match result {
            Ok(session) => {
                rollback.disarm();
                Ok(session)
            }
            Err(e) => {
                rollback.unwind().await;
                Err(e)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn spawn_inner(
        &self,
        config: &Config,
        project: &ProjectConfig,
        id: &SessionId,
        issue_id: Option<&str>,
        tracker: Option<Arc<dyn TrackerAdapter>>,
        runtime: Arc<dyn RuntimeAdapter>,
        agent: Arc<dyn AgentAdapter>,
        workspace: Arc<dyn WorkspaceAdapter>,
        now: chrono::DateTime<chrono::Utc>,
        rollback: &mut RollbackStack,
    ) -> Result<Session, SpawnError> {
        // Step 4: branch name.
        let branch = match (issue_id, tracker.as_ref()) {
            (Some(issue_id), Some(tracker)) => tracker.branch_name(issue_id, project),
            _ => format!("{}-{}", project.session_prefix, id.short(8)),
        };

        // Step 5: create the workspace.
        let workspace_path = workspace
            .create(&project.path, &config.worktree_dir, &branch)
            .await
            .map_err(SpawnError::Workspace)?;
        {
            let workspace = Arc::clone(&workspace);
            let repo_path = project.path.clone();
            let workspace_path_clone = workspace_path.clone();
            rollback.push(Box::pin(async move {
                if let Err(e) = workspace.remove(&repo_path, &workspace_path_clone).await {
                    tracing::error!(error = %e, "rollback: failed to remove workspace");
                }
            }));
        }

        // Step 6: generate the launch prompt.
        let prompt = match (issue_id, tracker.as_ref()) {
            (Some(issue_id), Some(tracker)) => tracker
                .generate_prompt(issue_id, project)
                .await
                .unwrap_or_default(),
            _ => String::new(),
        };

        // Step 7: build the agent's launch command.
        let launch_req = LaunchRequest {
            session_id: id.as_str().to_string(),
            permissions: project
                .agent_config
                .get("permissions")
                .and_then(|v| v.as_str())
                .unwrap_or("default")
                .to_string(),
            model: project
                .agent_config
                .get("model")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            prompt,
        };
        let command = agent
            .get_launch_command(&launch_req)
            .await
            .map_err(SpawnError::Agent)?;

        // Step 8: create the runtime.
        let runtime_id = runtime
            .spawn(id.as_str(), &workspace_path, &command, &[])
            .await
            .map_err(SpawnError::Runtime)?;
        {
            let runtime = Arc::clone(&runtime);
            let runtime_id_clone = runtime_id.clone();
            rollback.push(Box::pin(async move {
                if let Err(e) = runtime.destroy(&runtime_id_clone).await {
                    tracing::error!(error = %e, "rollback: failed to destroy runtime");
                }
            }));
        }

        let runtime_handle = fleet_core::RuntimeHandle {
            id: runtime_id,
            runtime_name: config.defaults.runtime.clone(),
            data: Default::default(),
        };

        let mut session = Session {
            id: id.clone(),
            project_id: project.name.clone(),
            issue_id: issue_id.map(str::to_string),
            branch,
            workspace_path,
            status: SessionStatus::Spawning,
            activity: fleet_core::Activity::Active,
            runtime_handle: Some(runtime_handle),
            agent_info: None,
            pr: None,
            reactions_applied: Default::default(),
            entry_sequence: Default::default(),
            created_at: now,
            last_activity_at: now,
            metadata: Default::default(),
            extra: Default::default(),
        };
        session.enter_status(SessionStatus::Working, now);

        // Step 9: optional one-time agent setup.
        agent
            .post_launch_setup(&session)
            .await
            .map_err(SpawnError::Agent)?;

        // Step 10: commit — persist the full record over the sentinel.
        self.store.save(&session)?;

        Ok(session)
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
