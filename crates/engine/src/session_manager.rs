// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Manager: `spawn`, `get`, `list`, `send`, `kill`, `cleanup`,
//! `restore` — every operation a human operator or the Lifecycle Manager
//! can perform directly on a session, as opposed to the automated
//! transitions the Lifecycle Manager derives on its own.

use crate::error::SessionManagerError;
use crate::id_alloc::IdAllocator;
use crate::notify_router::NotifyRouter;
use crate::registry::CapabilityRegistry;
use crate::spawn::{SpawnPipeline, SpawnRequest};
use fleet_core::{Clock, Config, Event, EventKind, Priority, Session, SessionId, SessionStatus};
use fleet_storage::{EventLog, SessionStore};
use parking_lot::Mutex;
use std::sync::Arc;

/// Message length above which `send` uses the buffered transport (tmux
/// paste buffer) instead of direct keystroke injection.
pub const DIRECT_INPUT_MAX_LEN: usize = 200;

pub struct SessionManager<C: Clock> {
    registry: Arc<CapabilityRegistry>,
    store: Arc<SessionStore>,
    events: Arc<Mutex<EventLog>>,
    router: Option<NotifyRouter>,
    spawner: SpawnPipeline<C>,
    clock: C,
}

impl<C: Clock> SessionManager<C> {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        store: Arc<SessionStore>,
        events: Arc<Mutex<EventLog>>,
        ids: Arc<IdAllocator>,
        clock: C,
    ) -> Self {
        Self::with_router(registry, store, events, ids, clock, None)
    }

    pub fn with_router(
        registry: Arc<CapabilityRegistry>,
        store: Arc<SessionStore>,
        events: Arc<Mutex<EventLog>>,
        ids: Arc<IdAllocator>,
        clock: C,
        router: Option<NotifyRouter>,
    ) -> Self {
        let spawner = SpawnPipeline {
            registry: Arc::clone(&registry),
            store: Arc::clone(&store),
            ids,
            clock: clock.clone(),
        };
        Self {
            registry,
            store,
            events,
            router,
            spawner,
            clock,
        }
    }

    fn emit(&self, kind: EventKind, session_id: Option<SessionId>, project_id: Option<String>, message: impl Into<String>) {
        let priority = match &kind {
            EventKind::ReactionEscalated { .. } | EventKind::NotifierDropped { .. } => {
                Priority::Urgent
            }
            EventKind::SessionKilled | EventKind::ReactionFailed { .. } => Priority::Warning,
            _ => Priority::Info,
        };
        let event = Event {
            id: 0,
            kind,
            priority,
            session_id,
            project_id,
            timestamp: self.clock.now(),
            message: message.into(),
            data: Default::default(),
        };
        if let Some(router) = &self.router {
            router.publish(event.clone());
        }
        let mut log = self.events.lock();
        if let Err(e) = log.append(event) {
            tracing::error!(error = %e, "failed to append event");
        }
    }

    pub async fn spawn(
        &self,
        config: &Config,
        project_id: &str,
        issue_id: Option<String>,
    ) -> Result<Session, SessionManagerError> {
        let session = self
            .spawner
            .spawn(
                config,
                SpawnRequest {
                    project_id: project_id.to_string(),
                    issue_id,
                },
            )
            .await?;

        // Step 11: emit session.spawned; enqueuing into the poll set is the
        // caller's job (the Lifecycle Manager owns that set).
        self.emit(
            EventKind::SessionSpawned {
                project_id: session.project_id.clone(),
            },
            Some(session.id.clone()),
            Some(session.project_id.clone()),
            format!("session {} spawned", session.id),
        );

        Ok(session)
    }

    pub fn get(&self, id: &SessionId) -> Result<Session, SessionManagerError> {
        self.store
            .load(id)
            .map_err(|_| SessionManagerError::NotFound(id.to_string()))
    }

    pub fn list(&self, project: Option<&str>) -> Result<Vec<Session>, SessionManagerError> {
        let all = self.store.list()?;
        Ok(match project {
            Some(p) => all.into_iter().filter(|s| s.project_id == p).collect(),
            None => all,
        })
    }

    /// UTF-8 message, control characters stripped. Long (>200 chars) or
    /// multi-line messages use the buffered transport; short single-line
    /// messages go through direct keystroke injection.
    pub async fn send(&self, id: &SessionId, message: &str) -> Result<(), SessionManagerError> {
        let session = self.get(id)?;
        let handle = session
            .runtime_handle
            .as_ref()
            .ok_or_else(|| SessionManagerError::NoRuntimeHandle(id.to_string()))?;
        let runtime = self
            .registry
            .runtime(&handle.runtime_name)
            .ok_or_else(|| SessionManagerError::NoRuntimeHandle(id.to_string()))?;

        let sanitized: String = message.chars().filter(|c| !c.is_control() || *c == '\n').collect();
        if sanitized.len() > DIRECT_INPUT_MAX_LEN || sanitized.contains('\n') {
            runtime.send(&handle.id, &sanitized).await?;
        } else {
            runtime.send_literal(&handle.id, &sanitized).await?;
            runtime.send_enter(&handle.id).await?;
        }
        Ok(())
    }

    /// Idempotent: a second `kill` on an already-killed session is a no-op
    /// and does not re-emit `session.killed`.
    pub async fn kill(&self, id: &SessionId) -> Result<(), SessionManagerError> {
        let mut session = match self.store.load(id) {
            Ok(s) => s,
            Err(_) => {
                // Already archived. A prior kill already archived it; a
                // session that never existed is a genuine NotFound.
                return match self.store.load_archived(id) {
                    Ok(_) => Ok(()),
                    Err(_) => Err(SessionManagerError::NotFound(id.to_string())),
                };
            }
        };

        if let Some(handle) = &session.runtime_handle {
            if let Some(runtime) = self.registry.runtime(&handle.runtime_name) {
                if let Err(e) = runtime.destroy(&handle.id).await {
                    tracing::warn!(session_id = %id, error = %e, "runtime destroy failed during kill, archiving anyway");
                }
            }
        }

        let now = self.clock.now();
        session.enter_status(SessionStatus::Killed, now);
        self.store.save(&session)?;
        self.store.archive(id)?;

        self.emit(
            EventKind::SessionKilled,
            Some(id.clone()),
            Some(session.project_id.clone()),
            format!("session {id} killed"),
        );
        Ok(())
    }

    /// For each session whose status already reflects a merged/done PR or a
    /// completed issue, `kill` then archive. Non-cleanable sessions are
    /// left untouched.
    pub async fn cleanup(&self, project: Option<&str>) -> Result<Vec<SessionId>, SessionManagerError> {
        let mut cleaned = Vec::new();
        for session in self.list(project)? {
            if matches!(session.status, SessionStatus::Merged | SessionStatus::Done) {
                self.kill(&session.id).await?;
                cleaned.push(session.id);
            }
        }
        Ok(cleaned)
    }

    /// Restore an archived or terminated session whose workspace still
    /// exists on disk and whose status is not in `{killed, cleanup}`.
    pub async fn restore(
        &self,
        config: &Config,
        id: &SessionId,
    ) -> Result<Session, SessionManagerError> {
        let archived = self
            .store
            .load_archived(id)
            .map_err(|_| SessionManagerError::NotFound(id.to_string()))?;

        if !archived.status.is_restorable() {
            return Err(SessionManagerError::NotRestorable(id.to_string()));
        }

        let workspace = self
            .registry
            .workspace(&config.defaults.workspace)
            .ok_or_else(|| SessionManagerError::Registry(crate::error::RegistryError::NotRegistered {
                slot: "workspace".to_string(),
                name: config.defaults.workspace.clone(),
            }))?;
        if !workspace.exists(&archived.workspace_path).await {
            return Err(SessionManagerError::WorkspaceMissing(id.to_string()));
        }

        let mut session = self.store.restore(id)?;

        let runtime = self
            .registry
            .runtime(&config.defaults.runtime)
            .ok_or_else(|| SessionManagerError::Registry(crate::error::RegistryError::NotRegistered {
                slot: "runtime".to_string(),
                name: config.defaults.runtime.clone(),
            }))?;
        let agent = self
            .registry
            .agent(&config.defaults.agent)
            .ok_or_else(|| SessionManagerError::Registry(crate::error::RegistryError::NotRegistered {
                slot: "agent".to_string(),
                name: config.defaults.agent.clone(),
            }))?;

        let launch_req = fleet_adapters::LaunchRequest {
            session_id: id.as_str().to_string(),
            permissions: "default".to_string(),
            model: None,
            prompt: String::new(),
        };
        let command = agent.get_launch_command(&launch_req).await.map_err(|e| {
            SessionManagerError::Spawn(crate::error::SpawnError::Agent(e))
        })?;
        let runtime_id = runtime
            .spawn(id.as_str(), &session.workspace_path, &command, &[])
            .await?;

        session.runtime_handle = Some(fleet_core::RuntimeHandle {
            id: runtime_id,
            runtime_name: config.defaults.runtime.clone(),
            data: Default::default(),
        });
        let now = self.clock.now();
        session.enter_status(SessionStatus::Working, now);
        self.store.save(&session)?;

        self.emit(
            EventKind::SessionRestored,
            Some(id.clone()),
            Some(session.project_id.clone()),
            format!("session {id} restored"),
        );
        Ok(session)
    }
}

#[cfg(test)]
#[path = "session_manager_tests.rs"]
mod tests;
