// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle Manager: the poll loop, status derivation, and reaction
//! dispatch that drive every session forward after `spawn`.

pub mod decision;

use crate::error::LifecycleError;
use crate::notify_router::NotifyRouter;
use crate::registry::CapabilityRegistry;
use crate::session_manager::SessionManager;
use decision::{derive_status, Observation};
use fleet_core::{
    Activity, Clock, Config, Event, EventKind, PrSnapshot, ProjectConfig, Priority, ReactionEntry,
    ReactionKind, Session, SessionId, SessionStatus,
};
use fleet_storage::{EventLog, SessionStore};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Tunables for the poll loop; defaults match SPEC_FULL's stated defaults.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub poll_interval: Duration,
    pub stuck_after: Duration,
    pub worker_pool_size: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            stuck_after: Duration::from_secs(600),
            worker_pool_size: 8,
        }
    }
}

/// Reserved tracker name for the single built-in GitHub SCM/tracker pair.
/// A config-driven per-project SCM choice is future work; every project
/// currently shares the one registered `"github"` adapter, if any.
const SCM_SLOT: &str = "github";

pub struct LifecycleManager<C: Clock> {
    registry: Arc<CapabilityRegistry>,
    store: Arc<SessionStore>,
    events: Arc<Mutex<EventLog>>,
    router: Option<NotifyRouter>,
    sessions: Arc<SessionManager<C>>,
    clock: C,
    config: LifecycleConfig,
    idle_since: Mutex<HashMap<SessionId, chrono::DateTime<chrono::Utc>>>,
    last_pr_snapshot: Mutex<HashMap<SessionId, PrSnapshot>>,
}

impl<C: Clock> LifecycleManager<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        store: Arc<SessionStore>,
        events: Arc<Mutex<EventLog>>,
        router: Option<NotifyRouter>,
        sessions: Arc<SessionManager<C>>,
        clock: C,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            registry,
            store,
            events,
            router,
            sessions,
            clock,
            config,
            idle_since: Mutex::new(HashMap::new()),
            last_pr_snapshot: Mutex::new(HashMap::new()),
        }
    }

    /// Run the poll loop until `cancel` fires. Each tick's per-session
    /// observations run concurrently, bounded by `worker_pool_size`.
    pub async fn run(&self, config: &Config, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("lifecycle manager shutting down");
                    return;
                }
                _ = interval.tick() => {
                    self.tick(config).await;
                }
            }
        }
    }

    async fn tick(&self, config: &Config) {
        let span = tracing::info_span!("lifecycle_tick");
        let _enter = span.enter();

        let sessions = match self.store.list() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "failed to list sessions for poll tick");
                return;
            }
        };
        let active: Vec<Session> = sessions
            .into_iter()
            .filter(|s| !s.status.is_terminal())
            .collect();

        stream::iter(active)
            .for_each_concurrent(self.config.worker_pool_size, |session| async move {
                let id = session.id.clone();
                let span = tracing::info_span!("observe_session", session_id = %id);
                let _enter = span.enter();
                if let Err(e) = self.observe_one(config, session).await {
                    tracing::error!(session_id = %id, error = %e, "tick failed for session");
                }
            })
            .await;
    }

    async fn observe_one(&self, config: &Config, mut session: Session) -> Result<(), LifecycleError> {
        let project = config.projects.get(&session.project_id);

        let mut runtime_alive = false;
        if let Some(handle) = &session.runtime_handle {
            if let Some(runtime) = self.registry.runtime(&handle.runtime_name) {
                runtime_alive = runtime.is_alive(&handle.id).await.unwrap_or(false);
            }
        }

        let mut activity = session.activity;
        if runtime_alive {
            if let Some(agent) = self.registry.agent(&config.defaults.agent) {
                if let Ok(observed) = agent.get_activity_state(&session).await {
                    activity = observed;
                }
            }
        } else {
            activity = Activity::Exited;
        }

        let idle_elapsed = self.track_idle(&session.id, activity, self.clock.now());
        let pr = self.observe_pr(project, &session).await;

        let observation = Observation {
            pr: pr.clone(),
            activity,
            runtime_alive,
            idle_elapsed,
        };
        let next = derive_status(&observation, session.status, self.config.stuck_after);

        session.activity = activity;
        if let Some(snapshot) = &pr {
            session.pr = Some(snapshot.handle.clone());
        }

        if next == session.status {
            session.last_activity_at = self.clock.now();
            self.store.save(&session)?;
            return Ok(());
        }

        let from = session.status;
        let now = self.clock.now();
        let seq = session.enter_status(next, now);
        self.store.save(&session)?;
        self.emit(
            EventKind::SessionTransitioned {
                from: from.to_string(),
                to: next.to_string(),
            },
            Priority::Info,
            &session,
            format!("session {} moved {from} -> {next}", session.id),
        );

        if let Some(project) = project {
            self.fire_reaction(config, project, &mut session, next, seq)
                .await?;
        }
        Ok(())
    }

    /// Track how long a session has been continuously `Idle`, purely
    /// in-memory — restart loses the streak, which is acceptable since a
    /// restarted daemon re-observes a live agent within one tick anyway.
    fn track_idle(
        &self,
        id: &SessionId,
        activity: Activity,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<Duration> {
        let mut since = self.idle_since.lock();
        if activity == Activity::Idle {
            let started = *since.entry(id.clone()).or_insert(now);
            Some((now - started).to_std().unwrap_or(Duration::ZERO))
        } else {
            since.remove(id);
            None
        }
    }

    /// Fetch this tick's PR observation, degrading to the last successful
    /// snapshot (with an `api_rate_limited` blocker) on a transient SCM
    /// failure, per the tracker/SCM contract's fallback rule.
    async fn observe_pr(&self, project: Option<&ProjectConfig>, session: &Session) -> Option<PrSnapshot> {
        let scm = self.registry.scm(SCM_SLOT)?;
        let project = project?;

        let handle = match &session.pr {
            Some(handle) => Some(handle.clone()),
            None => scm.detect_pr(project, &session.branch).await.ok().flatten(),
        }?;

        match scm.get_pr_summary(&handle).await {
            Ok(snapshot) => {
                self.last_pr_snapshot.lock().insert(session.id.clone(), snapshot.clone());
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "scm observation failed, degrading to last-known-good");
                let mut cache = self.last_pr_snapshot.lock();
                cache.get(&session.id).cloned().map(|mut snapshot| {
                    if !snapshot.mergeability.blockers.contains(&fleet_core::Blocker::ApiRateLimited) {
                        snapshot.mergeability.blockers.push(fleet_core::Blocker::ApiRateLimited);
                        snapshot.mergeability.mergeable = false;
                    }
                    snapshot
                })
            }
        }
    }

    async fn fire_reaction(
        &self,
        config: &Config,
        project: &ProjectConfig,
        session: &mut Session,
        status: SessionStatus,
        entry_sequence: u32,
    ) -> Result<(), LifecycleError> {
        let spec = project
            .reactions
            .get(&status.to_string())
            .or_else(|| config.reactions.get(&status.to_string()));
        let Some(spec) = spec else {
            return Ok(());
        };
        if !spec.auto {
            return Ok(());
        }

        let entry = ReactionEntry::new(status, entry_sequence);
        if session.has_fired(&entry) {
            return Ok(());
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.apply_reaction(project, session, &spec.action).await {
                Ok(()) => {
                    session.mark_fired(entry);
                    self.store.save(session)?;
                    self.emit(
                        EventKind::ReactionFired {
                            status: status.to_string(),
                            attempt,
                        },
                        Priority::Info,
                        session,
                        format!("reaction for {status} fired on attempt {attempt}"),
                    );
                    return Ok(());
                }
                Err(e) => {
                    self.emit(
                        EventKind::ReactionFailed {
                            status: status.to_string(),
                            attempt,
                            error: e.to_string(),
                        },
                        Priority::Warning,
                        session,
                        format!("reaction for {status} failed on attempt {attempt}: {e}"),
                    );
                    if attempt > spec.retries {
                        self.emit(
                            EventKind::ReactionEscalated {
                                status: status.to_string(),
                            },
                            Priority::Urgent,
                            session,
                            format!("reaction for {status} escalated after {attempt} attempts"),
                        );
                        session.mark_fired(entry);
                        let now = self.clock.now();
                        session.enter_status(SessionStatus::Stuck, now);
                        self.store.save(session)?;
                        return Ok(());
                    }
                    let backoff = Duration::from_secs(2u64.saturating_pow(attempt.min(6)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn apply_reaction(
        &self,
        project: &ProjectConfig,
        session: &Session,
        kind: &ReactionKind,
    ) -> Result<(), LifecycleError> {
        match kind {
            ReactionKind::SendToAgent { template } => {
                self.sessions.send(&session.id, template).await?;
                Ok(())
            }
            ReactionKind::Notify { priority } => {
                self.emit(
                    EventKind::SessionTransitioned {
                        from: session.status.to_string(),
                        to: session.status.to_string(),
                    },
                    *priority,
                    session,
                    format!("notify reaction for session {}", session.id),
                );
                Ok(())
            }
            ReactionKind::AutoMerge { strategy } => {
                let scm = self
                    .registry
                    .scm(SCM_SLOT)
                    .ok_or_else(|| LifecycleError::NoPrForAutoMerge(session.id.to_string()))?;
                let pr = session
                    .pr
                    .clone()
                    .ok_or_else(|| LifecycleError::NoPrForAutoMerge(session.id.to_string()))?;
                scm.merge_pr(&pr, *strategy).await?;
                let _ = project;
                self.sessions.kill(&session.id).await?;
                Ok(())
            }
        }
    }

    fn emit(&self, kind: EventKind, priority: Priority, session: &Session, message: impl Into<String>) {
        let event = Event {
            id: 0,
            kind,
            priority,
            session_id: Some(session.id.clone()),
            project_id: Some(session.project_id.clone()),
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
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
