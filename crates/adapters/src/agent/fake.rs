// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake agent adapter for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AgentAdapter, AgentError, LaunchRequest};
use async_trait::async_trait;
use fleet_core::{Activity, RuntimeHandle, Session, SessionId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Recorded call to FakeAgentAdapter
#[derive(Debug, Clone)]
pub enum AgentCall {
    GetLaunchCommand { session_id: String },
    PostLaunchSetup { session_id: SessionId },
    IsProcessing { runtime_id: String },
    GetActivityState { session_id: SessionId },
}

/// Fake agent adapter for testing
#[derive(Clone)]
pub struct FakeAgentAdapter {
    inner: Arc<Mutex<FakeAgentState>>,
}

struct FakeAgentState {
    calls: Vec<AgentCall>,
    launch_command: String,
    activity_by_session: HashMap<SessionId, Activity>,
    processing_by_runtime: HashMap<String, bool>,
    launch_error: Option<String>,
    setup_error: Option<String>,
}

impl Default for FakeAgentAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAgentAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeAgentState {
                calls: Vec::new(),
                launch_command: "fake-agent --prompt".to_string(),
                activity_by_session: HashMap::new(),
                processing_by_runtime: HashMap::new(),
                launch_error: None,
                setup_error: None,
            })),
        }
    }

    pub fn calls(&self) -> Vec<AgentCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_activity(&self, session_id: &SessionId, activity: Activity) {
        self.inner
            .lock()
            .activity_by_session
            .insert(session_id.clone(), activity);
    }

    pub fn set_processing(&self, runtime_id: &str, processing: bool) {
        self.inner
            .lock()
            .processing_by_runtime
            .insert(runtime_id.to_string(), processing);
    }

    pub fn set_launch_error(&self, message: impl Into<String>) {
        self.inner.lock().launch_error = Some(message.into());
    }

    pub fn set_setup_error(&self, message: impl Into<String>) {
        self.inner.lock().setup_error = Some(message.into());
    }
}

#[async_trait]
impl AgentAdapter for FakeAgentAdapter {
    async fn get_launch_command(&self, req: &LaunchRequest) -> Result<String, AgentError> {
        let mut inner = self.inner.lock();
        inner.calls.push(AgentCall::GetLaunchCommand {
            session_id: req.session_id.clone(),
        });
        if let Some(msg) = inner.launch_error.take() {
            return Err(AgentError::LaunchFailed(msg));
        }
        Ok(inner.launch_command.clone())
    }

    async fn post_launch_setup(&self, session: &Session) -> Result<(), AgentError> {
        let mut inner = self.inner.lock();
        inner.calls.push(AgentCall::PostLaunchSetup {
            session_id: session.id.clone(),
        });
        if let Some(msg) = inner.setup_error.take() {
            return Err(AgentError::SetupFailed(msg));
        }
        Ok(())
    }

    async fn is_processing(&self, handle: &RuntimeHandle) -> Result<bool, AgentError> {
        let mut inner = self.inner.lock();
        inner.calls.push(AgentCall::IsProcessing {
            runtime_id: handle.id.clone(),
        });
        Ok(inner
            .processing_by_runtime
            .get(&handle.id)
            .copied()
            .unwrap_or(true))
    }

    async fn get_activity_state(&self, session: &Session) -> Result<Activity, AgentError> {
        let mut inner = self.inner.lock();
        inner.calls.push(AgentCall::GetActivityState {
            session_id: session.id.clone(),
        });
        Ok(inner
            .activity_by_session
            .get(&session.id)
            .cloned()
            .unwrap_or(Activity::Active))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
