// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::agent::{AgentAdapter, AgentError, LaunchRequest};
use crate::runtime::{RuntimeAdapter, RuntimeError};
use async_trait::async_trait;
use fleet_core::{Activity, RuntimeHandle, Session};
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any RuntimeAdapter
#[derive(Clone)]
pub struct TracedRuntime<R> {
    inner: R,
}

impl<R> TracedRuntime<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RuntimeAdapter> RuntimeAdapter for TracedRuntime<R> {
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, RuntimeError> {
        async {
            tracing::info!(cmd, env_count = env.len(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.spawn(name, cwd, cmd, env).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(id) => tracing::info!(runtime_id = id.as_str(), elapsed_ms, "instance created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(tracing::info_span!("runtime.spawn", name, cwd = %cwd.display()))
        .await
    }

    async fn send(&self, id: &str, input: &str) -> Result<(), RuntimeError> {
        tracing::info_span!("runtime.send", id)
            .in_scope(|| tracing::debug!(input_len = input.len(), "sending"));
        let result = self.inner.send(id, input).await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "send failed");
        }
        result
    }

    async fn send_literal(&self, id: &str, text: &str) -> Result<(), RuntimeError> {
        let result = self.inner.send_literal(id, text).await;
        if let Err(ref e) = result {
            tracing::error!(id, error = %e, "send_literal failed");
        }
        result
    }

    async fn send_enter(&self, id: &str) -> Result<(), RuntimeError> {
        let result = self.inner.send_enter(id).await;
        if let Err(ref e) = result {
            tracing::error!(id, error = %e, "send_enter failed");
        }
        result
    }

    async fn destroy(&self, id: &str) -> Result<(), RuntimeError> {
        let result = self.inner.destroy(id).await;
        tracing::info_span!("runtime.destroy", id).in_scope(|| match &result {
            Ok(()) => tracing::info!("destroyed"),
            Err(e) => tracing::warn!(error = %e, "destroy failed (may be expected)"),
        });
        result
    }

    async fn is_alive(&self, id: &str) -> Result<bool, RuntimeError> {
        let result = self.inner.is_alive(id).await;
        tracing::trace!(id, alive = ?result.as_ref().ok(), "checked");
        result
    }

    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, RuntimeError> {
        let result = self.inner.capture_output(id, lines).await;
        tracing::info_span!("runtime.capture", id, lines).in_scope(|| {
            tracing::debug!(
                captured_len = result.as_ref().map(|s| s.len()).ok(),
                "captured"
            )
        });
        result
    }

    async fn is_process_running(&self, id: &str, pattern: &str) -> Result<bool, RuntimeError> {
        self.inner.is_process_running(id, pattern).await
    }

    async fn get_exit_code(&self, id: &str) -> Result<Option<i32>, RuntimeError> {
        self.inner.get_exit_code(id).await
    }
}

/// Wrapper that adds tracing to any AgentAdapter
#[derive(Clone)]
pub struct TracedAgent<A> {
    inner: A,
}

impl<A> TracedAgent<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: AgentAdapter> AgentAdapter for TracedAgent<A> {
    async fn get_launch_command(&self, req: &LaunchRequest) -> Result<String, AgentError> {
        let span = tracing::info_span!("agent.get_launch_command", session_id = %req.session_id);
        async {
            let result = self.inner.get_launch_command(req).await;
            match &result {
                Ok(cmd) => tracing::info!(cmd, "launch command built"),
                Err(e) => tracing::error!(error = %e, "launch command build failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn post_launch_setup(&self, session: &Session) -> Result<(), AgentError> {
        let span = tracing::info_span!("agent.post_launch_setup", session_id = %session.id);
        async {
            let result = self.inner.post_launch_setup(session).await;
            if let Err(ref e) = result {
                tracing::error!(error = %e, "post-launch setup failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn is_processing(&self, handle: &RuntimeHandle) -> Result<bool, AgentError> {
        let result = self.inner.is_processing(handle).await;
        tracing::trace!(runtime_id = %handle.id, processing = ?result.as_ref().ok(), "checked");
        result
    }

    async fn get_activity_state(&self, session: &Session) -> Result<Activity, AgentError> {
        let result = self.inner.get_activity_state(session).await;
        tracing::trace!(session_id = %session.id, activity = ?result.as_ref().ok(), "observed");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
