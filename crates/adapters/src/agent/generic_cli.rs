// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic CLI agent adapter: works with any line-oriented interactive CLI
//! coding agent reachable through a `RuntimeAdapter`, with no assumptions
//! about a vendor-specific session log format.

use super::{AgentError, LaunchRequest};
use crate::runtime::RuntimeAdapter;
use async_trait::async_trait;
use fleet_core::{Activity, RuntimeHandle, Session, SessionStatus};

/// Patterns that indicate the agent is blocked on an interactive trust/consent
/// prompt at startup, paired with the keystroke that accepts it.
const TRUST_PROMPTS: &[(&str, &str)] = &[
    ("trust the files in this folder", "1"),
    ("trust this workspace", "1"),
    ("do you want to continue", "y"),
];

/// Patterns in recent pane output that indicate the agent is waiting on the
/// human/operator rather than actively working.
const WAITING_MARKERS: &[&str] = &["? ", "(y/n)", "[y/N]", "press enter", "waiting for input"];

/// Extract the binary basename from a command string.
pub fn extract_process_name(command: &str) -> String {
    command
        .split_whitespace()
        .next()
        .and_then(|first| first.rsplit('/').next())
        .unwrap_or(command)
        .to_string()
}

/// Agent adapter for a generic interactive CLI coding agent.
#[derive(Clone)]
pub struct GenericCliAgentAdapter<R: RuntimeAdapter> {
    runtime: R,
    /// Binary name (e.g. `claude`, `aider`) used both to build the launch
    /// command and to recognize the hosted process for liveness checks.
    agent_binary: String,
}

impl<R: RuntimeAdapter> GenericCliAgentAdapter<R> {
    pub fn new(runtime: R, agent_binary: impl Into<String>) -> Self {
        Self {
            runtime,
            agent_binary: agent_binary.into(),
        }
    }

    async fn poll_for_trust_prompt(&self, runtime_id: &str) -> Result<(), AgentError> {
        let attempts = crate::env::prompt_poll_max_attempts();
        let interval = crate::env::prompt_poll_interval();

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(interval).await;
            }
            let output = match self.runtime.capture_output(runtime_id, 50).await {
                Ok(out) => out,
                Err(_) => continue,
            };
            let lower = output.to_lowercase();
            if let Some((_, response)) = TRUST_PROMPTS
                .iter()
                .find(|(marker, _)| lower.contains(marker))
            {
                tracing::info!(runtime_id, "accepting startup trust prompt");
                self.runtime
                    .send(runtime_id, response)
                    .await
                    .map_err(|e| AgentError::SetupFailed(e.to_string()))?;
                return Ok(());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: RuntimeAdapter> super::AgentAdapter for GenericCliAgentAdapter<R> {
    async fn get_launch_command(&self, req: &LaunchRequest) -> Result<String, AgentError> {
        if req.prompt.trim().is_empty() {
            return Err(AgentError::LaunchFailed(
                "launch prompt must not be empty".into(),
            ));
        }
        let mut command = format!(
            "{} --session-id {} --permission-mode {}",
            self.agent_binary, req.session_id, req.permissions
        );
        if let Some(model) = &req.model {
            command.push_str(&format!(" --model {}", model));
        }
        command.push_str(&format!(
            " --prompt {}",
            escape_for_shell_double_quotes(&req.prompt)
        ));
        Ok(command)
    }

    async fn post_launch_setup(&self, session: &Session) -> Result<(), AgentError> {
        let Some(handle) = &session.runtime_handle else {
            return Ok(());
        };
        self.poll_for_trust_prompt(&handle.id).await
    }

    async fn is_processing(&self, handle: &RuntimeHandle) -> Result<bool, AgentError> {
        self.runtime
            .is_process_running(&handle.id, &self.agent_binary)
            .await
            .map_err(|e| AgentError::ObservationFailed(e.to_string()))
    }

    async fn get_activity_state(&self, session: &Session) -> Result<Activity, AgentError> {
        let Some(handle) = &session.runtime_handle else {
            return Ok(Activity::Exited);
        };

        let alive = self
            .runtime
            .is_alive(&handle.id)
            .await
            .map_err(|e| AgentError::ObservationFailed(e.to_string()))?;
        if !alive {
            return Ok(Activity::Exited);
        }

        let process_running = self.is_processing(handle).await?;
        if !process_running {
            return Ok(if session.status == SessionStatus::Spawning {
                Activity::Active
            } else {
                Activity::Exited
            });
        }

        let output = self
            .runtime
            .capture_output(&handle.id, 20)
            .await
            .map_err(|e| AgentError::ObservationFailed(e.to_string()))?;
        let lower = output.to_lowercase();
        if WAITING_MARKERS.iter().any(|m| lower.contains(m)) {
            return Ok(Activity::WaitingInput);
        }

        Ok(Activity::Active)
    }
}

/// Escape a string for embedding as a double-quoted shell argument.
fn escape_for_shell_double_quotes(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
#[path = "generic_cli_tests.rs"]
mod tests;
