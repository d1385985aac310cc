// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent adapters: the coding-agent process running inside a runtime instance.
//!
//! `AgentAdapter` is deliberately thin — it never touches the runtime's
//! lifecycle (spawn/destroy are the Session Manager's job via `RuntimeAdapter`)
//! but it knows how to build the launch command, run any one-time setup once
//! the runtime exists, and read the agent's observable activity back out of
//! the runtime.

mod generic_cli;

pub use generic_cli::GenericCliAgentAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AgentCall, FakeAgentAdapter};

use async_trait::async_trait;
use fleet_core::{Activity, RuntimeHandle, Session};
use thiserror::Error;

/// Errors from agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("launch command build failed: {0}")]
    LaunchFailed(String),
    #[error("post-launch setup failed: {0}")]
    SetupFailed(String),
    #[error("activity observation failed: {0}")]
    ObservationFailed(String),
}

/// Inputs needed to build a runtime launch command for an agent.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub session_id: String,
    pub permissions: String,
    pub model: Option<String>,
    pub prompt: String,
}

/// Adapter for the coding-agent process hosted inside a runtime instance.
#[async_trait]
pub trait AgentAdapter: Send + Sync + 'static {
    /// Build the shell command the runtime should execute to launch the agent.
    async fn get_launch_command(&self, req: &LaunchRequest) -> Result<String, AgentError>;

    /// Run any one-time setup after the runtime instance exists (e.g. accepting
    /// an interactive trust prompt). Optional: adapters that need nothing here
    /// return `Ok(())` immediately.
    async fn post_launch_setup(&self, session: &Session) -> Result<(), AgentError>;

    /// Is the agent actively doing work right now (as opposed to idle/waiting)?
    async fn is_processing(&self, handle: &RuntimeHandle) -> Result<bool, AgentError>;

    /// Observed activity state for a session's agent.
    async fn get_activity_state(&self, session: &Session) -> Result<Activity, AgentError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
