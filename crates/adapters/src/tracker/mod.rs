// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker adapters: the issue/ticket system a session's work is derived from.

mod github;

pub use github::GitHubTrackerAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTrackerAdapter, TrackerCall};

use async_trait::async_trait;
use fleet_core::ProjectConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("issue not found: {0}")]
    NotFound(String),
    #[error("transient tracker error: {0}")]
    Transient(String),
    #[error("permanent tracker error: {0}")]
    Permanent(String),
}

/// Tracker-agnostic issue lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    InProgress,
    Closed,
    Cancelled,
}

/// A tracker issue as observed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub labels: Vec<String>,
    pub url: String,
}

/// Adapter for an issue-tracking system (GitHub Issues, Jira, ...).
#[async_trait]
pub trait TrackerAdapter: Send + Sync + 'static {
    /// Fetch a single issue by its opaque id.
    async fn get_issue(&self, issue_id: &str, project: &ProjectConfig) -> Result<Issue, TrackerError>;

    /// Is the issue in a terminal, no-further-work state?
    async fn is_completed(&self, issue_id: &str, project: &ProjectConfig) -> Result<bool, TrackerError> {
        Ok(matches!(
            self.get_issue(issue_id, project).await?.state,
            IssueState::Closed | IssueState::Cancelled
        ))
    }

    /// List issues for a project, optionally filtered by state.
    async fn list_issues(
        &self,
        project: &ProjectConfig,
        state: Option<IssueState>,
    ) -> Result<Vec<Issue>, TrackerError>;

    /// Update an issue's labels and/or state.
    async fn update_issue(
        &self,
        issue_id: &str,
        project: &ProjectConfig,
        labels: &[String],
    ) -> Result<(), TrackerError>;

    /// Create a new issue, returning its opaque id.
    async fn create_issue(
        &self,
        project: &ProjectConfig,
        title: &str,
        body: &str,
    ) -> Result<String, TrackerError>;

    /// Render the launch prompt the agent should be started with.
    async fn generate_prompt(&self, issue_id: &str, project: &ProjectConfig) -> Result<String, TrackerError>;

    /// Derive the branch name a session for this issue should use.
    fn branch_name(&self, issue_id: &str, project: &ProjectConfig) -> String {
        format!("feat/{}-{}", project.session_prefix, issue_id)
    }

    /// Human-facing URL for the issue.
    async fn issue_url(&self, issue_id: &str, project: &ProjectConfig) -> Result<String, TrackerError>;

    /// The label the engine applies to an issue while it's being worked.
    fn issue_label(&self) -> &str {
        "in-progress"
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
