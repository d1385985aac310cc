// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Issue, IssueState, TrackerAdapter, TrackerError};
use async_trait::async_trait;
use fleet_core::ProjectConfig;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Record of a call made against a [`FakeTrackerAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    GetIssue { issue_id: String },
    ListIssues { state: Option<IssueState> },
    UpdateIssue { issue_id: String, labels: Vec<String> },
    CreateIssue { title: String },
}

#[derive(Default)]
struct FakeTrackerState {
    calls: Vec<TrackerCall>,
    issues: HashMap<String, Issue>,
    next_id: u64,
    get_issue_error: Option<String>,
}

/// In-memory [`TrackerAdapter`] for engine tests.
#[derive(Clone)]
pub struct FakeTrackerAdapter {
    state: Arc<Mutex<FakeTrackerState>>,
}

impl Default for FakeTrackerAdapter {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTrackerState {
                next_id: 1,
                ..Default::default()
            })),
        }
    }
}

impl FakeTrackerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.state.lock().calls.clone()
    }

    pub fn insert_issue(&self, issue: Issue) {
        self.state.lock().issues.insert(issue.id.clone(), issue);
    }

    pub fn set_get_issue_error(&self, message: impl Into<String>) {
        self.state.lock().get_issue_error = Some(message.into());
    }
}

#[async_trait]
impl TrackerAdapter for FakeTrackerAdapter {
    async fn get_issue(&self, issue_id: &str, _project: &ProjectConfig) -> Result<Issue, TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::GetIssue {
            issue_id: issue_id.to_string(),
        });
        if let Some(message) = state.get_issue_error.take() {
            return Err(TrackerError::Transient(message));
        }
        state
            .issues
            .get(issue_id)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(issue_id.to_string()))
    }

    async fn list_issues(
        &self,
        _project: &ProjectConfig,
        state_filter: Option<IssueState>,
    ) -> Result<Vec<Issue>, TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ListIssues { state: state_filter });
        Ok(state
            .issues
            .values()
            .filter(|issue| match state_filter {
                Some(s) => issue.state == s,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn update_issue(
        &self,
        issue_id: &str,
        _project: &ProjectConfig,
        labels: &[String],
    ) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::UpdateIssue {
            issue_id: issue_id.to_string(),
            labels: labels.to_vec(),
        });
        match state.issues.get_mut(issue_id) {
            Some(issue) => {
                issue.labels = labels.to_vec();
                Ok(())
            }
            None => Err(TrackerError::NotFound(issue_id.to_string())),
        }
    }

    async fn create_issue(
        &self,
        _project: &ProjectConfig,
        title: &str,
        body: &str,
    ) -> Result<String, TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::CreateIssue { title: title.to_string() });
        let id = state.next_id.to_string();
        state.next_id += 1;
        state.issues.insert(
            id.clone(),
            Issue {
                id: id.clone(),
                title: title.to_string(),
                body: body.to_string(),
                state: IssueState::Open,
                labels: Vec::new(),
                url: format!("https://example.test/issues/{id}"),
            },
        );
        Ok(id)
    }

    async fn generate_prompt(&self, issue_id: &str, project: &ProjectConfig) -> Result<String, TrackerError> {
        let issue = self.get_issue(issue_id, project).await?;
        Ok(format!("Work on {}: {}", issue.id, issue.title))
    }

    async fn issue_url(&self, issue_id: &str, project: &ProjectConfig) -> Result<String, TrackerError> {
        Ok(self.get_issue(issue_id, project).await?.url)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
