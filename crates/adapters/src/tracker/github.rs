// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub Issues-backed tracker adapter

use super::{Issue, IssueState, TrackerAdapter, TrackerError};
use async_trait::async_trait;
use fleet_core::ProjectConfig;
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";

/// Tracker adapter backed by the GitHub Issues REST API.
#[derive(Clone)]
pub struct GitHubTrackerAdapter {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GitHubTrackerAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Construct from `$GITHUB_TOKEN`. Returns `None` (not an error) when
    /// unset, matching the registry's "skip silently when prerequisites
    /// are unavailable" contract for builtins.
    pub fn from_env() -> Option<Self> {
        std::env::var("GITHUB_TOKEN").ok().map(Self::new)
    }

    #[cfg(test)]
    fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    fn owner_repo<'a>(project: &'a ProjectConfig) -> Result<(&'a str, &'a str), TrackerError> {
        project
            .repo
            .split_once('/')
            .ok_or_else(|| TrackerError::Permanent(format!("malformed repo spec: {}", project.repo)))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TrackerError> {
        self.client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fleet-adapters")
            .send()
            .await
            .map_err(|e| map_transport_error(&e))
    }
}

fn map_transport_error(e: &reqwest::Error) -> TrackerError {
    if e.is_timeout() || e.is_connect() {
        TrackerError::Transient(e.to_string())
    } else {
        TrackerError::Permanent(e.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode, body: &str) -> TrackerError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        TrackerError::Transient(format!("status {status}: {body}"))
    } else if status == reqwest::StatusCode::NOT_FOUND {
        TrackerError::NotFound(body.to_string())
    } else {
        TrackerError::Permanent(format!("status {status}: {body}"))
    }
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: String,
    #[serde(default)]
    state_reason: Option<String>,
    #[serde(default)]
    labels: Vec<GhLabel>,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GhLabel {
    name: String,
}

fn to_issue(gh: GhIssue) -> Issue {
    let state = match (gh.state.as_str(), gh.state_reason.as_deref()) {
        ("closed", Some("not_planned")) => IssueState::Cancelled,
        ("closed", _) => IssueState::Closed,
        (_, _) if gh.labels.iter().any(|l| l.name == "in-progress") => IssueState::InProgress,
        _ => IssueState::Open,
    };
    Issue {
        id: gh.number.to_string(),
        title: gh.title,
        body: gh.body.unwrap_or_default(),
        state,
        labels: gh.labels.into_iter().map(|l| l.name).collect(),
        url: gh.html_url,
    }
}

#[async_trait]
impl TrackerAdapter for GitHubTrackerAdapter {
    async fn get_issue(&self, issue_id: &str, project: &ProjectConfig) -> Result<Issue, TrackerError> {
        let (owner, repo) = Self::owner_repo(project)?;
        let base = &self.base_url;
        let url = format!("{base}/repos/{owner}/{repo}/issues/{issue_id}");
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }
        let gh: GhIssue = response
            .json()
            .await
            .map_err(|e| TrackerError::Permanent(e.to_string()))?;
        Ok(to_issue(gh))
    }

    async fn list_issues(
        &self,
        project: &ProjectConfig,
        state: Option<IssueState>,
    ) -> Result<Vec<Issue>, TrackerError> {
        let (owner, repo) = Self::owner_repo(project)?;
        let gh_state = match state {
            Some(IssueState::Closed) | Some(IssueState::Cancelled) => "closed",
            Some(_) => "open",
            None => "all",
        };
        let base = &self.base_url;
        let url = format!("{base}/repos/{owner}/{repo}/issues?state={gh_state}");
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }
        let issues: Vec<GhIssue> = response
            .json()
            .await
            .map_err(|e| TrackerError::Permanent(e.to_string()))?;
        Ok(issues.into_iter().map(to_issue).collect())
    }

    async fn update_issue(
        &self,
        issue_id: &str,
        project: &ProjectConfig,
        labels: &[String],
    ) -> Result<(), TrackerError> {
        let (owner, repo) = Self::owner_repo(project)?;
        let base = &self.base_url;
        let url = format!("{base}/repos/{owner}/{repo}/issues/{issue_id}");
        let response = self
            .client
            .patch(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fleet-adapters")
            .json(&serde_json::json!({ "labels": labels }))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }
        Ok(())
    }

    async fn create_issue(
        &self,
        project: &ProjectConfig,
        title: &str,
        body: &str,
    ) -> Result<String, TrackerError> {
        let (owner, repo) = Self::owner_repo(project)?;
        let base = &self.base_url;
        let url = format!("{base}/repos/{owner}/{repo}/issues");
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fleet-adapters")
            .json(&serde_json::json!({ "title": title, "body": body }))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }
        let gh: GhIssue = response
            .json()
            .await
            .map_err(|e| TrackerError::Permanent(e.to_string()))?;
        Ok(gh.number.to_string())
    }

    async fn generate_prompt(&self, issue_id: &str, project: &ProjectConfig) -> Result<String, TrackerError> {
        let issue = self.get_issue(issue_id, project).await?;
        Ok(format!(
            "Work on issue #{} in {}: {}\n\n{}",
            issue.id, project.repo, issue.title, issue.body
        ))
    }

    async fn issue_url(&self, issue_id: &str, project: &ProjectConfig) -> Result<String, TrackerError> {
        Ok(self.get_issue(issue_id, project).await?.url)
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
