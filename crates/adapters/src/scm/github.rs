// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub pull-request-backed SCM adapter.

use super::{AutomatedComment, Review, ScmAdapter, ScmError};
use async_trait::async_trait;
use fleet_core::{
    Blocker, CiSummary, MergeStrategy, Mergeability, PrHandle, PrSnapshot, PrState, ProjectConfig,
    ReviewDecision, UnresolvedComment,
};
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";

/// SCM adapter backed by the GitHub pull-request REST API.
#[derive(Clone)]
pub struct GitHubScmAdapter {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GitHubScmAdapter {
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

    fn owner_repo<'a>(project: &'a ProjectConfig) -> Result<(&'a str, &'a str), ScmError> {
        project
            .repo
            .split_once('/')
            .ok_or_else(|| ScmError::Permanent(format!("malformed repo spec: {}", project.repo)))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ScmError> {
        self.client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fleet-adapters")
            .send()
            .await
            .map_err(|e| map_transport_error(&e))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ScmError> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }
        response.json().await.map_err(|e| ScmError::Permanent(e.to_string()))
    }

    async fn fetch_pr(&self, pr: &PrHandle) -> Result<GhPullRequest, ScmError> {
        let base = &self.base_url;
        let url = format!("{base}/repos/{}/{}/pulls/{}", pr.owner, pr.repo, pr.number);
        self.get_json(&url).await
    }
}

fn map_transport_error(e: &reqwest::Error) -> ScmError {
    if e.is_timeout() || e.is_connect() {
        ScmError::Transient(e.to_string())
    } else {
        ScmError::Permanent(e.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode, body: &str) -> ScmError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ScmError::Transient(format!("status {status}: {body}"))
    } else if status == reqwest::StatusCode::NOT_FOUND {
        ScmError::NoPrFound
    } else {
        ScmError::Permanent(format!("status {status}: {body}"))
    }
}

#[derive(Debug, Deserialize)]
struct GhPullRequest {
    number: u64,
    title: String,
    html_url: String,
    state: String,
    draft: bool,
    head: GhRef,
    base: GhRef,
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    mergeable: Option<bool>,
    #[serde(default)]
    mergeable_state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    git_ref: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhReview {
    user: GhUser,
    state: String,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct GhUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhReviewComment {
    path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    original_line: Option<u32>,
    user: GhUser,
    body: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GhIssueComment {
    user: GhUser,
    body: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GhCheckRuns {
    check_runs: Vec<GhCheckRun>,
}

#[derive(Debug, Deserialize)]
struct GhCheckRun {
    name: String,
    status: String,
    #[serde(default)]
    conclusion: Option<String>,
}

fn to_handle(pr: &GhPullRequest, owner: &str, repo: &str) -> PrHandle {
    PrHandle {
        number: pr.number,
        url: pr.html_url.clone(),
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: pr.head.git_ref.clone(),
        base_branch: pr.base.git_ref.clone(),
        is_draft: pr.draft,
        title: pr.title.clone(),
    }
}

fn to_state(pr: &GhPullRequest) -> PrState {
    if pr.merged {
        PrState::Merged
    } else if pr.state == "closed" {
        PrState::Closed
    } else {
        PrState::Open
    }
}

fn check_run_to_summary(run: &GhCheckRun) -> CiSummary {
    match (run.status.as_str(), run.conclusion.as_deref()) {
        ("completed", Some("success")) => CiSummary::Passing,
        ("completed", Some(_)) => CiSummary::Failing,
        _ => CiSummary::Pending,
    }
}

fn aggregate_ci(checks: &[(String, CiSummary)]) -> CiSummary {
    if checks.is_empty() {
        CiSummary::None
    } else if checks.iter().any(|(_, s)| *s == CiSummary::Failing) {
        CiSummary::Failing
    } else if checks.iter().all(|(_, s)| *s == CiSummary::Passing) {
        CiSummary::Passing
    } else {
        CiSummary::Pending
    }
}

fn aggregate_review_decision(reviews: &[Review]) -> ReviewDecision {
    if reviews.iter().any(|r| r.state == ReviewDecision::ChangesRequested) {
        ReviewDecision::ChangesRequested
    } else if reviews.iter().any(|r| r.state == ReviewDecision::Approved) {
        ReviewDecision::Approved
    } else if reviews.is_empty() {
        ReviewDecision::None
    } else {
        ReviewDecision::Pending
    }
}

#[async_trait]
impl ScmAdapter for GitHubScmAdapter {
    async fn detect_pr(&self, project: &ProjectConfig, branch: &str) -> Result<Option<PrHandle>, ScmError> {
        let (owner, repo) = Self::owner_repo(project)?;
        let base = &self.base_url;
        let url = format!("{base}/repos/{owner}/{repo}/pulls?head={owner}:{branch}&state=all");
        let prs: Vec<GhPullRequest> = self.get_json(&url).await?;
        Ok(prs.first().map(|pr| to_handle(pr, owner, repo)))
    }

    async fn get_pr_state(&self, pr: &PrHandle) -> Result<PrState, ScmError> {
        Ok(to_state(&self.fetch_pr(pr).await?))
    }

    async fn get_pr_summary(&self, pr: &PrHandle) -> Result<PrSnapshot, ScmError> {
        let ci_summary = self.get_ci_summary(pr).await?;
        let review_decision = self.get_review_decision(pr).await?;
        let mergeability = self.get_mergeability(pr).await?;
        let unresolved_comments = self.get_pending_comments(pr).await?;
        let state = self.get_pr_state(pr).await?;
        Ok(PrSnapshot {
            handle: pr.clone(),
            state,
            ci_summary,
            review_decision,
            mergeability,
            unresolved_threads: unresolved_comments.len() as u32,
            unresolved_comments,
        })
    }

    async fn get_ci_checks(&self, pr: &PrHandle) -> Result<Vec<(String, CiSummary)>, ScmError> {
        let gh = self.fetch_pr(pr).await?;
        let base = &self.base_url;
        let url = format!(
            "{base}/repos/{}/{}/commits/{}/check-runs",
            pr.owner, pr.repo, gh.head.sha
        );
        let runs: GhCheckRuns = self.get_json(&url).await?;
        Ok(runs
            .check_runs
            .iter()
            .map(|run| (run.name.clone(), check_run_to_summary(run)))
            .collect())
    }

    async fn get_ci_summary(&self, pr: &PrHandle) -> Result<CiSummary, ScmError> {
        Ok(aggregate_ci(&self.get_ci_checks(pr).await?))
    }

    async fn get_review_decision(&self, pr: &PrHandle) -> Result<ReviewDecision, ScmError> {
        Ok(aggregate_review_decision(&self.get_reviews(pr).await?))
    }

    async fn get_reviews(&self, pr: &PrHandle) -> Result<Vec<Review>, ScmError> {
        let base = &self.base_url;
        let url = format!("{base}/repos/{}/{}/pulls/{}/reviews", pr.owner, pr.repo, pr.number);
        let reviews: Vec<GhReview> = self.get_json(&url).await?;
        Ok(reviews
            .into_iter()
            .map(|r| Review {
                author: r.user.login,
                state: match r.state.as_str() {
                    "APPROVED" => ReviewDecision::Approved,
                    "CHANGES_REQUESTED" => ReviewDecision::ChangesRequested,
                    _ => ReviewDecision::Pending,
                },
                body: r.body,
            })
            .collect())
    }

    async fn get_pending_comments(&self, pr: &PrHandle) -> Result<Vec<UnresolvedComment>, ScmError> {
        let base = &self.base_url;
        let url = format!("{base}/repos/{}/{}/pulls/{}/comments", pr.owner, pr.repo, pr.number);
        let comments: Vec<GhReviewComment> = self.get_json(&url).await?;
        Ok(comments
            .into_iter()
            .map(|c| UnresolvedComment {
                path: c.path,
                line: c.line.or(c.original_line).unwrap_or(0),
                author: c.user.login,
                body: c.body,
                url: c.html_url,
            })
            .collect())
    }

    async fn get_automated_comments(&self, pr: &PrHandle) -> Result<Vec<AutomatedComment>, ScmError> {
        let base = &self.base_url;
        let url = format!("{base}/repos/{}/{}/issues/{}/comments", pr.owner, pr.repo, pr.number);
        let comments: Vec<GhIssueComment> = self.get_json(&url).await?;
        Ok(comments
            .into_iter()
            .filter(|c| c.user.login.ends_with("[bot]"))
            .map(|c| AutomatedComment {
                author: c.user.login,
                body: c.body,
                url: c.html_url,
            })
            .collect())
    }

    async fn get_mergeability(&self, pr: &PrHandle) -> Result<Mergeability, ScmError> {
        let gh = self.fetch_pr(pr).await?;
        let ci_summary = self.get_ci_summary(pr).await?;
        let review_decision = self.get_review_decision(pr).await?;

        let ci_passing = matches!(ci_summary, CiSummary::Passing | CiSummary::None);
        let approved = matches!(review_decision, ReviewDecision::Approved);
        let no_conflicts = gh.mergeable_state.as_deref() != Some("dirty") && gh.mergeable != Some(false);

        let mut blockers = Vec::new();
        if ci_summary == CiSummary::Failing {
            blockers.push(Blocker::CiFailing);
        }
        if review_decision == ReviewDecision::ChangesRequested {
            blockers.push(Blocker::ReviewChangesRequested);
        }
        if !no_conflicts {
            blockers.push(Blocker::MergeConflict);
        }
        if gh.draft {
            blockers.push(Blocker::Draft);
        }

        Ok(Mergeability {
            mergeable: blockers.is_empty(),
            ci_passing,
            approved,
            no_conflicts,
            blockers,
        })
    }

    async fn merge_pr(&self, pr: &PrHandle, strategy: MergeStrategy) -> Result<(), ScmError> {
        let merge_method = match strategy {
            MergeStrategy::Squash => "squash",
            MergeStrategy::Merge => "merge",
            MergeStrategy::Rebase => "rebase",
        };
        let base = &self.base_url;
        let url = format!("{base}/repos/{}/{}/pulls/{}/merge", pr.owner, pr.repo, pr.number);
        let response = self
            .client
            .put(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fleet-adapters")
            .json(&serde_json::json!({ "merge_method": merge_method }))
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

    async fn close_pr(&self, pr: &PrHandle) -> Result<(), ScmError> {
        let base = &self.base_url;
        let url = format!("{base}/repos/{}/{}/pulls/{}", pr.owner, pr.repo, pr.number);
        let response = self
            .client
            .patch(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fleet-adapters")
            .json(&serde_json::json!({ "state": "closed" }))
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
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
