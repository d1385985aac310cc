// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SCM adapters: the pull-request host a session's work lands on.

mod github;

pub use github::GitHubScmAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeScmAdapter, ScmCall};

use async_trait::async_trait;
use fleet_core::{
    CiSummary, MergeStrategy, Mergeability, PrHandle, PrSnapshot, PrState, ProjectConfig,
    ReviewDecision, UnresolvedComment,
};
use thiserror::Error;

/// Errors from SCM operations.
#[derive(Debug, Error)]
pub enum ScmError {
    #[error("no pull request found")]
    NoPrFound,
    #[error("transient SCM error: {0}")]
    Transient(String),
    #[error("permanent SCM error: {0}")]
    Permanent(String),
}

/// A single review submitted against a PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub author: String,
    pub state: ReviewDecision,
    pub body: String,
}

/// An automated (bot) comment thread on a PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatedComment {
    pub author: String,
    pub body: String,
    pub url: String,
}

/// Adapter for a pull-request host (GitHub, GitLab, ...).
///
/// Every method here is fallible and MUST be treated by callers as
/// potentially transient: a failing SCM call degrades that tick's
/// observation to last-known-good rather than aborting the poll.
#[async_trait]
pub trait ScmAdapter: Send + Sync + 'static {
    /// Find the PR associated with `branch`, if one exists yet.
    async fn detect_pr(&self, project: &ProjectConfig, branch: &str) -> Result<Option<PrHandle>, ScmError>;

    async fn get_pr_state(&self, pr: &PrHandle) -> Result<PrState, ScmError>;

    /// Fetch the full observation snapshot in one call.
    async fn get_pr_summary(&self, pr: &PrHandle) -> Result<PrSnapshot, ScmError>;

    async fn get_ci_checks(&self, pr: &PrHandle) -> Result<Vec<(String, CiSummary)>, ScmError>;

    async fn get_ci_summary(&self, pr: &PrHandle) -> Result<CiSummary, ScmError>;

    async fn get_review_decision(&self, pr: &PrHandle) -> Result<ReviewDecision, ScmError>;

    async fn get_reviews(&self, pr: &PrHandle) -> Result<Vec<Review>, ScmError>;

    async fn get_pending_comments(&self, pr: &PrHandle) -> Result<Vec<UnresolvedComment>, ScmError>;

    async fn get_automated_comments(&self, pr: &PrHandle) -> Result<Vec<AutomatedComment>, ScmError>;

    async fn get_mergeability(&self, pr: &PrHandle) -> Result<Mergeability, ScmError>;

    async fn merge_pr(&self, pr: &PrHandle, strategy: MergeStrategy) -> Result<(), ScmError>;

    async fn close_pr(&self, pr: &PrHandle) -> Result<(), ScmError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
