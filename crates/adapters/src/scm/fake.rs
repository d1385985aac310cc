// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{AutomatedComment, Review, ScmAdapter, ScmError};
use async_trait::async_trait;
use fleet_core::{
    CiSummary, MergeStrategy, Mergeability, PrHandle, PrSnapshot, PrState, ProjectConfig,
    ReviewDecision, UnresolvedComment,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Record of a call made against a [`FakeScmAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmCall {
    DetectPr { branch: String },
    GetPrSummary { number: u64 },
    MergePr { number: u64, strategy: MergeStrategy },
    ClosePr { number: u64 },
}

#[derive(Default)]
struct FakeScmState {
    calls: Vec<ScmCall>,
    prs_by_branch: HashMap<String, PrHandle>,
    snapshots: HashMap<u64, PrSnapshot>,
    merged: Vec<u64>,
    closed: Vec<u64>,
    detect_pr_error: Option<String>,
    get_pr_summary_error: Option<String>,
}

/// In-memory [`ScmAdapter`] for engine tests.
#[derive(Clone, Default)]
pub struct FakeScmAdapter {
    state: Arc<Mutex<FakeScmState>>,
}

impl FakeScmAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ScmCall> {
        self.state.lock().calls.clone()
    }

    pub fn register_pr(&self, branch: impl Into<String>, snapshot: PrSnapshot) {
        let mut state = self.state.lock();
        state.prs_by_branch.insert(branch.into(), snapshot.handle.clone());
        state.snapshots.insert(snapshot.handle.number, snapshot);
    }

    pub fn set_detect_pr_error(&self, message: impl Into<String>) {
        self.state.lock().detect_pr_error = Some(message.into());
    }

    pub fn set_get_pr_summary_error(&self, message: impl Into<String>) {
        self.state.lock().get_pr_summary_error = Some(message.into());
    }

    pub fn was_merged(&self, number: u64) -> bool {
        self.state.lock().merged.contains(&number)
    }

    pub fn was_closed(&self, number: u64) -> bool {
        self.state.lock().closed.contains(&number)
    }

    fn snapshot(&self, pr: &PrHandle) -> Result<PrSnapshot, ScmError> {
        self.state
            .lock()
            .snapshots
            .get(&pr.number)
            .cloned()
            .ok_or(ScmError::NoPrFound)
    }
}

#[async_trait]
impl ScmAdapter for FakeScmAdapter {
    async fn detect_pr(&self, _project: &ProjectConfig, branch: &str) -> Result<Option<PrHandle>, ScmError> {
        let mut state = self.state.lock();
        state.calls.push(ScmCall::DetectPr { branch: branch.to_string() });
        if let Some(message) = state.detect_pr_error.take() {
            return Err(ScmError::Transient(message));
        }
        Ok(state.prs_by_branch.get(branch).cloned())
    }

    async fn get_pr_state(&self, pr: &PrHandle) -> Result<PrState, ScmError> {
        Ok(self.snapshot(pr)?.state)
    }

    async fn get_pr_summary(&self, pr: &PrHandle) -> Result<PrSnapshot, ScmError> {
        let mut state = self.state.lock();
        state.calls.push(ScmCall::GetPrSummary { number: pr.number });
        if let Some(message) = state.get_pr_summary_error.take() {
            return Err(ScmError::Transient(message));
        }
        drop(state);
        self.snapshot(pr)
    }

    async fn get_ci_checks(&self, pr: &PrHandle) -> Result<Vec<(String, CiSummary)>, ScmError> {
        Ok(vec![("ci".to_string(), self.snapshot(pr)?.ci_summary)])
    }

    async fn get_ci_summary(&self, pr: &PrHandle) -> Result<CiSummary, ScmError> {
        Ok(self.snapshot(pr)?.ci_summary)
    }

    async fn get_review_decision(&self, pr: &PrHandle) -> Result<ReviewDecision, ScmError> {
        Ok(self.snapshot(pr)?.review_decision)
    }

    async fn get_reviews(&self, pr: &PrHandle) -> Result<Vec<Review>, ScmError> {
        let snapshot = self.snapshot(pr)?;
        Ok(vec![Review {
            author: "fake-reviewer".to_string(),
            state: snapshot.review_decision,
            body: String::new(),
        }])
    }

    async fn get_pending_comments(&self, pr: &PrHandle) -> Result<Vec<UnresolvedComment>, ScmError> {
        Ok(self.snapshot(pr)?.unresolved_comments)
    }

    async fn get_automated_comments(&self, _pr: &PrHandle) -> Result<Vec<AutomatedComment>, ScmError> {
        Ok(Vec::new())
    }

    async fn get_mergeability(&self, pr: &PrHandle) -> Result<Mergeability, ScmError> {
        Ok(self.snapshot(pr)?.mergeability)
    }

    async fn merge_pr(&self, pr: &PrHandle, strategy: MergeStrategy) -> Result<(), ScmError> {
        let mut state = self.state.lock();
        state.calls.push(ScmCall::MergePr { number: pr.number, strategy });
        state.merged.push(pr.number);
        Ok(())
    }

    async fn close_pr(&self, pr: &PrHandle) -> Result<(), ScmError> {
        let mut state = self.state.lock();
        state.calls.push(ScmCall::ClosePr { number: pr.number });
        state.closed.push(pr.number);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
