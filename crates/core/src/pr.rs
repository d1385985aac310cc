// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pull-request observation types.
//!
//! `PrSnapshot` is what the SCM adapter hands the lifecycle manager each
//! tick. It is deliberately ephemeral: only `PrHandle` (the stable
//! identifying part) is persisted on the session record.

use serde::{Deserialize, Serialize};

/// The stable part of a PR reference, persisted on the session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrHandle {
    pub number: u64,
    pub url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub base_branch: String,
    pub is_draft: bool,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Merged,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiSummary {
    None,
    Pending,
    Passing,
    Failing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    None,
    Pending,
    Approved,
    ChangesRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blocker {
    ApiRateLimited,
    CiFailing,
    ReviewChangesRequested,
    MergeConflict,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mergeability {
    pub mergeable: bool,
    pub ci_passing: bool,
    pub approved: bool,
    pub no_conflicts: bool,
    pub blockers: Vec<Blocker>,
}

impl Mergeability {
    pub fn clean(mergeable: bool) -> Self {
        Self {
            mergeable,
            ci_passing: true,
            approved: true,
            no_conflicts: true,
            blockers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedComment {
    pub path: String,
    pub line: u32,
    pub author: String,
    pub body: String,
    pub url: String,
}

/// One tick's worth of SCM observation. `None` means the SCM adapter found
/// no PR yet for this session (the lifecycle manager keeps the session in
/// `working`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrSnapshot {
    pub handle: PrHandle,
    pub state: PrState,
    pub ci_summary: CiSummary,
    pub review_decision: ReviewDecision,
    pub mergeability: Mergeability,
    pub unresolved_threads: u32,
    pub unresolved_comments: Vec<UnresolvedComment>,
}

#[cfg(test)]
#[path = "pr_tests.rs"]
mod tests;
