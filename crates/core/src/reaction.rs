// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reactions: automated responses to a session status transition.

use crate::status::SessionStatus;
use serde::{Deserialize, Serialize};

/// A `(status, entry_sequence)` pair marking one reaction firing. Stored in
/// `Session::reactions_applied` so a restart never re-fires a reaction that
/// already completed for that entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReactionEntry {
    pub status: String,
    pub entry_sequence: u32,
}

impl ReactionEntry {
    pub fn new(status: SessionStatus, entry_sequence: u32) -> Self {
        Self {
            status: status.to_string(),
            entry_sequence,
        }
    }
}

/// The built-in reaction kinds a project can bind to a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReactionKind {
    /// Send a templated prompt to the agent.
    SendToAgent { template: String },
    /// Publish an event at the given priority.
    Notify { priority: crate::event::Priority },
    /// Merge the PR with the given strategy, then clean up the session.
    AutoMerge { strategy: MergeStrategy },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    Squash,
    Merge,
    Rebase,
}

/// Per-status reaction configuration, as loaded from project config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionSpec {
    pub auto: bool,
    pub action: ReactionKind,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_after: Option<u32>,
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
#[path = "reaction_tests.rs"]
mod tests;
