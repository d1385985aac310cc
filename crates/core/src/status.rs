// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session status and observed agent activity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session sits in its lifecycle.
///
/// Transitions are derived by the lifecycle manager's decision table; see
/// `fleet_engine::lifecycle::decision`. Status never regresses except via an
/// explicit `restore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Spawning,
    Working,
    NeedsInput,
    Stuck,
    PrOpen,
    ReviewPending,
    ChangesRequested,
    CiFailed,
    Approved,
    Mergeable,
    Merged,
    Done,
    Killed,
    Cleanup,
    Terminated,
    Errored,
}

impl SessionStatus {
    /// A terminal status never transitions again without an explicit `restore`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionStatus::Merged
                | SessionStatus::Done
                | SessionStatus::Killed
                | SessionStatus::Cleanup
                | SessionStatus::Terminated
                | SessionStatus::Errored
        )
    }

    /// `restore` is refused for these; the session is gone for good.
    pub fn is_restorable(self) -> bool {
        self.is_terminal() && !matches!(self, SessionStatus::Killed | SessionStatus::Cleanup)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Spawning => "spawning",
            SessionStatus::Working => "working",
            SessionStatus::NeedsInput => "needs_input",
            SessionStatus::Stuck => "stuck",
            SessionStatus::PrOpen => "pr_open",
            SessionStatus::ReviewPending => "review_pending",
            SessionStatus::ChangesRequested => "changes_requested",
            SessionStatus::CiFailed => "ci_failed",
            SessionStatus::Approved => "approved",
            SessionStatus::Mergeable => "mergeable",
            SessionStatus::Merged => "merged",
            SessionStatus::Done => "done",
            SessionStatus::Killed => "killed",
            SessionStatus::Cleanup => "cleanup",
            SessionStatus::Terminated => "terminated",
            SessionStatus::Errored => "errored",
        };
        write!(f, "{s}")
    }
}

/// Observed liveness of the agent process inside a session's runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Active,
    Idle,
    WaitingInput,
    Blocked,
    Exited,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Activity::Active => "active",
            Activity::Idle => "idle",
            Activity::WaitingInput => "waiting_input",
            Activity::Blocked => "blocked",
            Activity::Exited => "exited",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
