// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Session entity: one running agent instance tracking one issue.

use crate::reaction::ReactionEntry;
use crate::status::{Activity, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

crate::define_id! {
    /// Unique identifier for a session, of the form `<project-prefix>-<n>`.
    pub struct SessionId;
}

/// A runtime's opaque handle to the process hosting the agent. Only the
/// matching runtime adapter interprets `data`; the engine treats it as a
/// schema-less bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeHandle {
    pub id: String,
    pub runtime_name: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// Last observed summary from the agent itself, independent of PR/CI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub summary: String,
    pub agent_session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
    pub branch: String,
    pub workspace_path: std::path::PathBuf,
    pub status: SessionStatus,
    pub activity: Activity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_handle: Option<RuntimeHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_info: Option<AgentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<crate::pr::PrHandle>,
    /// `(status, entry_sequence)` pairs for which the matching reaction has
    /// already fired. Checked before every reaction dispatch so a restart
    /// never re-fires a reaction that already ran.
    #[serde(default)]
    pub reactions_applied: BTreeSet<ReactionEntry>,
    /// How many times the session has entered each status, keyed by its
    /// `Display` string. Used to form the next `ReactionEntry`.
    #[serde(default)]
    pub entry_sequence: std::collections::BTreeMap<String, u32>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Unknown fields from a newer schema version, preserved verbatim on
    /// read-modify-write.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Session {
    /// Record entry into `status`, bumping its entry sequence, and return the
    /// sequence number this entry received (used to key reaction dedup).
    pub fn enter_status(&mut self, status: SessionStatus, at: DateTime<Utc>) -> u32 {
        self.status = status;
        self.last_activity_at = at;
        let seq = self.entry_sequence.entry(status.to_string()).or_insert(0);
        *seq += 1;
        *seq
    }

    pub fn current_entry_sequence(&self) -> u32 {
        self.entry_sequence
            .get(&self.status.to_string())
            .copied()
            .unwrap_or(1)
    }

    pub fn has_fired(&self, entry: &ReactionEntry) -> bool {
        self.reactions_applied.contains(entry)
    }

    pub fn mark_fired(&mut self, entry: ReactionEntry) {
        self.reactions_applied.insert(entry);
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct SessionBuilder {
    session: Session,
}

#[cfg(any(test, feature = "test-support"))]
impl SessionBuilder {
    pub fn new(id: impl Into<String>, project_id: impl Into<String>) -> Self {
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .expect("valid fixed epoch")
            .with_timezone(&Utc);
        Self {
            session: Session {
                id: SessionId::new(id),
                project_id: project_id.into(),
                issue_id: None,
                branch: "main".to_string(),
                workspace_path: std::path::PathBuf::from("/tmp/session"),
                status: SessionStatus::Spawning,
                activity: Activity::Active,
                runtime_handle: None,
                agent_info: None,
                pr: None,
                reactions_applied: BTreeSet::new(),
                entry_sequence: std::collections::BTreeMap::new(),
                created_at: now,
                last_activity_at: now,
                metadata: serde_json::Map::new(),
                extra: serde_json::Map::new(),
            },
        }
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.session.status = status;
        self
    }

    pub fn activity(mut self, activity: Activity) -> Self {
        self.session.activity = activity;
        self
    }

    pub fn issue_id(mut self, issue_id: impl Into<String>) -> Self {
        self.session.issue_id = Some(issue_id.into());
        self
    }

    pub fn runtime_handle(mut self, handle: RuntimeHandle) -> Self {
        self.session.runtime_handle = Some(handle);
        self
    }

    pub fn workspace_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.session.workspace_path = path.into();
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
