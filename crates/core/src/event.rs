// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The append-only event log record.
//!
//! Events are immutable once written. `id` is monotonic per process boot;
//! see `fleet_storage::event_log` for the on-disk append path.

use crate::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Info,
    Warning,
    Action,
    Urgent,
}

/// The kind of thing that happened, as a tagged enum so the on-disk schema
/// is self-describing and each variant carries only the fields it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    #[serde(rename = "session.spawned")]
    SessionSpawned { project_id: String },
    #[serde(rename = "session.transitioned")]
    SessionTransitioned { from: String, to: String },
    #[serde(rename = "session.killed")]
    SessionKilled,
    #[serde(rename = "session.restored")]
    SessionRestored,
    #[serde(rename = "session.archived")]
    SessionArchived,
    #[serde(rename = "reaction.fired")]
    ReactionFired { status: String, attempt: u32 },
    #[serde(rename = "reaction.failed")]
    ReactionFailed {
        status: String,
        attempt: u32,
        error: String,
    },
    #[serde(rename = "reaction.escalated")]
    ReactionEscalated { status: String },
    #[serde(rename = "notifier.dropped")]
    NotifierDropped { priority: Priority, dropped: u64 },
    #[serde(rename = "spawn.rolled_back")]
    SpawnRolledBack { reason: String },
}

/// One line of the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    #[serde(flatten)]
    pub kind: EventKind,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    /// Human-readable name of the event's kind, for structured log fields.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            EventKind::SessionSpawned { .. } => "session.spawned",
            EventKind::SessionTransitioned { .. } => "session.transitioned",
            EventKind::SessionKilled => "session.killed",
            EventKind::SessionRestored => "session.restored",
            EventKind::SessionArchived => "session.archived",
            EventKind::ReactionFired { .. } => "reaction.fired",
            EventKind::ReactionFailed { .. } => "reaction.failed",
            EventKind::ReactionEscalated { .. } => "reaction.escalated",
            EventKind::NotifierDropped { .. } => "notifier.dropped",
            EventKind::SpawnRolledBack { .. } => "spawn.rolled_back",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
