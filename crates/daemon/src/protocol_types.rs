// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTO structs for the IPC protocol.

use chrono::{DateTime, Utc};
use fleet_core::Session;
use serde::{Deserialize, Serialize};

/// Wire projection of a [`Session`] — every field the CLI needs to render
/// `list`/`status`/`attach`, without exposing internal bookkeeping like
/// `reactions_applied` or `entry_sequence`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEntry {
    pub id: String,
    pub project_id: String,
    pub issue_id: Option<String>,
    pub branch: String,
    pub workspace_path: String,
    pub status: String,
    pub activity: String,
    pub pr_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl From<&Session> for SessionEntry {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.to_string(),
            project_id: s.project_id.clone(),
            issue_id: s.issue_id.clone(),
            branch: s.branch.clone(),
            workspace_path: s.workspace_path.display().to_string(),
            status: s.status.to_string(),
            activity: s.activity.to_string(),
            pr_url: s.pr.as_ref().map(|pr| pr.url.clone()),
            created_at: s.created_at,
            last_activity_at: s.last_activity_at,
        }
    }
}

/// Daemon-wide status summary returned by `Request::Status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSummary {
    pub version: String,
    pub uptime_secs: u64,
    pub session_count: usize,
    pub sessions_by_status: std::collections::BTreeMap<String, usize>,
}
