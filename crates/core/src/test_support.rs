// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{Event, EventKind, Priority};
use crate::session::SessionId;
use chrono::{DateTime, Utc};

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .expect("valid fixed epoch")
        .with_timezone(&Utc)
}

pub fn session_spawned_event(id: u64, session_id: &str, project_id: &str) -> Event {
    Event {
        id,
        kind: EventKind::SessionSpawned {
            project_id: project_id.to_string(),
        },
        priority: Priority::Info,
        session_id: Some(SessionId::new(session_id)),
        project_id: Some(project_id.to_string()),
        timestamp: fixed_now(),
        message: format!("session {session_id} spawned"),
        data: serde_json::Map::new(),
    }
}

pub fn session_transitioned_event(id: u64, session_id: &str, from: &str, to: &str) -> Event {
    Event {
        id,
        kind: EventKind::SessionTransitioned {
            from: from.to_string(),
            to: to.to_string(),
        },
        priority: Priority::Info,
        session_id: Some(SessionId::new(session_id)),
        project_id: None,
        timestamp: fixed_now(),
        message: format!("session {session_id}: {from} -> {to}"),
        data: serde_json::Map::new(),
    }
}

pub fn reaction_escalated_event(id: u64, session_id: &str, status: &str) -> Event {
    Event {
        id,
        kind: EventKind::ReactionEscalated {
            status: status.to_string(),
        },
        priority: Priority::Urgent,
        session_id: Some(SessionId::new(session_id)),
        project_id: None,
        timestamp: fixed_now(),
        message: format!("reaction for {status} escalated"),
        data: serde_json::Map::new(),
    }
}
