// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only request handlers: `status` and `list`.

use std::collections::BTreeMap;

use fleet_core::{EngineError, ErrorEnvelope};

use super::ListenCtx;
use crate::protocol::{Response, SessionEntry, StatusSummary};

pub(super) fn handle_status(ctx: &ListenCtx) -> Response {
    let sessions = match ctx.sessions.list(None) {
        Ok(sessions) => sessions,
        Err(e) => return Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    };

    let mut sessions_by_status: BTreeMap<String, usize> = BTreeMap::new();
    for session in &sessions {
        *sessions_by_status
            .entry(session.status.to_string())
            .or_default() += 1;
    }

    Response::ok(StatusSummary {
        version: crate::protocol::PROTOCOL_VERSION.to_string(),
        uptime_secs: ctx.start_time.elapsed().as_secs(),
        session_count: sessions.len(),
        sessions_by_status,
    })
}

pub(super) fn handle_list(ctx: &ListenCtx, project: Option<&str>) -> Response {
    match ctx.sessions.list(project) {
        Ok(sessions) => {
            let entries: Vec<SessionEntry> = sessions.iter().map(SessionEntry::from).collect();
            Response::ok(entries)
        }
        Err(e) => Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    }
}
