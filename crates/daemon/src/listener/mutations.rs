// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request handlers that mutate session state: `spawn`, `batch_spawn`,
//! `send`, `kill`, `cleanup`, `restore`.

use fleet_core::{EngineError, ErrorEnvelope, SessionId};

use super::ListenCtx;
use crate::protocol::{Response, SessionEntry};

pub(super) async fn handle_spawn(
    ctx: &ListenCtx,
    project: &str,
    issue: Option<String>,
) -> Response {
    match ctx.sessions.spawn(&ctx.config, project, issue).await {
        Ok(session) => Response::ok(SessionEntry::from(&session)),
        Err(e) => Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    }
}

pub(super) async fn handle_batch_spawn(
    ctx: &ListenCtx,
    project: &str,
    issues: Vec<String>,
) -> Response {
    let mut spawned = Vec::with_capacity(issues.len());
    for issue in issues {
        match ctx.sessions.spawn(&ctx.config, project, Some(issue)).await {
            Ok(session) => spawned.push(SessionEntry::from(&session)),
            Err(e) => return Response::err(ErrorEnvelope::from(&EngineError::from(e))),
        }
    }
    Response::ok(spawned)
}

pub(super) async fn handle_send(ctx: &ListenCtx, id: &str, message: &str) -> Response {
    let id = SessionId::from(id);
    match ctx.sessions.send(&id, message).await {
        Ok(()) => Response::ok(()),
        Err(e) => Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    }
}

pub(super) async fn handle_kill(ctx: &ListenCtx, id: &str) -> Response {
    let id = SessionId::from(id);
    match ctx.sessions.kill(&id).await {
        Ok(()) => Response::ok(()),
        Err(e) => Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    }
}

pub(super) async fn handle_cleanup(ctx: &ListenCtx, project: Option<&str>) -> Response {
    match ctx.sessions.cleanup(project).await {
        Ok(ids) => {
            let cleaned: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            Response::ok(cleaned)
        }
        Err(e) => Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    }
}

pub(super) async fn handle_restore(ctx: &ListenCtx, id: &str) -> Response {
    let id = SessionId::from(id);
    match ctx.sessions.restore(&ctx.config, &id).await {
        Ok(session) => Response::ok(SessionEntry::from(&session)),
        Err(e) => Response::err(ErrorEnvelope::from(&EngineError::from(e))),
    }
}
