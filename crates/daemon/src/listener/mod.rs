// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Runs in its own spawned task, accepting connections and dispatching
//! each request to the Session Manager / Lifecycle Manager without
//! blocking the poll loop.

mod mutations;
mod query;

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use fleet_core::SystemClock;
use fleet_engine::{CapabilityRegistry, LifecycleManager, SessionManager};

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Shared daemon context for every request handler.
pub(crate) struct ListenCtx {
    pub registry: Arc<CapabilityRegistry>,
    pub sessions: Arc<SessionManager<SystemClock>>,
    pub lifecycle: Arc<LifecycleManager<SystemClock>>,
    pub config: fleet_core::Config,
    pub start_time: Instant,
    pub shutdown: Arc<Notify>,
    pub cancel: CancellationToken,
}

pub(crate) struct Listener {
    socket: UnixListener,
    ctx: Arc<ListenCtx>,
}

#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl Listener {
    pub fn new(socket: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { socket, ctx }
    }

    /// Accept connections until the process exits; each connection is
    /// handled in its own task so one slow/misbehaving client never blocks
    /// another.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            match e {
                                ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
                                    debug!("client disconnected");
                                }
                                ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
                                    warn!("connection timeout");
                                }
                                _ => error!("connection error: {e}"),
                            }
                        }
                    });
                }
                Err(e) => error!("accept error: {e}"),
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, ctx: &ListenCtx) -> Result<(), ConnectionError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await?;
    tracing::info!(request = ?request, "received request");

    let response = handle_request(request, ctx).await;

    tracing::debug!(response = ?response, "sending response");
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;

    Ok(())
}

async fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::ok(()),

        Request::Hello { version: _ } => Response::ok(PROTOCOL_VERSION),

        Request::Status => query::handle_status(ctx),

        Request::List { project } => query::handle_list(ctx, project.as_deref()),

        Request::Spawn { project, issue } => mutations::handle_spawn(ctx, &project, issue).await,

        Request::BatchSpawn { project, issues } => {
            mutations::handle_batch_spawn(ctx, &project, issues).await
        }

        Request::Send { id, message } => mutations::handle_send(ctx, &id, &message).await,

        Request::Kill { id } => mutations::handle_kill(ctx, &id).await,

        Request::Cleanup { project } => mutations::handle_cleanup(ctx, project.as_deref()).await,

        Request::Restore { id } => mutations::handle_restore(ctx, &id).await,

        Request::Shutdown => {
            ctx.cancel.cancel();
            ctx.shutdown.notify_one();
            Response::ok(())
        }
    }
}
