// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol for daemon <-> CLI communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

use fleet_core::ErrorEnvelope;
use serde::{Deserialize, Serialize};

#[path = "protocol_wire.rs"]
mod wire;
pub use wire::{
    decode, encode, read_message, read_request, write_message, write_response, ProtocolError,
    DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};

#[path = "protocol_types.rs"]
mod types;
pub use types::{SessionEntry, StatusSummary};

/// Request from CLI to daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping.
    Ping,

    /// Version handshake.
    Hello { version: String },

    /// Spawn a new session for `project` against `issue` (if given).
    Spawn {
        project: String,
        issue: Option<String>,
    },

    /// Spawn one session per issue in `issues`, best-effort — a failure on
    /// one issue does not stop the rest.
    BatchSpawn { project: String, issues: Vec<String> },

    /// Daemon-wide status summary.
    Status,

    /// List sessions, optionally filtered to one project.
    List { project: Option<String> },

    /// Send a message to a session's agent.
    Send { id: String, message: String },

    /// Kill a session.
    Kill { id: String },

    /// Archive every cleanable (merged/done) session, optionally scoped to
    /// one project.
    Cleanup { project: Option<String> },

    /// Restore an archived session.
    Restore { id: String },

    /// Request daemon shutdown.
    Shutdown,
}

/// Response from daemon to CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Ok { payload: serde_json::Value },
    Err { kind: fleet_core::ErrorKind, message: String },
}

impl Response {
    pub fn ok(payload: impl Serialize) -> Self {
        Response::Ok {
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn err(envelope: ErrorEnvelope) -> Self {
        Response::Err {
            kind: envelope.kind,
            message: envelope.message,
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
