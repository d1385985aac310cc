// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable error-kind codes surfaced across the IPC boundary.
//!
//! Every adapter and engine error ultimately maps to one `ErrorKind`. The
//! daemon never leaks an adapter's internal error type across the wire; it
//! wraps it in `EngineError`, which carries the stable `kind` plus a
//! human-readable message.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    SessionNotFound,
    SessionAlreadyExists,
    SessionNotRestorable,
    WorkspaceMissing,
    ExternalTransient,
    ExternalPermanent,
    InvariantViolation,
    Shutdown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::SessionNotFound => "session_not_found",
            ErrorKind::SessionAlreadyExists => "session_already_exists",
            ErrorKind::SessionNotRestorable => "session_not_restorable",
            ErrorKind::WorkspaceMissing => "workspace_missing",
            ErrorKind::ExternalTransient => "external_transient",
            ErrorKind::ExternalPermanent => "external_permanent",
            ErrorKind::InvariantViolation => "invariant_violation",
            ErrorKind::Shutdown => "shutdown",
        };
        write!(f, "{s}")
    }
}

/// The error type that crosses the IPC boundary: a stable kind code plus a
/// human message, with the originating error chained for logs.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Wire-serializable projection of `EngineError` (the `source` chain does not
/// cross the IPC boundary, only `kind` + `message` do, per the error-handling
/// contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&EngineError> for ErrorEnvelope {
    fn from(e: &EngineError) -> Self {
        Self {
            kind: e.kind,
            message: e.message.clone(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
