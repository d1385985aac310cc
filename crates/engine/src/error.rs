// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-responsibility error enums for the engine crate.
//!
//! Each error type here maps to exactly one `fleet_core::ErrorKind` so the
//! daemon's IPC boundary never has to inspect engine internals.

use fleet_core::{EngineError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("project '{project}' references unknown plugin '{name}' in slot '{slot}'")]
    UnknownPlugin {
        project: String,
        slot: String,
        name: String,
    },
    #[error("no {slot} adapter named '{name}' is registered")]
    NotRegistered { slot: String, name: String },
}

impl From<RegistryError> for EngineError {
    fn from(e: RegistryError) -> Self {
        EngineError::with_source(ErrorKind::Validation, e.to_string(), e)
    }
}

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown project: {0}")]
    UnknownProject(String),
    #[error("issue {issue_id} not found: {source}")]
    IssueNotFound {
        issue_id: String,
        #[source]
        source: fleet_adapters::TrackerError,
    },
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("workspace creation failed: {0}")]
    Workspace(#[source] fleet_adapters::WorkspaceError),
    #[error("runtime creation failed: {0}")]
    Runtime(#[source] fleet_adapters::RuntimeError),
    #[error("agent setup failed: {0}")]
    Agent(#[source] fleet_adapters::AgentError),
    #[error("store error: {0}")]
    Store(#[from] fleet_storage::StoreError),
    #[error("session id space for prefix '{0}' is exhausted")]
    IdSpaceExhausted(String),
}

impl From<SpawnError> for EngineError {
    fn from(e: SpawnError) -> Self {
        let kind = spawn_error_kind(&e);
        EngineError::with_source(kind, e.to_string(), e)
    }
}

#[derive(Debug, Error)]
pub enum SessionManagerError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session {0} is not restorable")]
    NotRestorable(String),
    #[error("workspace for session {0} no longer exists on disk")]
    WorkspaceMissing(String),
    #[error("runtime handle missing for session {0}")]
    NoRuntimeHandle(String),
    #[error("spawn failed: {0}")]
    Spawn(#[from] SpawnError),
    #[error("store error: {0}")]
    Store(#[from] fleet_storage::StoreError),
    #[error("runtime error: {0}")]
    Runtime(#[from] fleet_adapters::RuntimeError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

fn spawn_error_kind(e: &SpawnError) -> ErrorKind {
    match e {
        SpawnError::UnknownProject(_) => ErrorKind::Validation,
        SpawnError::IssueNotFound { .. } => ErrorKind::ExternalPermanent,
        SpawnError::Registry(_) => ErrorKind::Validation,
        SpawnError::Workspace(_) | SpawnError::Runtime(_) | SpawnError::Agent(_) => {
            ErrorKind::ExternalTransient
        }
        SpawnError::Store(_) => ErrorKind::InvariantViolation,
        SpawnError::IdSpaceExhausted(_) => ErrorKind::InvariantViolation,
    }
}

impl From<SessionManagerError> for EngineError {
    fn from(e: SessionManagerError) -> Self {
        let kind = session_manager_error_kind(&e);
        EngineError::with_source(kind, e.to_string(), e)
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("store error: {0}")]
    Store(#[from] fleet_storage::StoreError),
    #[error("scm error: {0}")]
    Scm(#[from] fleet_adapters::ScmError),
    #[error("agent error: {0}")]
    Agent(#[from] fleet_adapters::AgentError),
    #[error("session manager error: {0}")]
    SessionManager(#[from] SessionManagerError),
    #[error("no PR recorded for session {0}")]
    NoPrForAutoMerge(String),
}

impl From<LifecycleError> for EngineError {
    fn from(e: LifecycleError) -> Self {
        let kind = match &e {
            LifecycleError::Store(_) => ErrorKind::InvariantViolation,
            LifecycleError::Scm(_) => ErrorKind::ExternalTransient,
            LifecycleError::Agent(_) => ErrorKind::ExternalTransient,
            LifecycleError::SessionManager(inner) => session_manager_error_kind(inner),
            LifecycleError::NoPrForAutoMerge(_) => ErrorKind::InvariantViolation,
        };
        EngineError::with_source(kind, e.to_string(), e)
    }
}

fn session_manager_error_kind(e: &SessionManagerError) -> ErrorKind {
    match e {
        SessionManagerError::NotFound(_) => ErrorKind::SessionNotFound,
        SessionManagerError::NotRestorable(_) => ErrorKind::SessionNotRestorable,
        SessionManagerError::WorkspaceMissing(_) => ErrorKind::WorkspaceMissing,
        SessionManagerError::NoRuntimeHandle(_) => ErrorKind::Validation,
        SessionManagerError::Spawn(inner) => spawn_error_kind(inner),
        SessionManagerError::Store(_) => ErrorKind::InvariantViolation,
        SessionManagerError::Runtime(_) => ErrorKind::ExternalTransient,
        SessionManagerError::Registry(_) => ErrorKind::Validation,
    }
}
