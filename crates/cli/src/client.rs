// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::UnixStream;

use crate::client_lifecycle::log_connection_error;
use crate::daemon_process::{
    cleanup_stale_socket, daemon_socket, probe_socket, read_startup_error,
    start_daemon_background, wrap_with_startup_error,
};

use fleet_daemon::protocol::{self, ProtocolError, Request, Response, SessionEntry, StatusSummary};

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests (status, list, spawn, send, ...)
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("FLEET_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("FLEET_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    parse_duration_ms("FLEET_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval for connection retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("FLEET_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{kind}: {message}")]
    Rejected { kind: String, message: String },

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// For action commands (spawn, batch_spawn, send, kill, cleanup,
    /// restore) — auto-start the daemon, limited to one restart per process.
    pub fn for_action() -> Result<Self, ClientError> {
        Self::connect_or_start_once()
    }

    /// For query commands (status, list) — connect only, no auto-start.
    pub fn for_query() -> Result<Self, ClientError> {
        Self::connect()
    }

    fn connect_or_start_once() -> Result<Self, ClientError> {
        static RESTARTED: AtomicBool = AtomicBool::new(false);

        if RESTARTED.load(Ordering::SeqCst) {
            return Self::connect_or_start();
        }
        RESTARTED.store(true, Ordering::SeqCst);
        Self::connect_or_start()
    }

    /// Connect to daemon, auto-starting it if not running.
    pub fn connect_or_start() -> Result<Self, ClientError> {
        match Self::connect() {
            Ok(client) => {
                if probe_socket(&client.socket_path) {
                    Ok(client)
                } else {
                    cleanup_stale_socket()?;
                    let child = start_daemon_background()?;
                    Self::connect_with_retry(timeout_connect(), child)
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e)),
        }
    }

    /// Connect to an existing daemon (no auto-start).
    pub fn connect() -> Result<Self, ClientError> {
        let socket_path = daemon_socket()?;

        if !socket_path.exists() {
            let err = ClientError::DaemonNotRunning;
            log_connection_error(&err);
            return Err(err);
        }

        Ok(Self { socket_path })
    }

    fn connect_with_retry(
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let poll_start = Instant::now();
                    while poll_start.elapsed() < timeout_exit() {
                        if let Some(err) = read_startup_error() {
                            return Err(ClientError::DaemonStartFailed(err));
                        }
                        std::thread::sleep(poll_interval());
                    }
                    return Err(ClientError::DaemonStartFailed(format!(
                        "exited with {status}"
                    )));
                }
                Ok(None) => {}
                Err(_) => {}
            }

            match Self::connect() {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => {
                    std::thread::sleep(poll_interval());
                }
                Err(e) => return Err(wrap_with_startup_error(e)),
            }
        }

        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    /// Stop the daemon (graceful first, then forceful). Returns `true` if
    /// the daemon was running.
    pub async fn stop() -> Result<bool, ClientError> {
        crate::client_lifecycle::daemon_stop().await
    }

    async fn send_with_timeout(
        &self,
        request: &Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol::encode(request)?;
        tokio::time::timeout(write_timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes =
            tokio::time::timeout(read_timeout, protocol::read_message(&mut reader))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        let response: Response = protocol::decode(&response_bytes)?;
        Ok(response)
    }

    async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        match self
            .send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await
        {
            Ok(response) => Ok(response),
            Err(e) => {
                log_connection_error(&e);
                Err(e)
            }
        }
    }

    fn payload<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Ok { payload } => {
                serde_json::from_value(payload).map_err(|_| ClientError::UnexpectedResponse)
            }
            Response::Err { kind, message } => Err(ClientError::Rejected {
                kind: kind.to_string(),
                message,
            }),
        }
    }

    pub async fn hello(&self) -> Result<String, ClientError> {
        let response = self
            .send(&Request::Hello {
                version: protocol::PROTOCOL_VERSION.to_string(),
            })
            .await?;
        Self::payload(response)
    }

    pub async fn status(&self) -> Result<StatusSummary, ClientError> {
        let response = self.send(&Request::Status).await?;
        Self::payload(response)
    }

    pub async fn list(&self, project: Option<&str>) -> Result<Vec<SessionEntry>, ClientError> {
        let response = self
            .send(&Request::List {
                project: project.map(String::from),
            })
            .await?;
        Self::payload(response)
    }

    pub async fn spawn(
        &self,
        project: &str,
        issue: Option<&str>,
    ) -> Result<SessionEntry, ClientError> {
        let response = self
            .send(&Request::Spawn {
                project: project.to_string(),
                issue: issue.map(String::from),
            })
            .await?;
        Self::payload(response)
    }

    pub async fn batch_spawn(
        &self,
        project: &str,
        issues: Vec<String>,
    ) -> Result<Vec<SessionEntry>, ClientError> {
        let response = self
            .send(&Request::BatchSpawn {
                project: project.to_string(),
                issues,
            })
            .await?;
        Self::payload(response)
    }

    pub async fn send_message(&self, id: &str, message: &str) -> Result<(), ClientError> {
        let response = self
            .send(&Request::Send {
                id: id.to_string(),
                message: message.to_string(),
            })
            .await?;
        Self::payload(response)
    }

    pub async fn kill(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .send(&Request::Kill { id: id.to_string() })
            .await?;
        Self::payload(response)
    }

    pub async fn cleanup(&self, project: Option<&str>) -> Result<Vec<String>, ClientError> {
        let response = self
            .send(&Request::Cleanup {
                project: project.map(String::from),
            })
            .await?;
        Self::payload(response)
    }

    pub async fn restore(&self, id: &str) -> Result<SessionEntry, ClientError> {
        let response = self
            .send(&Request::Restore { id: id.to_string() })
            .await?;
        Self::payload(response)
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        let response = self.send(&Request::Shutdown).await?;
        Self::payload(response)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
