// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, crash recovery.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use fleet_core::{Config, ConfigError, SystemClock};
use fleet_engine::{CapabilityRegistry, IdAllocator, LifecycleConfig, LifecycleManager, NotifyRouter, SessionManager};
use fleet_storage::{EventLog, SessionStore};

/// Daemon configuration: on-disk paths, all rooted at the resolved state
/// directory. One daemon serves every project for a user.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. `~/.local/state/agent-orchestrator`).
    pub state_dir: PathBuf,
    /// Path to the project configuration TOML file.
    pub config_path: PathBuf,
    /// Path to the Unix socket.
    pub socket_path: PathBuf,
    /// Path to the lock/PID file.
    pub lock_path: PathBuf,
    /// Path to the version file.
    pub version_path: PathBuf,
    /// Path to the daemon log file.
    pub log_path: PathBuf,
}

impl Config {
    /// Load daemon paths for the user-level daemon.
    ///
    /// Fixed layout under `$FLEET_STATE_DIR` (or `$XDG_STATE_HOME/agent-orchestrator`,
    /// or `~/.local/state/agent-orchestrator`); `config.toml` sits at the
    /// state directory's root, matching the on-disk layout.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = crate::env::state_dir()?;
        Ok(Self {
            config_path: state_dir.join("config.toml"),
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            state_dir,
        })
    }
}

/// Daemon state during operation. The listener is returned separately from
/// startup so `main` can spawn it as its own task.
pub struct DaemonState {
    pub config: Config,
    // Held to maintain the exclusive file lock; released on drop.
    #[allow(dead_code)]
    lock_file: File,
    pub registry: Arc<CapabilityRegistry>,
    pub store: Arc<SessionStore>,
    pub events: Arc<Mutex<EventLog>>,
    pub sessions: Arc<SessionManager<SystemClock>>,
    pub lifecycle: Arc<LifecycleManager<SystemClock>>,
    pub project_config: Config2,
    pub start_time: Instant,
}

/// Alias avoiding a name clash between this module's `Config` (daemon
/// paths) and the loaded project configuration.
pub type Config2 = fleet_core::Config;

pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: UnixListener,
}

/// Lifecycle errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] fleet_storage::StoreError),

    #[error("registry error: {0}")]
    Registry(#[from] fleet_engine::RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaemonState {
    /// Shut down gracefully: tell the lifecycle manager's poll loop to
    /// cancel (done by the caller via a shared `CancellationToken` before
    /// calling this), flush the event log, then remove the lock/socket/
    /// version files. The lock file itself is released automatically when
    /// `self.lock_file` is dropped.
    pub fn shutdown(&self) -> Result<(), LifecycleError> {
        info!("shutting down daemon");

        if let Err(e) = self.events.lock().flush() {
            warn!(error = %e, "failed to flush event log on shutdown");
        }

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!(error = %e, "failed to remove socket file");
            }
        }
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!(error = %e, "failed to remove PID file");
            }
        }
        if self.config.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.version_path) {
                warn!(error = %e, "failed to remove version file");
            }
        }

        info!("daemon shutdown complete");
        Ok(())
    }
}

/// Start the daemon: acquire the lock first (before creating anything
/// else, to prevent startup races between two daemon invocations), load
/// and validate the project config, build the registry/store/session
/// manager/lifecycle manager, and bind the socket last (only once every
/// earlier step has succeeded).
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock — those
            // files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create the state directory (needed for the lock file itself).
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire the lock file FIRST — prevents races between two
    // concurrent daemon starts. Opened without truncation so a second
    // invocation that loses the race doesn't wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Write the version file.
    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    // 4. Load and validate the project configuration.
    let project_config = fleet_core::Config::load(&config.config_path)?;
    std::fs::create_dir_all(&project_config.data_dir)?;

    // 5. Build the store, event log, registry, session manager and
    // lifecycle manager from the loaded configuration.
    let store = Arc::new(SessionStore::open(&project_config.data_dir)?);
    let events = Arc::new(Mutex::new(EventLog::open(
        &project_config.data_dir.join("events.jsonl"),
    )?));
    let registry = Arc::new(CapabilityRegistry::new());
    registry.load_from_config(&project_config)?;

    let router = NotifyRouter::start(
        &registry,
        &project_config.notification_routing,
        events.clone(),
        chrono::Utc::now,
    );
    let clock = SystemClock;
    let sessions = Arc::new(SessionManager::with_router(
        registry.clone(),
        store.clone(),
        events.clone(),
        Arc::new(IdAllocator::new()),
        clock,
        Some(router.clone()),
    ));
    let lifecycle = Arc::new(LifecycleManager::new(
        registry.clone(),
        store.clone(),
        events.clone(),
        Some(router),
        sessions.clone(),
        clock,
        LifecycleConfig::default(),
    ));

    // 6. Remove a stale socket and bind — last, only once every earlier
    // validation step has succeeded.
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!("daemon started");

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            registry,
            store,
            events,
            sessions,
            lifecycle,
            project_config,
            start_time: Instant::now(),
        },
        listener,
    })
}

fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.version_path.exists() {
        let _ = std::fs::remove_file(&config.version_path);
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
