// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable per-session record storage.
//!
//! One file per session in a flat directory; archiving moves the record to
//! an `archive/` subdirectory under the same id. There is no index —
//! listing is a directory scan. Every write goes through the write-tmp,
//! fsync, rename idiom so a crash mid-write never corrupts the previous
//! good record.

use fleet_core::{Session, SessionId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session not found: {0}")]
    NotFound(SessionId),
    #[error("session already exists: {0}")]
    AlreadyExists(SessionId),
}

/// Durable, crash-safe store of session records.
///
/// Updates to any one session id are serialized through a per-id mutex;
/// distinct ids may be written concurrently.
pub struct SessionStore {
    root: PathBuf,
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionStore {
    /// Open a store rooted at `data_dir`, creating `sessions/` and
    /// `sessions/archive/` if they don't exist yet.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(Self::sessions_dir(data_dir))?;
        fs::create_dir_all(Self::archive_dir(data_dir))?;
        Ok(Self {
            root: data_dir.to_owned(),
            locks: Mutex::new(HashMap::new()),
        })
    }

    fn sessions_dir(data_dir: &Path) -> PathBuf {
        data_dir.join("sessions")
    }

    fn archive_dir(data_dir: &Path) -> PathBuf {
        Self::sessions_dir(data_dir).join("archive")
    }

    fn record_path(&self, id: &SessionId) -> PathBuf {
        Self::sessions_dir(&self.root).join(format!("{}.json", id.as_str()))
    }

    fn archive_path(&self, id: &SessionId) -> PathBuf {
        Self::archive_dir(&self.root).join(format!("{}.json", id.as_str()))
    }

    fn lock_for(&self, id: &SessionId) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Create a new session record. Errors if one already exists at this id
    /// (in either the active or archived set).
    pub fn create(&self, session: &Session) -> Result<(), StoreError> {
        let lock = self.lock_for(&session.id);
        let _guard = lock.lock();
        if self.record_path(&session.id).exists() || self.archive_path(&session.id).exists() {
            return Err(StoreError::AlreadyExists(session.id.clone()));
        }
        write_atomic(&self.record_path(&session.id), session)
    }

    /// Overwrite an existing (active) session record.
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        let lock = self.lock_for(&session.id);
        let _guard = lock.lock();
        let path = self.record_path(&session.id);
        if !path.exists() {
            return Err(StoreError::NotFound(session.id.clone()));
        }
        write_atomic(&path, session)
    }

    /// Load an active session record by id.
    pub fn load(&self, id: &SessionId) -> Result<Session, StoreError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        read_record(&path)
    }

    /// Load an archived session record by id.
    pub fn load_archived(&self, id: &SessionId) -> Result<Session, StoreError> {
        let path = self.archive_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        read_record(&path)
    }

    /// List every active session record. Order is unspecified (directory scan).
    pub fn list(&self) -> Result<Vec<Session>, StoreError> {
        list_dir(&Self::sessions_dir(&self.root))
    }

    /// List every archived session record.
    pub fn list_archived(&self) -> Result<Vec<Session>, StoreError> {
        list_dir(&Self::archive_dir(&self.root))
    }

    /// Move a session's record from the active set to the archive, keeping
    /// its id. The active file is removed only after the archive write
    /// succeeds.
    pub fn archive(&self, id: &SessionId) -> Result<(), StoreError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        let session = self.load(id)?;
        write_atomic(&self.archive_path(id), &session)?;
        fs::remove_file(self.record_path(id))?;
        Ok(())
    }

    /// Restore an archived session back into the active set under the same
    /// id. The archived file is removed only after the active write succeeds.
    pub fn restore(&self, id: &SessionId) -> Result<Session, StoreError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        let session = self.load_archived(id)?;
        write_atomic(&self.record_path(id), &session)?;
        fs::remove_file(self.archive_path(id))?;
        Ok(session)
    }
}

fn list_dir(dir: &Path) -> Result<Vec<Session>, StoreError> {
    let mut sessions = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        sessions.push(read_record(&path)?);
    }
    Ok(sessions)
}

fn read_record(path: &Path) -> Result<Session, StoreError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Write `value` to `path` atomically: serialize to `<path>.tmp`, fsync,
/// then rename over the destination.
fn write_atomic(path: &Path, value: &Session) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
