// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL event log: a write-only audit trail.
//!
//! Unlike a write-ahead log there is no replay — session state lives
//! entirely in [`crate::session_store::SessionStore`]; this log exists so
//! the Notification Router and operators can tail a durable record of what
//! happened. One JSON object per line, `BufWriter` with an explicit
//! `flush()` after every batch.

use fleet_core::Event;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only writer for `events.jsonl`.
///
/// Appends are buffered until [`EventLog::flush`] (or the next `append`
/// call after a buffer-size threshold) and must be externally serialized by
/// the caller — the log itself does no locking.
pub struct EventLog {
    writer: BufWriter<File>,
    path: PathBuf,
    next_id: u64,
}

impl EventLog {
    /// Open (or create) the event log at `path`, scanning it to recover the
    /// next monotonic event id.
    pub fn open(path: &Path) -> Result<Self, EventLogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let next_id = Self::scan_max_id(path)?.map(|id| id + 1).unwrap_or(1);

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_owned(),
            next_id,
        })
    }

    fn scan_max_id(path: &Path) -> Result<Option<u64>, EventLogError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        let mut max_id = None;
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(event) = serde_json::from_str::<Event>(line) {
                max_id = Some(max_id.map_or(event.id, |m: u64| m.max(event.id)));
            }
        }
        Ok(max_id)
    }

    /// Append one event, assigning it the next monotonic id. The event is
    /// not durable until [`EventLog::flush`] is called.
    pub fn append(&mut self, mut event: Event) -> Result<u64, EventLogError> {
        event.id = self.next_id;
        self.next_id += 1;
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        Ok(event.id)
    }

    /// Flush buffered writes to disk with an fsync.
    pub fn flush(&mut self) -> Result<(), EventLogError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Read every event currently on disk, in append order. Intended for
    /// operator tooling and tests, not the hot path.
    pub fn read_all(&mut self) -> Result<Vec<Event>, EventLogError> {
        self.flush()?;
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let mut events = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(line)?);
        }
        Ok(events)
    }
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
