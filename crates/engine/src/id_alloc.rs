// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session id reservation.
//!
//! `<session_prefix>-<N>` where `N` is the smallest positive integer not
//! currently in use for that prefix among live *or* archived records.
//! Reservation writes a sentinel record to the store so a concurrent
//! reservation for the same prefix never picks the same id; callers must
//! hold [`IdAllocator`]'s process-wide mutex across `list()` and the
//! sentinel `create()` (a single critical section, not two).

use fleet_core::{Session, SessionId, SessionStatus};
use fleet_storage::{SessionStore, StoreError};
use parking_lot::Mutex;

/// Serializes the whole reserve-an-id critical section for the process.
/// A per-prefix mutex would be marginally finer-grained but the spec only
/// requires "two concurrent spawns never pick the same id", and reservation
/// is cheap enough that one global lock is sufficient.
pub struct IdAllocator {
    lock: Mutex<()>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }

    /// Reserve the next id for `prefix`, writing an empty sentinel record to
    /// `store`. Returns the reserved [`SessionId`].
    pub fn reserve(
        &self,
        store: &SessionStore,
        prefix: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<SessionId, StoreError> {
        let _guard = self.lock.lock();

        let mut used = std::collections::HashSet::new();
        for session in store.list()?.into_iter().chain(store.list_archived()?) {
            if let Some(n) = suffix_for(session.id.as_str(), prefix) {
                used.insert(n);
            }
        }

        let mut n: u64 = 1;
        while used.contains(&n) {
            n += 1;
        }
        let id = SessionId::new(format!("{prefix}-{n}"));

        let sentinel = Session {
            id: id.clone(),
            project_id: String::new(),
            issue_id: None,
            branch: String::new(),
            workspace_path: std::path::PathBuf::new(),
            status: SessionStatus::Spawning,
            activity: fleet_core::Activity::Active,
            runtime_handle: None,
            agent_info: None,
            pr: None,
            reactions_applied: Default::default(),
            entry_sequence: Default::default(),
            created_at: now,
            last_activity_at: now,
            metadata: Default::default(),
            extra: Default::default(),
        };
        store.create(&sentinel)?;
        Ok(id)
    }
}

fn suffix_for(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?
        .strip_prefix('-')?
        .parse::<u64>()
        .ok()
}

#[cfg(test)]
#[path = "id_alloc_tests.rs"]
mod tests;
