//! The attendance engine.
//!
//! [`AttendanceEngine`] ties a [`TimeEntryStore`], a [`Clock`], an
//! [`IdGenerator`] and an [`EngineConfig`] together and exposes the
//! clock-in / break / clock-out / review / query operations.
//!
//! Every mutation of an entry runs under its owning user's lock, on a copy
//! of the entry that is written back only if the whole operation succeeds.
//! Operations for different users never contend.
//!
//! # Example
//!
//! ```
//! use attendance_engine::config::EngineConfig;
//! use attendance_engine::engine::AttendanceEngine;
//! use attendance_engine::models::EntryStatus;
//!
//! let engine = AttendanceEngine::new(EngineConfig::default());
//! let entry = engine.clock_in("emp_001", None, None)?;
//! assert_eq!(entry.status, EntryStatus::ClockedIn);
//! # Ok::<(), attendance_engine::error::EngineError>(())
//! ```

mod breaks;
mod clock_events;
mod lifecycle;
mod query;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::models::TimeEntry;
use crate::store::{InMemoryStore, TimeEntryStore};

/// Attendance operations over an injected store.
pub struct AttendanceEngine {
    store: Arc<dyn TimeEntryStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: EngineConfig,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AttendanceEngine {
    /// Creates an engine with an in-memory store, the system clock and random ids.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(
            Arc::new(InMemoryStore::new()),
            Arc::new(SystemClock),
            Arc::new(UuidGenerator),
            config,
        )
    }

    /// Creates an engine from explicit collaborators.
    pub fn with_parts(
        store: Arc<dyn TimeEntryStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            config,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs `critical` while holding `user_id`'s lock.
    ///
    /// The user's slot in the lock table is dropped again once nobody else
    /// holds or waits on it, so the table only tracks users with operations
    /// in flight.
    fn with_user_lock<T>(
        &self,
        user_id: &str,
        critical: impl FnOnce() -> EngineResult<T>,
    ) -> EngineResult<T> {
        let lock = {
            let mut locks = self
                .user_locks
                .lock()
                .map_err(|_| EngineError::storage("user lock table poisoned"))?;
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };

        let result = {
            let _guard = lock_ignoring_poison(&lock);
            critical()
        };

        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // one count for the table and one for `lock`: no other holder or waiter
        if Arc::strong_count(&lock) == 2 {
            locks.remove(user_id);
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn tracked_user_locks(&self) -> usize {
        self.user_locks
            .lock()
            .map(|locks| locks.len())
            .unwrap_or_default()
    }

    fn load(&self, entry_id: Uuid) -> EngineResult<TimeEntry> {
        self.store
            .get(entry_id)?
            .ok_or(EngineError::EntryNotFound { entry_id })
    }

    /// Applies `change` to a copy of the entry under the owner's lock and
    /// stores the copy only if `change` succeeds.
    fn mutate_entry<T>(
        &self,
        entry_id: Uuid,
        change: impl FnOnce(&mut TimeEntry) -> EngineResult<T>,
    ) -> EngineResult<(TimeEntry, T)> {
        let owner = self.load(entry_id)?.user_id;
        self.with_user_lock(&owner, || {
            // re-read: the entry may have changed or vanished while we waited
            let mut entry = self.load(entry_id)?;
            let out = change(&mut entry)?;
            self.store.update(entry.clone())?;
            Ok((entry, out))
        })
    }

    fn check_text_length(&self, field: &str, text: Option<&str>) -> EngineResult<()> {
        let max = self.config.max_notes_length;
        match text {
            Some(text) if text.chars().count() > max => Err(EngineError::validation(format!(
                "{} exceed the {} character limit",
                field, max
            ))),
            _ => Ok(()),
        }
    }
}

// The guarded value is `()`, so a poisoned lock carries no broken state.
fn lock_ignoring_poison(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
