//! In-process store backed by a hash map.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{EntryStatus, TimeEntry};

use super::TimeEntryStore;

/// Keeps entries in memory behind a read/write lock.
///
/// Listing takes a read lock and clones, so queries do not block each other
/// and only wait for a writer for the duration of a single map operation.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<Uuid, TimeEntry>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, HashMap<Uuid, TimeEntry>>> {
        self.entries
            .read()
            .map_err(|_| EngineError::storage("entry table lock poisoned"))
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, HashMap<Uuid, TimeEntry>>> {
        self.entries
            .write()
            .map_err(|_| EngineError::storage("entry table lock poisoned"))
    }
}

impl TimeEntryStore for InMemoryStore {
    fn insert(&self, entry: TimeEntry) -> EngineResult<()> {
        let mut entries = self.write()?;
        if entries.contains_key(&entry.id) {
            return Err(EngineError::storage(format!(
                "entry {} already exists",
                entry.id
            )));
        }
        entries.insert(entry.id, entry);
        Ok(())
    }

    fn get(&self, id: Uuid) -> EngineResult<Option<TimeEntry>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn update(&self, entry: TimeEntry) -> EngineResult<()> {
        let mut entries = self.write()?;
        match entries.get_mut(&entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(EngineError::EntryNotFound { entry_id: entry.id }),
        }
    }

    fn delete(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }

    fn list(&self, user_id: Option<&str>) -> EngineResult<Vec<TimeEntry>> {
        let entries = self.read()?;
        Ok(entries
            .values()
            .filter(|e| user_id.is_none_or(|u| e.user_id == u))
            .cloned()
            .collect())
    }

    fn find_open_entry(&self, user_id: &str) -> EngineResult<Option<TimeEntry>> {
        let entries = self.read()?;
        Ok(entries
            .values()
            .find(|e| e.user_id == user_id && e.status == EntryStatus::ClockedIn)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn entry(id: u128, user: &str, status: EntryStatus) -> TimeEntry {
        TimeEntry {
            id: Uuid::from_u128(id),
            user_id: user.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            clock_in_time: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            clock_out_time: None,
            status,
            notes: None,
            breaks: vec![],
            regular_hours: None,
            overtime_hours: None,
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryStore::new();
        store.insert(entry(1, "emp_001", EntryStatus::ClockedIn)).unwrap();

        let fetched = store.get(Uuid::from_u128(1)).unwrap().unwrap();
        assert_eq!(fetched.user_id, "emp_001");
        assert!(store.get(Uuid::from_u128(2)).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = InMemoryStore::new();
        store.insert(entry(1, "emp_001", EntryStatus::ClockedIn)).unwrap();
        let err = store
            .insert(entry(1, "emp_002", EntryStatus::ClockedIn))
            .unwrap_err();
        assert!(matches!(err, EngineError::Storage { .. }));
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let store = InMemoryStore::new();
        store.insert(entry(1, "emp_001", EntryStatus::ClockedIn)).unwrap();

        let mut changed = entry(1, "emp_001", EntryStatus::Pending);
        changed.notes = Some("late start".to_string());
        store.update(changed.clone()).unwrap();

        assert_eq!(store.get(Uuid::from_u128(1)).unwrap(), Some(changed));
    }

    #[test]
    fn test_update_missing_entry() {
        let store = InMemoryStore::new();
        let err = store
            .update(entry(9, "emp_001", EntryStatus::Pending))
            .unwrap_err();
        assert!(matches!(err, EngineError::EntryNotFound { .. }));
    }

    #[test]
    fn test_delete_reports_existence() {
        let store = InMemoryStore::new();
        store.insert(entry(1, "emp_001", EntryStatus::Pending)).unwrap();

        assert!(store.delete(Uuid::from_u128(1)).unwrap());
        assert!(!store.delete(Uuid::from_u128(1)).unwrap());
    }

    #[test]
    fn test_list_filters_by_user() {
        let store = InMemoryStore::new();
        store.insert(entry(1, "emp_001", EntryStatus::Pending)).unwrap();
        store.insert(entry(2, "emp_002", EntryStatus::Pending)).unwrap();
        store.insert(entry(3, "emp_001", EntryStatus::Approved)).unwrap();

        assert_eq!(store.list(None).unwrap().len(), 3);
        let mine = store.list(Some("emp_001")).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.user_id == "emp_001"));
    }

    #[test]
    fn test_find_open_entry() {
        let store = InMemoryStore::new();
        store.insert(entry(1, "emp_001", EntryStatus::Pending)).unwrap();
        assert!(store.find_open_entry("emp_001").unwrap().is_none());

        store.insert(entry(2, "emp_001", EntryStatus::ClockedIn)).unwrap();
        let open = store.find_open_entry("emp_001").unwrap().unwrap();
        assert_eq!(open.id, Uuid::from_u128(2));
        assert!(store.find_open_entry("emp_002").unwrap().is_none());
    }
}
