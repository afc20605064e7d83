//! Storage abstraction for time entries.
//!
//! A [`TimeEntryStore`] persists whole [`TimeEntry`] records, breaks
//! included. Writes always replace a complete record, so a reader never sees
//! an entry with a partially written break.

mod memory;

pub use memory::InMemoryStore;

use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::TimeEntry;

/// Create/read/update/delete/list over time entries.
///
/// Implementations report their own failures as
/// [`EngineError::Storage`](crate::error::EngineError::Storage); the engine
/// passes those through unchanged.
pub trait TimeEntryStore: Send + Sync {
    /// Stores a new entry. Fails if the id is already taken.
    fn insert(&self, entry: TimeEntry) -> EngineResult<()>;

    /// Fetches an entry by id.
    fn get(&self, id: Uuid) -> EngineResult<Option<TimeEntry>>;

    /// Replaces an existing entry. Fails if it does not exist.
    fn update(&self, entry: TimeEntry) -> EngineResult<()>;

    /// Removes an entry and its breaks. Returns whether anything was removed.
    fn delete(&self, id: Uuid) -> EngineResult<bool>;

    /// Snapshot of all entries, optionally restricted to one user.
    fn list(&self, user_id: Option<&str>) -> EngineResult<Vec<TimeEntry>>;

    /// The user's entry in `clocked_in` state, if any.
    fn find_open_entry(&self, user_id: &str) -> EngineResult<Option<TimeEntry>>;
}
