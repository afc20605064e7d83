//! Administrative corrections to a time entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fields a manager may correct on an existing entry.
///
/// `None` leaves a field unchanged. For `notes`, `Some(None)` clears the
/// notes; in JSON that is an explicit `"notes": null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New calendar date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New clock-in instant.
    #[serde(default)]
    pub clock_in_time: Option<DateTime<Utc>>,
    /// New clock-out instant. Only valid on entries that have clocked out.
    #[serde(default)]
    pub clock_out_time: Option<DateTime<Utc>>,
    /// Replacement notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl EntryPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.clock_in_time.is_none()
            && self.clock_out_time.is_none()
            && self.notes.is_none()
    }
}

// Distinguishes an absent field from an explicit null.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
