//! Query models: filters, pages, and summaries over time entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::time_entry::{EntryStatus, TimeEntry};

/// Criteria for selecting time entries. Unset fields match everything.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{EntryFilter, EntryStatus};
///
/// let filter = EntryFilter {
///     user_id: Some("emp_001".to_string()),
///     status: Some(EntryStatus::Pending),
///     ..EntryFilter::default()
/// };
/// assert!(filter.search.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Only entries owned by this user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Only entries in this state.
    #[serde(default)]
    pub status: Option<EntryStatus>,
    /// Earliest entry date, inclusive.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring that must appear in the notes.
    #[serde(default)]
    pub search: Option<String>,
}

impl EntryFilter {
    /// Returns true if `entry` satisfies every set criterion.
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        if let Some(user_id) = &self.user_id {
            if &entry.user_id != user_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| entry.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| entry.date > end) {
            return false;
        }
        match self.search_term() {
            Some(term) => entry
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(&term)),
            None => true,
        }
    }

    /// The lowercased search term, ignoring blank input.
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPage {
    /// The entries on this page, newest first.
    pub entries: Vec<TimeEntry>,
    /// Number of entries matching the filter across all pages.
    pub total_entries: usize,
    /// Number of pages at this page size.
    pub total_pages: usize,
    /// The 1-based page number returned.
    pub page: u32,
    /// The page size applied.
    pub page_size: u32,
}

/// Aggregate figures for the entries matching a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Number of matching entries.
    pub total_entries: usize,
    /// Entries still clocked in.
    pub clocked_in: usize,
    /// Entries awaiting review.
    pub pending: usize,
    /// Approved entries.
    pub approved: usize,
    /// Rejected entries.
    pub rejected: usize,
    /// Sum of regular hours.
    pub regular_hours: Decimal,
    /// Sum of overtime hours.
    pub overtime_hours: Decimal,
    /// Sum of closed break minutes.
    pub break_minutes: i64,
}

impl AttendanceSummary {
    /// Folds one entry into the running totals.
    pub fn add(&mut self, entry: &TimeEntry) {
        self.total_entries += 1;
        match entry.status {
            EntryStatus::ClockedIn => self.clocked_in += 1,
            EntryStatus::Pending => self.pending += 1,
            EntryStatus::Approved => self.approved += 1,
            EntryStatus::Rejected => self.rejected += 1,
        }
        self.regular_hours += entry.regular_hours.unwrap_or(Decimal::ZERO);
        self.overtime_hours += entry.overtime_hours.unwrap_or(Decimal::ZERO);
        self.break_minutes += entry.break_minutes();
    }
}
