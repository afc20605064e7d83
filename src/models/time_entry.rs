//! Time entry model and related types.
//!
//! This module defines the [`TimeEntry`] and [`Break`] structs that record a
//! single workday's attendance for one user.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a time entry.
///
/// `ClockedIn` is the only initial state. Clock-out always moves an entry to
/// `Pending`, from where a reviewer approves or rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// The user is currently on the clock.
    ClockedIn,
    /// Clocked out, waiting for review.
    Pending,
    /// Accepted by a reviewer.
    Approved,
    /// Sent back by a reviewer.
    Rejected,
}

impl EntryStatus {
    /// Returns the wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::ClockedIn => "clocked_in",
            EntryStatus::Pending => "pending",
            EntryStatus::Approved => "approved",
            EntryStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer's verdict on a pending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Accept the recorded hours.
    Approved,
    /// Send the entry back.
    Rejected,
}

impl From<ReviewDecision> for EntryStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => EntryStatus::Approved,
            ReviewDecision::Rejected => EntryStatus::Rejected,
        }
    }
}

/// A break taken while clocked in.
///
/// A break is open while `break_end_time` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    /// Unique identifier for the break.
    pub id: Uuid,
    /// The entry this break belongs to.
    pub time_entry_id: Uuid,
    /// When the break started.
    pub break_start_time: DateTime<Utc>,
    /// When the break ended, if it has.
    pub break_end_time: Option<DateTime<Utc>>,
    /// Whole minutes, set once when the break is closed.
    pub duration_minutes: Option<i64>,
}

impl Break {
    /// Returns true if the break has not been ended yet.
    pub fn is_open(&self) -> bool {
        self.break_end_time.is_none()
    }

    /// Exact elapsed milliseconds of a closed break, or zero if still open.
    pub fn elapsed_ms(&self) -> i64 {
        self.break_end_time
            .map(|end| (end - self.break_start_time).num_milliseconds())
            .unwrap_or(0)
    }
}

/// One user's attendance record for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The user who owns the entry.
    pub user_id: String,
    /// The calendar day the entry is filed under.
    pub date: NaiveDate,
    /// When the user clocked in.
    pub clock_in_time: DateTime<Utc>,
    /// When the user clocked out; absent while clocked in.
    pub clock_out_time: Option<DateTime<Utc>>,
    /// Current lifecycle state.
    pub status: EntryStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Breaks in the order they were started.
    #[serde(default)]
    pub breaks: Vec<Break>,
    /// Hours up to the daily threshold; computed at clock-out.
    pub regular_hours: Option<Decimal>,
    /// Hours beyond the daily threshold; computed at clock-out.
    pub overtime_hours: Option<Decimal>,
    /// Who last approved or rejected the entry.
    #[serde(default)]
    pub reviewed_by: Option<String>,
    /// When the last review happened.
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reviewer's comment.
    #[serde(default)]
    pub review_comment: Option<String>,
}

impl TimeEntry {
    /// Returns the break that is currently open, if any.
    pub fn open_break(&self) -> Option<&Break> {
        self.breaks.iter().find(|b| b.is_open())
    }

    /// Returns true if the user is on a break right now.
    pub fn is_on_break(&self) -> bool {
        self.open_break().is_some()
    }

    /// Looks up a break on this entry by id for modification.
    pub fn find_break_mut(&mut self, break_id: Uuid) -> Option<&mut Break> {
        self.breaks.iter_mut().find(|b| b.id == break_id)
    }

    /// Total minutes of all closed breaks.
    pub fn break_minutes(&self) -> i64 {
        self.breaks.iter().filter_map(|b| b.duration_minutes).sum()
    }

    /// Regular plus overtime hours, zero before clock-out.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{EntryStatus, TimeEntry};
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let entry = TimeEntry {
    ///     id: Uuid::nil(),
    ///     user_id: "emp_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
    ///     clock_in_time: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    ///     clock_out_time: None,
    ///     status: EntryStatus::ClockedIn,
    ///     notes: None,
    ///     breaks: vec![],
    ///     regular_hours: None,
    ///     overtime_hours: None,
    ///     reviewed_by: None,
    ///     reviewed_at: None,
    ///     review_comment: None,
    /// };
    /// assert_eq!(entry.total_hours(), Decimal::ZERO);
    /// ```
    pub fn total_hours(&self) -> Decimal {
        self.regular_hours.unwrap_or(Decimal::ZERO) + self.overtime_hours.unwrap_or(Decimal::ZERO)
    }
}
