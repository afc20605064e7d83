//! Request types for the attendance API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{EntryFilter, EntryStatus, ReviewDecision, User};

/// Body of `POST /entries/clock-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockInRequest {
    /// The user clocking in.
    pub user_id: String,
    /// Day to file the entry under; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /entries/:id/review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// The user performing the review.
    pub reviewer: User,
    /// Approve or reject.
    pub decision: ReviewDecision,
    /// Optional reviewer comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Body of `POST /entries/:id/resubmit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResubmitRequest {
    /// The user re-opening the entry.
    pub reviewer: User,
}

/// Query string of `GET /entries` and `GET /entries/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Only this user's entries.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Only entries in this state.
    #[serde(default)]
    pub status: Option<EntryStatus>,
    /// Earliest date, inclusive.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Substring to look for in notes.
    #[serde(default)]
    pub search: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Entries per page.
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl ListQuery {
    /// Splits out the filter part of the query.
    pub fn filter(&self) -> EntryFilter {
        EntryFilter {
            user_id: self.user_id.clone(),
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            search: self.search.clone(),
        }
    }
}
