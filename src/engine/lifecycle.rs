//! Time entry state machine and review operations.
//!
//! ```text
//! clock_in ──> clocked_in ──clock_out──> pending ──review──> approved
//!                                          ^   └────review──> rejected
//!                                          └──────resubmit─────┘
//! ```

use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{EntryStatus, ReviewDecision, TimeEntry, User};

use super::AttendanceEngine;

impl EntryStatus {
    /// Returns true if an entry may move directly from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::EntryStatus;
    ///
    /// assert!(EntryStatus::ClockedIn.can_transition_to(EntryStatus::Pending));
    /// assert!(!EntryStatus::ClockedIn.can_transition_to(EntryStatus::Approved));
    /// assert!(!EntryStatus::Approved.can_transition_to(EntryStatus::Pending));
    /// ```
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        use EntryStatus::*;
        matches!(
            (self, next),
            (ClockedIn, Pending) | (Pending, Approved) | (Pending, Rejected) | (Rejected, Pending)
        )
    }
}

/// Moves `entry` to `requested`, or fails naming both states.
pub(crate) fn transition(entry: &mut TimeEntry, requested: EntryStatus) -> EngineResult<()> {
    if !entry.status.can_transition_to(requested) {
        return Err(EngineError::InvalidState {
            entry_id: entry.id,
            current: entry.status,
            requested,
        });
    }
    entry.status = requested;
    Ok(())
}

fn ensure_reviewer(reviewer: &User, entry: &TimeEntry) -> EngineResult<()> {
    if !reviewer.role.can_review() {
        return Err(EngineError::validation(format!(
            "user '{}' is not allowed to review time entries",
            reviewer.id
        )));
    }
    if reviewer.id == entry.user_id {
        return Err(EngineError::validation(format!(
            "user '{}' cannot review their own time entry",
            reviewer.id
        )));
    }
    Ok(())
}

impl AttendanceEngine {
    /// Approves or rejects a pending entry.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry does not exist
    /// - `InvalidState` if the entry is not pending, whoever the reviewer is
    /// - `Validation` if the reviewer is not a manager/admin, is the entry's
    ///   owner, or the comment is too long
    pub fn review_entry(
        &self,
        entry_id: Uuid,
        reviewer: &User,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> EngineResult<TimeEntry> {
        self.check_text_length("review comments", comment.as_deref())?;
        let now = self.clock.now();

        let result = self.mutate_entry(entry_id, |entry| {
            transition(entry, decision.into())?;
            ensure_reviewer(reviewer, entry)?;
            entry.reviewed_by = Some(reviewer.id.clone());
            entry.reviewed_at = Some(now);
            entry.review_comment = comment;
            Ok(())
        });

        match result {
            Ok((entry, ())) => {
                info!(
                    entry_id = %entry.id,
                    user_id = %entry.user_id,
                    reviewer = %reviewer.id,
                    status = %entry.status,
                    "Time entry reviewed"
                );
                Ok(entry)
            }
            Err(err) => {
                warn!(entry_id = %entry_id, reviewer = %reviewer.id, error = %err, "Review rejected");
                Err(err)
            }
        }
    }

    /// Re-opens a rejected entry for another round of review.
    ///
    /// Clears the previous review so the next reviewer starts fresh.
    pub fn resubmit_entry(&self, entry_id: Uuid, reviewer: &User) -> EngineResult<TimeEntry> {
        let (entry, ()) = self.mutate_entry(entry_id, |entry| {
            transition(entry, EntryStatus::Pending)?;
            ensure_reviewer(reviewer, entry)?;
            entry.reviewed_by = None;
            entry.reviewed_at = None;
            entry.review_comment = None;
            Ok(())
        })?;

        info!(
            entry_id = %entry.id,
            reviewer = %reviewer.id,
            "Rejected time entry re-submitted for review"
        );
        Ok(entry)
    }
}
