//! Clock-in, clock-out, and administrative entry maintenance.

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::calculate_hours;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{EntryPatch, EntryStatus, TimeEntry};

use super::lifecycle::transition;
use super::AttendanceEngine;

impl AttendanceEngine {
    /// Opens a new entry for `user_id` at the current instant.
    ///
    /// `date` defaults to today's UTC date.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the user already has an entry in `clocked_in` state
    /// - `Validation` if `user_id` is blank or `notes` are too long
    pub fn clock_in(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> EngineResult<TimeEntry> {
        if user_id.trim().is_empty() {
            return Err(EngineError::validation("user id must not be empty"));
        }
        self.check_text_length("notes", notes.as_deref())?;

        let entry = self.with_user_lock(user_id, || {
            if let Some(open) = self.store.find_open_entry(user_id)? {
                warn!(user_id = %user_id, entry_id = %open.id, "Clock-in refused: already clocked in");
                return Err(EngineError::Conflict {
                    user_id: user_id.to_string(),
                    entry_id: open.id,
                });
            }

            let now = self.clock.now();
            let entry = TimeEntry {
                id: self.ids.next_id(),
                user_id: user_id.to_string(),
                date: date.unwrap_or_else(|| now.date_naive()),
                clock_in_time: now,
                clock_out_time: None,
                status: EntryStatus::ClockedIn,
                notes,
                breaks: Vec::new(),
                regular_hours: None,
                overtime_hours: None,
                reviewed_by: None,
                reviewed_at: None,
                review_comment: None,
            };
            self.store.insert(entry.clone())?;
            Ok(entry)
        })?;

        info!(user_id = %user_id, entry_id = %entry.id, date = %entry.date, "Clocked in");
        Ok(entry)
    }

    /// Closes an open entry, computes its hours and sends it for review.
    ///
    /// On failure the entry is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the entry is not `clocked_in`
    /// - `InvalidBreakState` if a break is still open
    /// - `Validation` if the hours cannot be derived (e.g. clock went backwards)
    pub fn clock_out(&self, entry_id: Uuid) -> EngineResult<TimeEntry> {
        let threshold = self.config.daily_threshold_hours;

        let result = self.mutate_entry(entry_id, |entry| {
            if entry.status != EntryStatus::ClockedIn {
                return Err(EngineError::InvalidState {
                    entry_id: entry.id,
                    current: entry.status,
                    requested: EntryStatus::Pending,
                });
            }
            if let Some(open) = entry.open_break() {
                return Err(EngineError::InvalidBreakState {
                    break_id: open.id,
                    message: "break must be ended before clocking out".to_string(),
                });
            }

            let now = self.clock.now();
            let hours = calculate_hours(entry.clock_in_time, now, &entry.breaks, threshold)?;

            entry.clock_out_time = Some(now);
            entry.regular_hours = Some(hours.regular_hours);
            entry.overtime_hours = Some(hours.overtime_hours);
            transition(entry, EntryStatus::Pending)?;
            Ok(hours)
        });

        match result {
            Ok((entry, hours)) => {
                info!(
                    entry_id = %entry.id,
                    user_id = %entry.user_id,
                    regular_hours = %hours.regular_hours,
                    overtime_hours = %hours.overtime_hours,
                    break_hours = %hours.break_hours,
                    "Clocked out"
                );
                Ok(entry)
            }
            Err(err) => {
                warn!(entry_id = %entry_id, error = %err, "Clock-out refused");
                Err(err)
            }
        }
    }

    /// Fetches an entry by id.
    pub fn get_entry(&self, entry_id: Uuid) -> EngineResult<TimeEntry> {
        self.load(entry_id)
    }

    /// The user's currently open entry, if they are clocked in.
    pub fn active_entry(&self, user_id: &str) -> EngineResult<Option<TimeEntry>> {
        self.store.find_open_entry(user_id)
    }

    /// Permanently removes an entry and its breaks.
    ///
    /// Returns `false` if there was nothing to delete.
    pub fn delete_entry(&self, entry_id: Uuid) -> EngineResult<bool> {
        let Some(entry) = self.store.get(entry_id)? else {
            return Ok(false);
        };
        let deleted = self.with_user_lock(&entry.user_id, || self.store.delete(entry_id))?;
        if deleted {
            info!(
                entry_id = %entry_id,
                user_id = %entry.user_id,
                breaks = entry.breaks.len(),
                "Time entry deleted"
            );
        }
        Ok(deleted)
    }

    /// Applies an administrative correction and re-validates the entry.
    ///
    /// Hours are recomputed from the corrected timestamps when the entry has
    /// clocked out.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if a clock-out time is supplied for an entry that is
    ///   still clocked in
    /// - `Validation` if the corrected entry breaks an invariant
    pub fn update_entry(&self, entry_id: Uuid, patch: EntryPatch) -> EngineResult<TimeEntry> {
        if let Some(notes) = &patch.notes {
            self.check_text_length("notes", notes.as_deref())?;
        }
        let threshold = self.config.daily_threshold_hours;

        let (entry, ()) = self.mutate_entry(entry_id, |entry| {
            if patch.clock_out_time.is_some() && entry.status == EntryStatus::ClockedIn {
                return Err(EngineError::InvalidState {
                    entry_id: entry.id,
                    current: entry.status,
                    requested: EntryStatus::Pending,
                });
            }

            if let Some(date) = patch.date {
                entry.date = date;
            }
            if let Some(clock_in) = patch.clock_in_time {
                entry.clock_in_time = clock_in;
            }
            if let Some(clock_out) = patch.clock_out_time {
                entry.clock_out_time = Some(clock_out);
            }
            if let Some(notes) = patch.notes {
                entry.notes = notes;
            }

            validate_break_bounds(entry)?;
            if let Some(clock_out) = entry.clock_out_time {
                let hours =
                    calculate_hours(entry.clock_in_time, clock_out, &entry.breaks, threshold)?;
                entry.regular_hours = Some(hours.regular_hours);
                entry.overtime_hours = Some(hours.overtime_hours);
            }
            Ok(())
        })?;

        debug!(entry_id = %entry.id, "Time entry corrected");
        Ok(entry)
    }
}

/// Every break must lie within the clocked time.
fn validate_break_bounds(entry: &TimeEntry) -> EngineResult<()> {
    for b in &entry.breaks {
        if b.break_start_time < entry.clock_in_time {
            return Err(EngineError::validation(format!(
                "break {} starts before clock-in",
                b.id
            )));
        }
        if let (Some(end), Some(clock_out)) = (b.break_end_time, entry.clock_out_time) {
            if end > clock_out {
                return Err(EngineError::validation(format!(
                    "break {} ends after clock-out",
                    b.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::test_support::{at, engine_at, engine_with_config};
    use chrono::Duration;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_clock_in_creates_open_entry() {
        let (engine, _clock) = engine_at(9, 0);
        let entry = engine
            .clock_in("emp_001", None, Some("front desk".to_string()))
            .unwrap();

        assert_eq!(entry.status, EntryStatus::ClockedIn);
        assert_eq!(entry.clock_in_time, at(9, 0));
        assert_eq!(entry.date, at(9, 0).date_naive());
        assert!(entry.clock_out_time.is_none());
        assert!(entry.breaks.is_empty());
        assert_eq!(entry.total_hours(), Decimal::ZERO);
        assert_eq!(engine.get_entry(entry.id).unwrap(), entry);
    }

    #[test]
    fn test_clock_in_uses_given_date() {
        let (engine, _clock) = engine_at(9, 0);
        let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        let entry = engine.clock_in("emp_001", Some(date), None).unwrap();
        assert_eq!(entry.date, date);
    }

    #[test]
    fn test_second_clock_in_conflicts() {
        let (engine, _clock) = engine_at(9, 0);
        let first = engine.clock_in("emp_001", None, None).unwrap();

        let err = engine.clock_in("emp_001", None, None).unwrap_err();
        match err {
            EngineError::Conflict { user_id, entry_id } => {
                assert_eq!(user_id, "emp_001");
                assert_eq!(entry_id, first.id);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_users_clock_in_independently() {
        let (engine, _clock) = engine_at(9, 0);
        engine.clock_in("emp_001", None, None).unwrap();
        assert!(engine.clock_in("emp_002", None, None).is_ok());
    }

    #[test]
    fn test_clock_in_again_after_clock_out() {
        let (engine, clock) = engine_at(9, 0);
        let first = engine.clock_in("emp_001", None, None).unwrap();
        clock.advance(Duration::hours(4));
        engine.clock_out(first.id).unwrap();

        let second = engine.clock_in("emp_001", None, None).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_blank_user_and_long_notes_rejected() {
        let (engine, _clock) = engine_at(9, 0);
        assert!(matches!(
            engine.clock_in("  ", None, None).unwrap_err(),
            EngineError::Validation { .. }
        ));

        let notes = "n".repeat(501);
        assert!(matches!(
            engine.clock_in("emp_001", None, Some(notes)).unwrap_err(),
            EngineError::Validation { .. }
        ));
    }

    // ==========================================================================
    // CO-001: 09:00 - 17:30 with 30 + 15 minute breaks
    // ==========================================================================
    #[test]
    fn test_co_001_clock_out_with_two_breaks() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();

        clock.set(at(12, 0));
        let lunch = engine.start_break(entry.id).unwrap();
        clock.set(at(12, 30));
        engine.end_break(entry.id, lunch.id).unwrap();

        clock.set(at(15, 0));
        let coffee = engine.start_break(entry.id).unwrap();
        clock.set(at(15, 15));
        engine.end_break(entry.id, coffee.id).unwrap();

        clock.set(at(17, 30));
        let done = engine.clock_out(entry.id).unwrap();

        assert_eq!(done.status, EntryStatus::Pending);
        assert_eq!(done.clock_out_time, Some(at(17, 30)));
        assert_eq!(done.regular_hours, Some(dec("7.75")));
        assert_eq!(done.overtime_hours, Some(Decimal::ZERO));
    }

    // ==========================================================================
    // CO-002: 08:30 - 18:00 with a 45 minute break
    // ==========================================================================
    #[test]
    fn test_co_002_clock_out_with_overtime() {
        let (engine, clock) = engine_at(8, 30);
        let entry = engine.clock_in("emp_001", None, None).unwrap();

        clock.set(at(13, 0));
        let b = engine.start_break(entry.id).unwrap();
        clock.set(at(13, 45));
        engine.end_break(entry.id, b.id).unwrap();

        clock.set(at(18, 0));
        let done = engine.clock_out(entry.id).unwrap();

        assert_eq!(done.regular_hours, Some(dec("8.00")));
        assert_eq!(done.overtime_hours, Some(dec("0.75")));
    }

    #[test]
    fn test_clock_out_honours_configured_threshold() {
        let config = EngineConfig {
            daily_threshold_hours: dec("7.6"),
            ..EngineConfig::default()
        };
        let (engine, clock) = engine_with_config(9, 0, config);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.set(at(17, 0));

        let done = engine.clock_out(entry.id).unwrap();
        assert_eq!(done.regular_hours, Some(dec("7.6")));
        assert_eq!(done.overtime_hours, Some(dec("0.4")));
    }

    #[test]
    fn test_clock_out_pending_entry_fails() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.advance(Duration::hours(8));
        engine.clock_out(entry.id).unwrap();

        let err = engine.clock_out(entry.id).unwrap_err();
        match err {
            EngineError::InvalidState { current, .. } => {
                assert_eq!(current, EntryStatus::Pending)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clock_out_with_open_break_leaves_entry_untouched() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.set(at(12, 0));
        engine.start_break(entry.id).unwrap();
        let before = engine.get_entry(entry.id).unwrap();

        clock.set(at(17, 0));
        let err = engine.clock_out(entry.id).unwrap_err();

        assert!(matches!(err, EngineError::InvalidBreakState { .. }));
        assert_eq!(engine.get_entry(entry.id).unwrap(), before);
    }

    #[test]
    fn test_clock_out_at_clock_in_instant_fails_cleanly() {
        let (engine, _clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();

        let err = engine.clock_out(entry.id).unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));

        let after = engine.get_entry(entry.id).unwrap();
        assert_eq!(after.status, EntryStatus::ClockedIn);
        assert!(after.regular_hours.is_none());
        assert!(after.clock_out_time.is_none());
    }

    #[test]
    fn test_racing_clock_ins_open_one_entry() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        for _ in 0..50 {
            let (engine, _clock) = engine_at(9, 0);
            let engine = Arc::new(engine);
            let barrier = Arc::new(Barrier::new(8));

            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let engine = Arc::clone(&engine);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        engine.clock_in("emp_001", None, None)
                    })
                })
                .collect();
            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(
                results
                    .iter()
                    .filter_map(|r| r.as_ref().err())
                    .all(|e| matches!(e, EngineError::Conflict { .. }))
            );
            let stored = engine
                .list_entries(&crate::models::EntryFilter::default(), None, None)
                .unwrap();
            assert_eq!(stored.total_entries, 1);
            assert_eq!(engine.tracked_user_locks(), 0);
        }
    }

    #[test]
    fn test_lock_table_forgets_idle_users() {
        let (engine, clock) = engine_at(9, 0);
        for user in ["emp_001", "emp_002", "emp_003"] {
            let entry = engine.clock_in(user, None, None).unwrap();
            clock.advance(Duration::minutes(30));
            engine.start_break(entry.id).unwrap();
            clock.advance(Duration::minutes(10));
            let open = engine.get_entry(entry.id).unwrap().breaks[0].id;
            engine.end_break(entry.id, open).unwrap();
            clock.advance(Duration::hours(1));
            engine.clock_out(entry.id).unwrap();
            engine.delete_entry(entry.id).unwrap();
        }
        // a refused operation releases its slot too
        engine.clock_in("emp_004", None, None).unwrap();
        assert!(engine.clock_in("emp_004", None, None).is_err());

        assert_eq!(engine.tracked_user_locks(), 0);
    }

    #[test]
    fn test_clock_out_racing_end_break_stays_consistent() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        for _ in 0..50 {
            let (engine, clock) = engine_at(9, 0);
            let engine = Arc::new(engine);
            let entry = engine.clock_in("emp_001", None, None).unwrap();
            clock.set(at(16, 30));
            let b = engine.start_break(entry.id).unwrap();
            clock.set(at(17, 0));

            let barrier = Arc::new(Barrier::new(2));
            let ender = {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    engine.end_break(entry.id, b.id)
                })
            };
            let closer = {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    engine.clock_out(entry.id)
                })
            };
            let ended = ender.join().unwrap();
            let closed = closer.join().unwrap();

            // the break can always be ended; clock-out only wins if it came second
            assert_eq!(ended.unwrap().duration_minutes, Some(30));
            let stored = engine.get_entry(entry.id).unwrap();
            assert!(!stored.is_on_break());
            match closed {
                Ok(done) => {
                    assert_eq!(done, stored);
                    assert_eq!(stored.status, EntryStatus::Pending);
                    assert_eq!(stored.clock_out_time, Some(at(17, 0)));
                    assert_eq!(stored.regular_hours, Some(dec("7.5")));
                    assert_eq!(stored.overtime_hours, Some(Decimal::ZERO));
                }
                Err(err) => {
                    assert!(matches!(err, EngineError::InvalidBreakState { .. }));
                    assert_eq!(stored.status, EntryStatus::ClockedIn);
                    assert!(stored.clock_out_time.is_none());
                    assert!(stored.regular_hours.is_none());
                }
            }
        }
    }

    #[test]
    fn test_clock_out_unknown_entry() {
        let (engine, _clock) = engine_at(9, 0);
        let err = engine.clock_out(Uuid::from_u128(42)).unwrap_err();
        assert!(matches!(err, EngineError::EntryNotFound { .. }));
    }

    #[test]
    fn test_active_entry() {
        let (engine, clock) = engine_at(9, 0);
        assert!(engine.active_entry("emp_001").unwrap().is_none());

        let entry = engine.clock_in("emp_001", None, None).unwrap();
        assert_eq!(engine.active_entry("emp_001").unwrap().unwrap().id, entry.id);

        clock.advance(Duration::hours(1));
        engine.clock_out(entry.id).unwrap();
        assert!(engine.active_entry("emp_001").unwrap().is_none());
    }

    #[test]
    fn test_delete_cascades_and_reports() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.advance(Duration::minutes(5));
        engine.start_break(entry.id).unwrap();

        assert!(engine.delete_entry(entry.id).unwrap());
        assert!(matches!(
            engine.get_entry(entry.id).unwrap_err(),
            EngineError::EntryNotFound { .. }
        ));
        assert!(!engine.delete_entry(entry.id).unwrap());
        // the user is free to clock in again
        assert!(engine.clock_in("emp_001", None, None).is_ok());
    }

    #[test]
    fn test_update_recomputes_hours() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.set(at(17, 0));
        engine.clock_out(entry.id).unwrap();

        let patch = EntryPatch {
            clock_out_time: Some(at(19, 0)),
            notes: Some(Some("stayed for inventory".to_string())),
            ..EntryPatch::default()
        };
        let updated = engine.update_entry(entry.id, patch).unwrap();

        assert_eq!(updated.regular_hours, Some(dec("8")));
        assert_eq!(updated.overtime_hours, Some(dec("2")));
        assert_eq!(updated.notes.as_deref(), Some("stayed for inventory"));
        assert_eq!(updated.status, EntryStatus::Pending);
    }

    #[test]
    fn test_update_rejects_clock_out_before_clock_in() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.set(at(17, 0));
        let done = engine.clock_out(entry.id).unwrap();

        let patch = EntryPatch {
            clock_in_time: Some(at(18, 0)),
            ..EntryPatch::default()
        };
        let err = engine.update_entry(entry.id, patch).unwrap_err();

        assert!(matches!(err, EngineError::Validation { .. }));
        assert_eq!(engine.get_entry(entry.id).unwrap(), done);
    }

    #[test]
    fn test_update_rejects_breaks_outside_clocked_time() {
        let (engine, clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();
        clock.set(at(12, 0));
        let b = engine.start_break(entry.id).unwrap();
        clock.set(at(12, 30));
        engine.end_break(entry.id, b.id).unwrap();
        clock.set(at(17, 0));
        engine.clock_out(entry.id).unwrap();

        let late_start = EntryPatch {
            clock_in_time: Some(at(12, 15)),
            ..EntryPatch::default()
        };
        assert!(matches!(
            engine.update_entry(entry.id, late_start).unwrap_err(),
            EngineError::Validation { .. }
        ));

        let early_finish = EntryPatch {
            clock_out_time: Some(at(12, 10)),
            ..EntryPatch::default()
        };
        assert!(matches!(
            engine.update_entry(entry.id, early_finish).unwrap_err(),
            EngineError::Validation { .. }
        ));
    }

    #[test]
    fn test_update_cannot_clock_out_open_entry() {
        let (engine, _clock) = engine_at(9, 0);
        let entry = engine.clock_in("emp_001", None, None).unwrap();

        let patch = EntryPatch {
            clock_out_time: Some(at(17, 0)),
            ..EntryPatch::default()
        };
        let err = engine.update_entry(entry.id, patch).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));
    }

    #[test]
    fn test_update_can_clear_notes_on_open_entry() {
        let (engine, _clock) = engine_at(9, 0);
        let entry = engine
            .clock_in("emp_001", None, Some("typo".to_string()))
            .unwrap();

        let patch = EntryPatch {
            notes: Some(None),
            ..EntryPatch::default()
        };
        let updated = engine.update_entry(entry.id, patch).unwrap();
        assert!(updated.notes.is_none());
        assert!(updated.regular_hours.is_none());
    }
}
