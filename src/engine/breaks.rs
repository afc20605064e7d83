//! Break tracking within an open entry.

use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::break_duration_minutes;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{Break, EntryStatus};

use super::AttendanceEngine;

impl AttendanceEngine {
    /// Starts a break on a clocked-in entry.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the entry is not `clocked_in`
    /// - `InvalidBreakState` if another break is already open
    pub fn start_break(&self, entry_id: Uuid) -> EngineResult<Break> {
        let result = self.mutate_entry(entry_id, |entry| {
            if entry.status != EntryStatus::ClockedIn {
                // a break can only be taken on the clock
                return Err(EngineError::InvalidState {
                    entry_id: entry.id,
                    current: entry.status,
                    requested: EntryStatus::ClockedIn,
                });
            }
            if let Some(open) = entry.open_break() {
                return Err(EngineError::InvalidBreakState {
                    break_id: open.id,
                    message: "another break is already in progress".to_string(),
                });
            }

            let started = Break {
                id: self.ids.next_id(),
                time_entry_id: entry.id,
                break_start_time: self.clock.now(),
                break_end_time: None,
                duration_minutes: None,
            };
            entry.breaks.push(started.clone());
            Ok(started)
        });

        match result {
            Ok((entry, started)) => {
                info!(entry_id = %entry.id, user_id = %entry.user_id, break_id = %started.id, "Break started");
                Ok(started)
            }
            Err(err) => {
                warn!(entry_id = %entry_id, error = %err, "Break start refused");
                Err(err)
            }
        }
    }

    /// Ends an open break and records its length in whole minutes.
    ///
    /// # Errors
    ///
    /// - `BreakNotFound` if the break is not part of this entry
    /// - `InvalidBreakState` if the break has already ended
    pub fn end_break(&self, entry_id: Uuid, break_id: Uuid) -> EngineResult<Break> {
        let now = self.clock.now();

        let result = self.mutate_entry(entry_id, |entry| {
            let b = entry
                .find_break_mut(break_id)
                .ok_or(EngineError::BreakNotFound { entry_id, break_id })?;
            if !b.is_open() {
                return Err(EngineError::InvalidBreakState {
                    break_id,
                    message: "break has already ended".to_string(),
                });
            }

            let minutes = break_duration_minutes(b.break_start_time, now)?;
            b.break_end_time = Some(now);
            b.duration_minutes = Some(minutes);
            Ok(b.clone())
        });

        match result {
            Ok((entry, ended)) => {
                info!(
                    entry_id = %entry.id,
                    break_id = %ended.id,
                    duration_minutes = ended.duration_minutes.unwrap_or_default(),
                    "Break ended"
                );
                Ok(ended)
            }
            Err(err) => {
                warn!(entry_id = %entry_id, break_id = %break_id, error = %err, "Break end refused");
                Err(err)
            }
        }
    }
}
