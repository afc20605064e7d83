//! Core data models for the attendance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod entry_patch;
mod query;
mod time_entry;
mod user;

pub use entry_patch::EntryPatch;
pub use query::{AttendanceSummary, EntryFilter, EntryPage};
pub use time_entry::{Break, EntryStatus, ReviewDecision, TimeEntry};
pub use user::{Role, User};
