//! Calculation logic for the attendance engine.
//!
//! This module contains the pure functions behind clock-out: break duration
//! rounding, net worked hours, and the regular/overtime split under a
//! configurable daily threshold.

mod break_duration;
mod worked_hours;

pub use break_duration::break_duration_minutes;
pub use worked_hours::{
    DEFAULT_DAILY_OVERTIME_THRESHOLD, HoursBreakdown, calculate_hours, round_hours,
    split_at_threshold,
};
