//! Worked hours and daily overtime calculation.
//!
//! This module derives the net worked duration of a clocked-out entry and
//! splits it into regular hours (up to the daily threshold) and overtime
//! hours (everything beyond it).

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Break;

/// Default daily overtime threshold in hours.
pub const DEFAULT_DAILY_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

const MS_PER_HOUR: i64 = 3_600_000;

/// The hours derived for one entry.
///
/// `regular_hours` and `overtime_hours` are what gets stored on the entry;
/// the other fields show how they were reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreakdown {
    /// Clock-in to clock-out, before break deductions.
    pub gross_hours: Decimal,
    /// Total duration of closed breaks.
    pub break_hours: Decimal,
    /// Gross minus breaks.
    pub net_hours: Decimal,
    /// Net hours up to the threshold.
    pub regular_hours: Decimal,
    /// Net hours beyond the threshold.
    pub overtime_hours: Decimal,
}

/// Rounds an hour value to 2 decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::round_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_hours(Decimal::from_str("7.745").unwrap()), Decimal::from_str("7.75").unwrap());
/// assert_eq!(round_hours(Decimal::from_str("0.004").unwrap()), Decimal::ZERO);
/// ```
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn ms_to_hours(ms: i64) -> Decimal {
    Decimal::from(ms) / Decimal::from(MS_PER_HOUR)
}

/// Splits net hours at `threshold`, returning `(regular, overtime)` unrounded.
pub fn split_at_threshold(net_hours: Decimal, threshold: Decimal) -> (Decimal, Decimal) {
    let regular = net_hours.min(threshold);
    let overtime = (net_hours - threshold).max(Decimal::ZERO);
    (regular, overtime)
}

/// Calculates regular and overtime hours for a clocked-out entry.
///
/// Only closed breaks are deducted, using their exact start/end instants.
/// Open breaks contribute nothing; callers are expected to have closed them.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if clock-out is not strictly after
/// clock-in, if a closed break ends before it starts, or if the breaks add
/// up to more than the time on the clock.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{calculate_hours, DEFAULT_DAILY_OVERTIME_THRESHOLD};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let clock_in = Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap();
/// let clock_out = Utc.with_ymd_and_hms(2026, 1, 15, 18, 0, 0).unwrap();
/// let hours = calculate_hours(clock_in, clock_out, &[], DEFAULT_DAILY_OVERTIME_THRESHOLD).unwrap();
///
/// assert_eq!(hours.regular_hours, Decimal::from_str("8.00").unwrap());
/// assert_eq!(hours.overtime_hours, Decimal::from_str("2.00").unwrap());
/// ```
pub fn calculate_hours(
    clock_in: DateTime<Utc>,
    clock_out: DateTime<Utc>,
    breaks: &[Break],
    threshold: Decimal,
) -> EngineResult<HoursBreakdown> {
    let gross_ms = (clock_out - clock_in).num_milliseconds();
    if gross_ms <= 0 {
        return Err(EngineError::validation(format!(
            "clock-out {} must be after clock-in {}",
            clock_out, clock_in
        )));
    }

    let mut break_ms: i64 = 0;
    for b in breaks.iter().filter(|b| !b.is_open()) {
        let elapsed = b.elapsed_ms();
        if elapsed < 0 {
            return Err(EngineError::validation(format!(
                "break {} ends before it starts",
                b.id
            )));
        }
        break_ms += elapsed;
    }

    let net_ms = gross_ms - break_ms;
    if net_ms < 0 {
        return Err(EngineError::validation(format!(
            "breaks total {} minutes, longer than the {} minutes on the clock",
            break_ms / 60_000,
            gross_ms / 60_000
        )));
    }

    let net_hours = ms_to_hours(net_ms);
    let (regular, overtime) = split_at_threshold(net_hours, threshold);

    Ok(HoursBreakdown {
        gross_hours: round_hours(ms_to_hours(gross_ms)),
        break_hours: round_hours(ms_to_hours(break_ms)),
        net_hours: round_hours(net_hours),
        regular_hours: round_hours(regular),
        overtime_hours: round_hours(overtime),
    })
}
