//! Break duration calculation.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};

const MS_PER_MINUTE: i64 = 60_000;

/// Returns the whole minutes between `start` and `end`, rounded to the
/// nearest minute with halves rounded up.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `end` is before `start`.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::break_duration_minutes;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
/// assert_eq!(break_duration_minutes(start, start + Duration::seconds(29)).unwrap(), 0);
/// assert_eq!(break_duration_minutes(start, start + Duration::seconds(30)).unwrap(), 1);
/// assert_eq!(break_duration_minutes(start, start + Duration::minutes(30)).unwrap(), 30);
/// ```
pub fn break_duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<i64> {
    let elapsed = (end - start).num_milliseconds();
    if elapsed < 0 {
        return Err(EngineError::validation(format!(
            "break end {} is before break start {}",
            end, start
        )));
    }
    Ok((elapsed + MS_PER_MINUTE / 2) / MS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_exact_minutes() {
        assert_eq!(
            break_duration_minutes(noon(), noon() + Duration::minutes(45)).unwrap(),
            45
        );
    }

    #[test]
    fn test_rounds_to_nearest_minute() {
        let start = noon();
        assert_eq!(
            break_duration_minutes(start, start + Duration::seconds(14 * 60 + 29)).unwrap(),
            14
        );
        assert_eq!(
            break_duration_minutes(start, start + Duration::seconds(14 * 60 + 31)).unwrap(),
            15
        );
    }

    #[test]
    fn test_zero_length_break() {
        assert_eq!(break_duration_minutes(noon(), noon()).unwrap(), 0);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = break_duration_minutes(noon(), noon() - Duration::minutes(1)).unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }
}
