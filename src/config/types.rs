//! Configuration types for the attendance engine.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from YAML.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DEFAULT_DAILY_OVERTIME_THRESHOLD;

fn default_threshold() -> Decimal {
    DEFAULT_DAILY_OVERTIME_THRESHOLD
}

fn default_max_notes_length() -> usize {
    500
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

/// Tunable engine parameters.
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// # Example
///
/// ```
/// use attendance_engine::config::EngineConfig;
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.daily_threshold_hours, Decimal::from(8));
/// assert_eq!(config.max_page_size, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hours per day counted as regular; the rest is overtime.
    #[serde(default = "default_threshold")]
    pub daily_threshold_hours: Decimal,
    /// Maximum characters allowed in entry notes and review comments.
    #[serde(default = "default_max_notes_length")]
    pub max_notes_length: usize,
    /// Page size used when a listing does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest page size a listing may request; larger requests are clamped.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_threshold_hours: default_threshold(),
            max_notes_length: default_max_notes_length(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl EngineConfig {
    /// Checks the values are usable, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.daily_threshold_hours <= Decimal::ZERO {
            return Err(format!(
                "daily_threshold_hours must be positive, got {}",
                self.daily_threshold_hours
            ));
        }
        if self.daily_threshold_hours > Decimal::from(24) {
            return Err(format!(
                "daily_threshold_hours cannot exceed 24, got {}",
                self.daily_threshold_hours
            ));
        }
        // hours are stored to the hundredth
        if self.daily_threshold_hours.normalize().scale() > 2 {
            return Err(format!(
                "daily_threshold_hours allows at most 2 decimal places, got {}",
                self.daily_threshold_hours
            ));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err("page sizes must be positive".to_string());
        }
        if self.default_page_size > self.max_page_size {
            return Err(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            ));
        }
        Ok(())
    }
}
