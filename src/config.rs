//! Scheduler configuration: day windows and engine parameters.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::schedule::types::DayLabel;

pub const DEFAULT_TOTAL_CAP_PER_SLOT: usize = 2;
pub const DEFAULT_DAILY_LIMIT: usize = 13;
pub const DEFAULT_SKIP_HOUR: u32 = 12;

/// Half-hour slots are generated for every hour in `[start_hour, end_hour)`
/// except `skip_hour`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub label: DayLabel,
    pub start_hour: u32,
    pub end_hour: u32,
    #[serde(default)]
    pub skip_hour: Option<u32>,
}

impl DayWindow {
    pub fn new(label: &str, start_hour: u32, end_hour: u32) -> Self {
        DayWindow {
            label: DayLabel::from(label),
            start_hour,
            end_hour,
            skip_hour: Some(DEFAULT_SKIP_HOUR),
        }
    }
}

/// Everything a run needs besides the availability table.
///
/// The order of `days` is both the round-robin order of the slot catalog and
/// the order days are reported in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub days: Vec<DayWindow>,
    #[serde(default = "default_total_cap_per_slot")]
    pub total_cap_per_slot: usize,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,
}

fn default_total_cap_per_slot() -> usize {
    DEFAULT_TOTAL_CAP_PER_SLOT
}

fn default_daily_limit() -> usize {
    DEFAULT_DAILY_LIMIT
}

impl Default for SchedulerConfig {
    /// Three interview days; 39 candidates over 3 days gives 13 a day.
    fn default() -> Self {
        SchedulerConfig {
            days: vec![
                DayWindow::new("1/17(토)", 10, 17),
                DayWindow::new("1/18(일)", 10, 16),
                DayWindow::new("1/16(금)", 15, 22),
            ],
            total_cap_per_slot: DEFAULT_TOTAL_CAP_PER_SLOT,
            daily_limit: DEFAULT_DAILY_LIMIT,
        }
    }
}

impl SchedulerConfig {
    /// Loads and validates a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn day_labels(&self) -> Vec<DayLabel> {
        self.days.iter().map(|d| d.label.clone()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_cap_per_slot == 0 {
            return Err(ScheduleError::config("total_cap_per_slot", "must be positive"));
        }
        if self.daily_limit == 0 {
            return Err(ScheduleError::config("daily_limit", "must be positive"));
        }
        if self.days.is_empty() {
            return Err(ScheduleError::config("days", "at least one day is required"));
        }

        let mut seen = HashSet::new();
        for window in &self.days {
            let key = format!("days[{}]", window.label);
            if window.label.as_str().trim().is_empty() {
                return Err(ScheduleError::config("days", "day label must not be empty"));
            }
            if !seen.insert(&window.label) {
                return Err(ScheduleError::config(key, "duplicate day label"));
            }
            if window.end_hour > 24 {
                return Err(ScheduleError::config(key, format!("end_hour {} is past midnight", window.end_hour)));
            }
            if window.start_hour >= window.end_hour {
                return Err(ScheduleError::config(
                    key,
                    format!("start_hour {} must be before end_hour {}", window.start_hour, window.end_hour),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_cap_per_slot, 2);
        assert_eq!(config.daily_limit, 13);
        assert_eq!(config.days[0].label.as_str(), "1/17(토)");
    }

    #[test]
    fn parameters_default_when_omitted() {
        let raw = r#"{"days": [{"label": "mon", "start_hour": 9, "end_hour": 11}]}"#;
        let config: SchedulerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.total_cap_per_slot, DEFAULT_TOTAL_CAP_PER_SLOT);
        assert_eq!(config.daily_limit, DEFAULT_DAILY_LIMIT);
        assert_eq!(config.days[0].skip_hour, None);
    }

    #[test]
    fn rejects_bad_windows_and_parameters() {
        let mut config = SchedulerConfig::default();
        config.total_cap_per_slot = 0;
        assert!(config.validate().is_err());

        let mut config = SchedulerConfig::default();
        config.days[1].start_hour = 18;
        assert!(config.validate().is_err());

        let mut config = SchedulerConfig::default();
        config.days.push(config.days[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate day label"));

        let mut config = SchedulerConfig::default();
        config.days[2].end_hour = 25;
        assert!(config.validate().is_err());
    }
}
