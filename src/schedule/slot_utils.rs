use chrono::NaiveTime;

use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use super::types::{DayLabel, Slot};

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Result<u32> {
    let invalid = |reason: &str| ScheduleError::InvalidTime {
        value: time_str.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return Err(invalid("expected HH:MM"));
    }
    let hours: u32 = parts[0].parse().map_err(|_| invalid("hour is not a number"))?;
    let minutes: u32 = parts[1].parse().map_err(|_| invalid("minute is not a number"))?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid("out of range"));
    }
    Ok(hours * 60 + minutes)
}

/// Parses a time string (HH:MM) to a time of day
pub fn parse_time_of_day(time_str: &str) -> Result<NaiveTime> {
    let minutes = parse_time_to_minutes(time_str)?;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).ok_or_else(|| ScheduleError::InvalidTime {
        value: time_str.to_string(),
        reason: "out of range".to_string(),
    })
}

/// Hour part of a time string; minutes are dropped
pub fn hour_of(time_str: &str) -> Result<u32> {
    parse_time_to_minutes(time_str).map(|minutes| minutes / 60)
}

/// Two entries per hour (`:00`, `:30`) for every hour in `[start, end)`
/// except `skip`, ascending.
pub fn generate_time_list(start: u32, end: u32, skip: Option<u32>) -> Vec<NaiveTime> {
    let mut times = Vec::new();
    for hour in start..end.min(24) {
        if Some(hour) == skip {
            continue;
        }
        for minute in [0, 30] {
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                times.push(time);
            }
        }
    }
    times
}

/// Round-robin merge: the i-th slot of every day (in the given day order)
/// before any day's (i+1)-th slot. Shorter days simply drop out.
pub fn interleave_slots(days: &[(DayLabel, Vec<NaiveTime>)]) -> Vec<Slot> {
    let max_len = days.iter().map(|(_, times)| times.len()).max().unwrap_or(0);
    let mut slots = Vec::with_capacity(days.iter().map(|(_, times)| times.len()).sum());

    for i in 0..max_len {
        for (day, times) in days {
            if let Some(time) = times.get(i) {
                slots.push(Slot::new(day.clone(), *time));
            }
        }
    }
    slots
}

/// Builds the ordered search catalog from the configured day windows
pub fn build_catalog(config: &SchedulerConfig) -> Vec<Slot> {
    let per_day: Vec<(DayLabel, Vec<NaiveTime>)> = config
        .days
        .iter()
        .map(|window| {
            (
                window.label.clone(),
                generate_time_list(window.start_hour, window.end_hour, window.skip_hour),
            )
        })
        .collect();
    interleave_slots(&per_day)
}
