use csv::Reader;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::schedule::slot_utils::hour_of;
use crate::schedule::types::{AvailabilityTable, DayLabel};

/// One candidate's availability as stored in a JSON availability file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub candidate: String,
    #[serde(default)]
    pub availability: Vec<(DayLabel, u32)>,
}

/// Parses one hour entry: either a bare hour (`17`) or a time (`17:30`).
/// Minutes are dropped.
fn parse_hour(value: &str, candidate: &str, row: usize) -> Result<u32> {
    let invalid = || ScheduleError::InvalidHour {
        candidate: candidate.to_string(),
        value: value.to_string(),
        row,
    };

    let hour = if value.contains(':') {
        hour_of(value).map_err(|_| invalid())?
    } else {
        value.parse::<u32>().map_err(|_| invalid())?
    };
    if hour >= 24 {
        return Err(invalid());
    }
    Ok(hour)
}

/// Parses a comma-separated list of hours
fn parse_hours(hours: &str, candidate: &str, row: usize) -> Result<Vec<u32>> {
    hours
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_hour(part, candidate, row))
        .collect()
}

/// Reads availability from CSV with columns `candidate`, `day`, `hours`.
///
/// Several rows for the same candidate are merged. Candidates keep the order
/// of their first row, which becomes the default processing order.
pub fn read_availability_csv<R: Read>(input: R) -> Result<AvailabilityTable> {
    let mut reader = Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let find = |names: &[&str], fallback: usize| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
            .unwrap_or(fallback)
    };
    let candidate_col = find(&["candidate", "name"], 0);
    let day_col = find(&["day"], 1);
    let hours_col = find(&["hours", "hour", "times"], 2);

    let mut table = AvailabilityTable::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let row = i + 2;

        let candidate = record.get(candidate_col).unwrap_or("").trim();
        if candidate.is_empty() {
            warn!(row, "skipping availability row without a candidate");
            continue;
        }
        table.add_candidate(candidate);

        let day = record.get(day_col).unwrap_or("").trim();
        let hours = parse_hours(record.get(hours_col).unwrap_or(""), candidate, row)?;
        if day.is_empty() {
            if !hours.is_empty() {
                warn!(row, candidate, "hours given without a day, ignoring them");
            }
            continue;
        }
        for hour in hours {
            table.insert(candidate, day, hour);
        }
    }

    debug!(candidates = table.len(), "availability loaded from csv");
    Ok(table)
}

/// Reads availability from a JSON array of [`AvailabilityRecord`]s
pub fn read_availability_json<R: Read>(input: R) -> Result<AvailabilityTable> {
    let records: Vec<AvailabilityRecord> = serde_json::from_reader(input)?;

    let mut table = AvailabilityTable::new();
    for (row, record) in records.iter().enumerate() {
        let candidate = record.candidate.trim();
        if candidate.is_empty() {
            warn!(row, "skipping availability record without a candidate");
            continue;
        }
        table.add_candidate(candidate);
        for (day, hour) in &record.availability {
            if *hour >= 24 {
                return Err(ScheduleError::InvalidHour {
                    candidate: candidate.to_string(),
                    value: hour.to_string(),
                    row,
                });
            }
            table.insert(candidate, day.clone(), *hour);
        }
    }

    debug!(candidates = table.len(), "availability loaded from json");
    Ok(table)
}

/// Loads an availability file, picking the format from its extension
/// (`.json`, anything else is read as CSV).
pub fn load_availability<P: AsRef<Path>>(path: P) -> Result<AvailabilityTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        read_availability_json(file)
    } else {
        read_availability_csv(file)
    }
}
