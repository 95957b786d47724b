use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Opaque day identifier, e.g. `1/17(토)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLabel(pub String);

impl DayLabel {
    pub fn new(label: impl Into<String>) -> Self {
        DayLabel(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DayLabel {
    fn from(value: &str) -> Self {
        DayLabel(value.to_string())
    }
}

impl From<String> for DayLabel {
    fn from(value: String) -> Self {
        DayLabel(value)
    }
}

/// A bookable (day, time) pair. Occupancy lives in the engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: DayLabel,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(day: impl Into<DayLabel>, time: NaiveTime) -> Self {
        Slot {
            day: day.into(),
            time,
        }
    }

    /// Hour used to match availability; minutes are ignored.
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time.format("%H:%M"))
    }
}

/// Candidate id -> set of (day, hour) pairs the candidate can attend.
///
/// Keeps the order candidates were first added in, which is the default
/// processing order for a run.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTable {
    order: Vec<String>,
    entries: HashMap<String, HashSet<(DayLabel, u32)>>,
}

impl AvailabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a candidate with no availability yet.
    pub fn add_candidate(&mut self, candidate: &str) {
        if !self.entries.contains_key(candidate) {
            self.order.push(candidate.to_string());
            self.entries.insert(candidate.to_string(), HashSet::new());
        }
    }

    /// Adds one (day, hour) pair, merging with what the candidate already has.
    pub fn insert(&mut self, candidate: &str, day: impl Into<DayLabel>, hour: u32) {
        self.add_candidate(candidate);
        if let Some(set) = self.entries.get_mut(candidate) {
            set.insert((day.into(), hour));
        }
    }

    /// Missing candidates are treated as never available.
    pub fn is_available(&self, candidate: &str, day: &DayLabel, hour: u32) -> bool {
        self.entries
            .get(candidate)
            .map(|set| set.iter().any(|(d, h)| d == day && *h == hour))
            .unwrap_or(false)
    }

    pub fn get(&self, candidate: &str) -> Option<&HashSet<(DayLabel, u32)>> {
        self.entries.get(candidate)
    }

    /// Candidates in first-seen order.
    pub fn candidates(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Final state of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// candidate -> slot
    pub assignment: HashMap<String, Slot>,
    /// day -> number of placed candidates
    pub daily_occupancy: HashMap<DayLabel, usize>,
    /// Candidates that had no consistent slot, in processing order
    pub skipped: Vec<String>,
    /// The processing order the run used
    pub order: Vec<String>,
}

impl ScheduleOutcome {
    pub fn placed_count(&self) -> usize {
        self.assignment.len()
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}
