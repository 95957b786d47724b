//! Interview slot scheduler.
//!
//! Assigns candidates to half-hour interview slots across several days with a
//! backtracking search that prefers filling a slot to two people before
//! opening a new one.

pub mod config;
pub mod display;
pub mod error;
pub mod generator;
pub mod parser;
pub mod schedule;

pub use config::{DayWindow, SchedulerConfig};
pub use error::{Result, ScheduleError};
pub use schedule::{
    build_catalog, schedule_all, schedule_candidates, AssignmentEngine, AvailabilityTable, DayLabel,
    ScheduleOutcome, SearchMode, Slot,
};
