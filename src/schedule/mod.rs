pub mod types;
pub mod slot_utils;
pub mod engine;

use std::collections::HashSet;

use tracing::info;

use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};

pub use engine::AssignmentEngine;
pub use slot_utils::{build_catalog, generate_time_list, interleave_slots};
pub use types::{AvailabilityTable, DayLabel, ScheduleOutcome, Slot};

/// Candidate lists longer than this are searched with the explicit stack
/// when the mode is `Auto`.
pub const RECURSION_LIMIT: usize = 2_000;

/// Which search driver to use. Both visit branches in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Auto,
    Recursive,
    Iterative,
}

/// Runs the assignment search over `slots` for `order` and returns the final
/// state, including the candidates that had to be skipped.
pub fn schedule_candidates(
    config: &SchedulerConfig,
    slots: &[Slot],
    availability: &AvailabilityTable,
    order: &[String],
    mode: SearchMode,
) -> Result<ScheduleOutcome> {
    config.validate()?;

    let mut seen = HashSet::with_capacity(order.len());
    for candidate in order {
        if !seen.insert(candidate.as_str()) {
            return Err(ScheduleError::DuplicateCandidate(candidate.clone()));
        }
    }

    let mut engine = AssignmentEngine::from_config(slots, availability, config);
    let iterative = match mode {
        SearchMode::Recursive => false,
        SearchMode::Iterative => true,
        SearchMode::Auto => order.len() > RECURSION_LIMIT,
    };
    // Skipping guarantees the search always reaches its end
    let solved = if iterative {
        engine.solve_iterative(order, 0)
    } else {
        engine.solve(order, 0)
    };

    let outcome = engine.into_outcome(order);
    info!(
        solved,
        candidates = order.len(),
        placed = outcome.placed_count(),
        skipped = outcome.skipped.len(),
        slots = slots.len(),
        "assignment search finished"
    );
    Ok(outcome)
}

/// Builds the catalog from `config` and schedules every candidate in the
/// availability table, in the order they were loaded.
pub fn schedule_all(
    config: &SchedulerConfig,
    availability: &AvailabilityTable,
    mode: SearchMode,
) -> Result<ScheduleOutcome> {
    let slots = build_catalog(config);
    schedule_candidates(config, &slots, availability, availability.candidates(), mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_candidates_are_rejected() {
        let config = SchedulerConfig::default();
        let slots = build_catalog(&config);
        let availability = AvailabilityTable::new();
        let order = vec!["a".to_string(), "b".to_string(), "a".to_string()];

        let err = schedule_candidates(&config, &slots, &availability, &order, SearchMode::Auto).unwrap_err();
        assert!(matches!(err, ScheduleError::DuplicateCandidate(ref c) if c == "a"));
    }

    #[test]
    fn invalid_config_is_rejected_before_search() {
        let mut config = SchedulerConfig::default();
        config.daily_limit = 0;
        let availability = AvailabilityTable::new();
        assert!(schedule_all(&config, &availability, SearchMode::Auto).is_err());
    }

    #[test]
    fn single_friday_candidate_lands_in_first_friday_slot() {
        let config = SchedulerConfig::default();
        let mut availability = AvailabilityTable::new();
        availability.insert("xxx", "1/16(금)", 17);
        availability.insert("xxx", "1/16(금)", 19);

        let outcome = schedule_all(&config, &availability, SearchMode::Recursive).unwrap();
        let slot = &outcome.assignment["xxx"];
        assert_eq!(slot.to_string(), "1/16(금) 17:00");
        assert_eq!(outcome.daily_occupancy[&DayLabel::from("1/16(금)")], 1);
        assert_eq!(outcome.daily_occupancy[&DayLabel::from("1/17(토)")], 0);
        assert!(outcome.skipped.is_empty());
    }
}
