//! Synthetic availability generator.
//!
//! Produces reproducible availability tables for demos and stress runs, and
//! exports tables in the CSV layout the parser reads.

use std::io::Write;

use csv::WriterBuilder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::schedule::types::AvailabilityTable;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of candidates to create
    pub candidates: usize,
    /// Upper bound on (day, hour) entries per candidate
    pub max_entries: usize,
    /// Fraction of candidates left with no availability at all
    pub unavailable_fraction: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            candidates: 39,
            max_entries: 4,
            unavailable_fraction: 0.0,
            seed: 42,
        }
    }
}

pub struct AvailabilityGenerator<'a> {
    config: GeneratorConfig,
    scheduler: &'a SchedulerConfig,
    rng: StdRng,
}

impl<'a> AvailabilityGenerator<'a> {
    pub fn new(config: GeneratorConfig, scheduler: &'a SchedulerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, scheduler, rng }
    }

    /// Candidates are named `candidate-01`, `candidate-02`, ... and only get
    /// hours that fall inside a configured day window.
    pub fn generate(&mut self) -> AvailabilityTable {
        let scheduler = self.scheduler;
        let windows: Vec<(&str, u32)> = scheduler
            .days
            .iter()
            .flat_map(|day| {
                (day.start_hour..day.end_hour)
                    .filter(move |h| Some(*h) != day.skip_hour)
                    .map(move |h| (day.label.as_str(), h))
            })
            .collect();

        let width = self.config.candidates.to_string().len().max(2);
        let mut table = AvailabilityTable::new();
        for i in 1..=self.config.candidates {
            let name = format!("candidate-{:0width$}", i, width = width);
            table.add_candidate(&name);

            if windows.is_empty() || self.rng.gen_bool(self.config.unavailable_fraction.clamp(0.0, 1.0)) {
                continue;
            }
            let entries = self.rng.gen_range(1..=self.config.max_entries.max(1));
            for _ in 0..entries {
                let (day, hour) = windows[self.rng.gen_range(0..windows.len())];
                table.insert(&name, day, hour);
            }
        }
        table
    }
}

/// Writes `table` as `candidate,day,hours` rows, one row per candidate and
/// day, days in configuration order.
pub fn write_availability_csv<W: Write>(
    table: &AvailabilityTable,
    config: &SchedulerConfig,
    writer: W,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["candidate", "day", "hours"])?;

    for candidate in table.candidates() {
        let Some(entries) = table.get(candidate) else {
            continue;
        };
        if entries.is_empty() {
            wtr.write_record([candidate.as_str(), "", ""])?;
            continue;
        }
        for label in config.day_labels() {
            let mut hours: Vec<u32> = entries
                .iter()
                .filter(|(day, _)| *day == label)
                .map(|(_, hour)| *hour)
                .collect();
            if hours.is_empty() {
                continue;
            }
            hours.sort_unstable();
            let hours_str = hours.iter().map(|h| h.to_string()).collect::<Vec<_>>().join(", ");
            wtr.write_record([candidate.as_str(), label.as_str(), hours_str.as_str()])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
