use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveTime;
use serde::Serialize;

use crate::error::Result;
use crate::schedule::{DayLabel, ScheduleOutcome};

/// One day of the final schedule, times ascending
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub day: DayLabel,
    pub slots: Vec<(String, Vec<String>)>,
    pub total: usize,
}

/// Groups the assignment by day (in `days` order) and time. Candidates inside
/// a slot are listed in processing order.
pub fn group_by_day(outcome: &ScheduleOutcome, days: &[DayLabel]) -> Vec<DayReport> {
    days.iter()
        .map(|day| {
            let mut by_time: BTreeMap<NaiveTime, Vec<String>> = BTreeMap::new();
            for candidate in &outcome.order {
                if let Some(slot) = outcome.assignment.get(candidate) {
                    if &slot.day == day {
                        by_time.entry(slot.time).or_default().push(candidate.clone());
                    }
                }
            }
            DayReport {
                day: day.clone(),
                slots: by_time
                    .into_iter()
                    .map(|(time, names)| (time.format("%H:%M").to_string(), names))
                    .collect(),
                total: outcome.daily_occupancy.get(day).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Renders the report as plain text
pub fn format_schedule(outcome: &ScheduleOutcome, days: &[DayLabel]) -> String {
    let mut out = String::new();
    for report in group_by_day(outcome, days) {
        out.push_str(&format!("\n--- {} ---\n", report.day));
        for (time, names) in &report.slots {
            out.push_str(&format!("{}: {}\n", time, names.join(", ")));
        }
        out.push_str(&format!("Total: {}\n", report.total));
    }

    if !outcome.skipped.is_empty() {
        out.push_str(&format!("\nUnassigned candidates ({}):\n", outcome.skipped.len()));
        for candidate in &outcome.skipped {
            out.push_str(&format!("  - {}\n", candidate));
        }
    }
    out
}

/// Prints a schedule in a readable format
pub fn print_schedule(outcome: &ScheduleOutcome, days: &[DayLabel]) {
    print!("{}", format_schedule(outcome, days));
}

/// Writes the plain-text schedule to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(
    outcome: &ScheduleOutcome,
    days: &[DayLabel],
    path: P,
) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(format_schedule(outcome, days).as_bytes())?;
    Ok(())
}

/// Writes the grouped schedule and the skipped list as JSON
pub fn write_schedule_json<P: AsRef<Path>>(
    outcome: &ScheduleOutcome,
    days: &[DayLabel],
    path: P,
) -> Result<()> {
    #[derive(Serialize)]
    struct Export<'a> {
        days: Vec<DayReport>,
        skipped: &'a [String],
    }

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(
        writer,
        &Export {
            days: group_by_day(outcome, days),
            skipped: &outcome.skipped,
        },
    )?;
    Ok(())
}
