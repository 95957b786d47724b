use std::collections::{HashMap, HashSet};
use std::fs;

use interview_scheduler::display::{write_schedule_json, write_schedule_to_file};
use interview_scheduler::generator::{write_availability_csv, AvailabilityGenerator, GeneratorConfig};
use interview_scheduler::parser::load_availability;
use interview_scheduler::{
    build_catalog, schedule_all, schedule_candidates, AvailabilityTable, DayLabel, ScheduleOutcome,
    SchedulerConfig, SearchMode, Slot,
};
use tempfile::TempDir;

fn assert_outcome_invariants(
    outcome: &ScheduleOutcome,
    config: &SchedulerConfig,
    slots: &[Slot],
    availability: &AvailabilityTable,
) {
    let mut per_slot: HashMap<&Slot, usize> = HashMap::new();
    for slot in outcome.assignment.values() {
        *per_slot.entry(slot).or_insert(0) += 1;
    }
    for (slot, count) in &per_slot {
        assert!(*count <= config.total_cap_per_slot, "{slot} over capacity");
        assert!(slots.contains(slot), "{slot} is not in the catalog");
    }

    for day in config.day_labels() {
        let placed = outcome.assignment.values().filter(|s| s.day == day).count();
        let total = outcome.daily_occupancy.get(&day).copied().unwrap_or(0);
        assert_eq!(placed, total, "daily total of {day}");
        assert!(total <= config.daily_limit);
    }

    for (candidate, slot) in &outcome.assignment {
        assert!(availability.is_available(candidate, &slot.day, slot.hour()));
    }

    // every candidate is either placed or skipped, never both
    let skipped: HashSet<&String> = outcome.skipped.iter().collect();
    for candidate in &outcome.order {
        assert_ne!(outcome.assignment.contains_key(candidate), skipped.contains(candidate));
    }
}

#[test]
fn csv_file_to_schedule_files() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("availability.csv");
    fs::write(
        &csv_path,
        "candidate,day,hours\n\
         kim,1/16(금),\"17, 19\"\n\
         lee,1/16(금),17\n\
         park,1/17(토),10\n\
         choi,,\n",
    )
    .unwrap();

    let config = SchedulerConfig::default();
    let table = load_availability(&csv_path).unwrap();
    let outcome = schedule_all(&config, &table, SearchMode::Auto).unwrap();

    assert_eq!(outcome.assignment["kim"].to_string(), "1/16(금) 17:00");
    assert_eq!(outcome.assignment["lee"], outcome.assignment["kim"]);
    assert_eq!(outcome.assignment["park"].to_string(), "1/17(토) 10:00");
    assert_eq!(outcome.skipped, vec!["choi".to_string()]);
    assert_outcome_invariants(&outcome, &config, &build_catalog(&config), &table);

    let days = config.day_labels();
    let text_path = dir.path().join("schedule.txt");
    write_schedule_to_file(&outcome, &days, &text_path).unwrap();
    let text = fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("--- 1/16(금) ---\n17:00: kim, lee\nTotal: 2"));
    assert!(text.contains("  - choi"));

    let json_path = dir.path().join("schedule.json");
    write_schedule_json(&outcome, &days, &json_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["skipped"][0], "choi");
    assert_eq!(json["days"][2]["total"], 2);
}

#[test]
fn config_file_controls_days_and_limits() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{
            "days": [
                {"label": "mon", "start_hour": 9, "end_hour": 10},
                {"label": "tue", "start_hour": 9, "end_hour": 10}
            ],
            "daily_limit": 2
        }"#,
    )
    .unwrap();
    let config = SchedulerConfig::load(&config_path).unwrap();

    let mut table = AvailabilityTable::new();
    for name in ["a", "b", "c", "d", "e"] {
        table.insert(name, "mon", 9);
        table.insert(name, "tue", 9);
    }
    let outcome = schedule_all(&config, &table, SearchMode::Recursive).unwrap();

    let mon = DayLabel::from("mon");
    let tue = DayLabel::from("tue");
    assert_eq!(outcome.daily_occupancy[&mon], 2);
    assert_eq!(outcome.daily_occupancy[&tue], 2);
    assert_eq!(outcome.assignment["a"].day, mon);
    assert_eq!(outcome.assignment["b"].day, mon);
    assert_eq!(outcome.assignment["c"].day, tue);
    assert_eq!(outcome.skipped, vec!["e".to_string()]);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{"days": [{"label": "mon", "start_hour": 11, "end_hour": 10}]}"#,
    )
    .unwrap();
    assert!(SchedulerConfig::load(&config_path).is_err());
}

#[test]
fn generated_population_respects_every_invariant() {
    let config = SchedulerConfig::default();
    let slots = build_catalog(&config);

    for seed in 0..10 {
        let generator_config = GeneratorConfig {
            candidates: 60,
            max_entries: 5,
            unavailable_fraction: 0.1,
            seed,
        };
        let table = AvailabilityGenerator::new(generator_config, &config).generate();
        let order = table.candidates().to_vec();

        let recursive = schedule_candidates(&config, &slots, &table, &order, SearchMode::Recursive).unwrap();
        let iterative = schedule_candidates(&config, &slots, &table, &order, SearchMode::Iterative).unwrap();

        assert_outcome_invariants(&recursive, &config, &slots, &table);
        assert_eq!(recursive.assignment, iterative.assignment);
        assert_eq!(recursive.skipped, iterative.skipped);
    }
}

#[test]
fn processing_order_changes_who_is_skipped() {
    let config = SchedulerConfig {
        days: vec![interview_scheduler::DayWindow {
            label: DayLabel::from("D1"),
            start_hour: 9,
            end_hour: 10,
            skip_hour: None,
        }],
        total_cap_per_slot: 2,
        daily_limit: 3,
    };
    let slots = build_catalog(&config);
    let mut table = AvailabilityTable::new();
    for name in ["A", "B", "C", "D"] {
        table.insert(name, "D1", 9);
    }

    let forward: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
    let backward: Vec<String> = forward.iter().rev().cloned().collect();

    let first = schedule_candidates(&config, &slots, &table, &forward, SearchMode::Auto).unwrap();
    let second = schedule_candidates(&config, &slots, &table, &backward, SearchMode::Auto).unwrap();

    assert_eq!(first.skipped, vec!["D".to_string()]);
    assert_eq!(second.skipped, vec!["A".to_string()]);
    assert_eq!(first.assignment["A"].to_string(), "D1 09:00");
    assert_eq!(first.assignment["C"].to_string(), "D1 09:30");
}

#[test]
fn generated_csv_loads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("generated.csv");
    let config = SchedulerConfig::default();
    let table = AvailabilityGenerator::new(GeneratorConfig::default(), &config).generate();
    write_availability_csv(&table, &config, fs::File::create(&path).unwrap()).unwrap();

    let loaded = load_availability(&path).unwrap();
    assert_eq!(loaded.candidates(), table.candidates());
}
