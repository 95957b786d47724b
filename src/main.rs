use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use interview_scheduler::display::{print_schedule, write_schedule_json, write_schedule_to_file};
use interview_scheduler::generator::{write_availability_csv, AvailabilityGenerator, GeneratorConfig};
use interview_scheduler::parser::load_availability;
use interview_scheduler::{build_catalog, schedule_all, SchedulerConfig, SearchMode};

#[derive(Parser)]
#[command(name = "interview-scheduler")]
#[command(about = "Pair candidates into interview slots across several days")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scheduler configuration (JSON). Uses the built-in three-day calendar when omitted.
    #[arg(long, short, global = true, env = "SCHEDULER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Auto,
    Recursive,
    Iterative,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => SearchMode::Auto,
            ModeArg::Recursive => SearchMode::Recursive,
            ModeArg::Iterative => SearchMode::Iterative,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the interleaved slot catalog in search order.
    Slots,

    /// Assign candidates from an availability file and print the schedule.
    Solve {
        /// Availability file (.csv with candidate,day,hours or .json)
        availability: PathBuf,
        /// Override the per-slot capacity
        #[arg(long)]
        capacity: Option<usize>,
        /// Override the per-day limit
        #[arg(long)]
        daily_limit: Option<usize>,
        /// Search driver
        #[arg(long, value_enum, default_value = "auto")]
        mode: ModeArg,
        /// Also write the text schedule to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the schedule as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Write a synthetic availability CSV.
    Generate {
        /// Number of candidates
        #[arg(short = 'n', long, default_value = "39")]
        candidates: usize,
        /// Maximum (day, hour) entries per candidate
        #[arg(long, default_value = "4")]
        max_entries: usize,
        /// Fraction of candidates with no availability
        #[arg(long, default_value = "0.0")]
        unavailable: f64,
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Output CSV path
        #[arg(short, long, default_value = "data/availability.csv")]
        output: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SchedulerConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Slots => {
            for (i, slot) in build_catalog(&config).iter().enumerate() {
                println!("{:>3}  {}", i + 1, slot);
            }
        }

        Commands::Solve {
            availability,
            capacity,
            daily_limit,
            mode,
            output,
            json,
        } => {
            if let Some(capacity) = capacity {
                config.total_cap_per_slot = capacity;
            }
            if let Some(limit) = daily_limit {
                config.daily_limit = limit;
            }
            config.validate().context("invalid scheduler parameters")?;

            let table = load_availability(&availability)
                .with_context(|| format!("failed to load availability from {}", availability.display()))?;
            info!(candidates = table.len(), "loaded availability");

            let outcome = schedule_all(&config, &table, mode.into())?;
            let days = config.day_labels();
            print_schedule(&outcome, &days);

            if let Some(path) = output {
                write_schedule_to_file(&outcome, &days, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "schedule written");
            }
            if let Some(path) = json {
                write_schedule_json(&outcome, &days, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "schedule json written");
            }
        }

        Commands::Generate {
            candidates,
            max_entries,
            unavailable,
            seed,
            output,
        } => {
            let generator_config = GeneratorConfig {
                candidates,
                max_entries,
                unavailable_fraction: unavailable,
                seed,
            };
            let table = AvailabilityGenerator::new(generator_config, &config).generate();

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            write_availability_csv(&table, &config, file)?;
            info!(candidates, path = %output.display(), "availability written");
        }
    }

    Ok(())
}
