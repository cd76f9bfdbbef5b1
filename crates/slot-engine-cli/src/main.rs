//! slotctl - query appointment-slot availability from a schedule snapshot.
//!
//! Results go to stdout (plain status strings or JSON); logs go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{
    format_for_external_calendar, parse_date, parse_time, resolve_wall_clock, Schedule,
    PLATFORM_TIMEZONE,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// slotctl - appointment-slot availability
#[derive(Parser, Debug)]
#[command(name = "slotctl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the status of the slot starting at DATE TIME
    Status {
        /// Path to the schedule JSON document
        #[arg(short, long)]
        schedule: PathBuf,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Wall-clock start time (HH:MM)
        #[arg(long)]
        time: String,
    },

    /// Print the slot grid of one date as JSON
    Day {
        /// Path to the schedule JSON document
        #[arg(short, long)]
        schedule: PathBuf,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },

    /// Print the first available slot in a date range as JSON
    Next {
        /// Path to the schedule JSON document
        #[arg(short, long)]
        schedule: PathBuf,
        /// First date searched (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last date searched, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Convert a wall-clock date and time to an absolute instant
    ToUtc {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Wall-clock time (HH:MM)
        #[arg(long)]
        time: String,
        /// IANA timezone of the wall clock
        #[arg(long, default_value = PLATFORM_TIMEZONE)]
        timezone: String,
    },

    /// Print zone-less start/end stamps for an external calendar push
    Gcal {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Wall-clock start time (HH:MM)
        #[arg(long)]
        time: String,
        /// Appointment length in minutes
        #[arg(long)]
        duration: i64,
        /// IANA timezone the calendar should read the stamps in
        #[arg(long, default_value = PLATFORM_TIMEZONE)]
        timezone: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Status {
            schedule,
            date,
            time,
        } => {
            let schedule = load_schedule(&schedule)?;
            let status = schedule.status_at(parse_date(&date)?, parse_time(&time)?);
            tracing::info!(%date, %time, %status, "slot status");
            println!("{status}");
        }
        Commands::Day { schedule, date } => {
            let schedule = load_schedule(&schedule)?;
            print_json(&schedule.day(parse_date(&date)?))?;
        }
        Commands::Next { schedule, from, to } => {
            let schedule = load_schedule(&schedule)?;
            match schedule.first_available(parse_date(&from)?, parse_date(&to)?) {
                Some(slot) => print_json(&slot)?,
                None => {
                    eprintln!("no available slot between {from} and {to}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::ToUtc {
            date,
            time,
            timezone,
        } => {
            print_json(&resolve_wall_clock(&date, &time, &timezone)?)?;
        }
        Commands::Gcal {
            date,
            time,
            duration,
            timezone,
        } => {
            print_json(&format_for_external_calendar(
                &date, &time, duration, &timezone,
            )?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_schedule(path: &Path) -> Result<Schedule> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule {}", path.display()))?;
    Schedule::from_json(&raw).with_context(|| format!("failed to load schedule {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
