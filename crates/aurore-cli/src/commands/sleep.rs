//! Sleep tracking commands for CLI.

use aurore_core::SleepTracker;
use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use super::{load_config, open_store, parse_time, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SleepAction {
    /// Start a sleep session
    Start {
        /// Start time as "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Stop the running session and record the night
    Stop {
        /// Stop time as "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Show whether a session is running
    Status,
    /// List recorded nights
    Log {
        /// Only this month, as YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SleepAction) -> CmdResult {
    let config = load_config();
    let db = open_store()?;
    let tracker = SleepTracker::with_thresholds(&db, config.quality_thresholds());

    match action {
        SleepAction::Start { at } => {
            let state = tracker.start(parse_time(at.as_deref())?)?;
            if let Some(since) = state.start_time {
                println!("Sleep tracking started at {}", since.format("%Y-%m-%d %H:%M"));
            }
        }
        SleepAction::Stop { at } => {
            let record = tracker.stop(parse_time(at.as_deref())?)?;
            println!(
                "{}: {} hours ({}), {} -> {}",
                record.date, record.hours, record.quality, record.bedtime, record.wakeup_time
            );
        }
        SleepAction::Status => {
            let state = tracker.state()?;
            match state.running_since() {
                Some(since) => println!("Tracking since {}", since.format("%Y-%m-%d %H:%M")),
                None => println!("Not tracking"),
            }
        }
        SleepAction::Log { month, json } => {
            let log = tracker.log()?;
            let records = match month {
                Some(raw) => {
                    let first = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                        .map_err(|e| format!("invalid month '{raw}' (expected YYYY-MM): {e}"))?;
                    log.month(first.year(), first.month())
                }
                None => log.iter().collect(),
            };

            if json {
                print_json(&records)?;
            } else if records.is_empty() {
                println!("No sleep recorded.");
            } else {
                for r in records {
                    println!(
                        "{}  {:>4.1} h  {:<9}  {} -> {}",
                        r.date, r.hours, r.quality.to_string(), r.bedtime, r.wakeup_time
                    );
                }
            }
        }
    }
    Ok(())
}
