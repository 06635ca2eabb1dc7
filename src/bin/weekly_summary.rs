// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly summary CLI
//!
//! Usage:
//! ```bash
//! # Summary from a markdown export
//! weekly-summary summary --profile athlete.json --export export.md --pretty
//!
//! # Summary from CSV tables at a fixed report time
//! weekly-summary summary --profile athlete.json --activities activities.csv \
//!     --routes routes.csv --sleep sleep.csv --now 2026-03-09T21:00:00-08:00
//!
//! # Record a new max heart rate
//! weekly-summary profile set --profile athlete.json --max-hr-running 192
//! ```

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use coach_summary::config::MAX_WINDOW_DAYS;
use coach_summary::models::{ClimbDiscipline, ProfileUpdate};
use coach_summary::services::ingest::{
    parse_markdown_export, read_activities_csv, read_attempts_csv, read_daily_stats_csv,
    read_readiness_csv, read_sleep_csv, read_vo2_max_csv,
};
use coach_summary::services::summary::DEFAULT_WINDOW_DAYS;
use coach_summary::services::{ProfileStore, SummaryInput, WeeklySummaryBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use validator::Validate;

#[derive(Parser)]
#[command(
    name = "weekly-summary",
    about = "Build weekly training summaries from tracker exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build a report and print it as JSON
    Summary(SummaryArgs),

    /// Athlete profile commands
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

#[derive(Args)]
struct SummaryArgs {
    /// Athlete profile JSON
    #[arg(long)]
    profile: PathBuf,

    /// Markdown export holding all tables
    #[arg(
        long,
        conflicts_with_all = ["activities", "routes", "boulders", "sleep", "readiness", "daily_stats", "vo2_max"]
    )]
    export: Option<PathBuf>,

    /// Activity summary CSV
    #[arg(long)]
    activities: Option<PathBuf>,

    /// Climbing route attempts CSV
    #[arg(long)]
    routes: Option<PathBuf>,

    /// Boulder problem attempts CSV
    #[arg(long)]
    boulders: Option<PathBuf>,

    /// Sleep summary CSV
    #[arg(long)]
    sleep: Option<PathBuf>,

    /// Training readiness CSV
    #[arg(long)]
    readiness: Option<PathBuf>,

    /// Daily stats CSV
    #[arg(long)]
    daily_stats: Option<PathBuf>,

    /// VO2 max CSV
    #[arg(long)]
    vo2_max: Option<PathBuf>,

    /// Report time (RFC3339, defaults to now)
    #[arg(long)]
    now: Option<String>,

    /// Past days listed before today
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    days: u32,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the current profile
    Show {
        #[arg(long)]
        profile: PathBuf,
    },

    /// Explicitly update profile values
    Set {
        #[arg(long)]
        profile: PathBuf,

        #[arg(long)]
        max_hr_running: Option<u16>,

        #[arg(long)]
        max_hr_cycling: Option<u16>,

        /// Overnight HRV baseline (ms)
        #[arg(long)]
        hrv_baseline: Option<f64>,

        /// Local UTC offset in minutes (e.g. -480)
        #[arg(long, allow_hyphen_values = true)]
        utc_offset_minutes: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("coach_summary=debug,weekly_summary=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Summary(args) => summary(args).await,
        Command::Profile { action } => profile(action).await,
    }
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn load_input(args: &SummaryArgs) -> anyhow::Result<SummaryInput> {
    if let Some(path) = &args.export {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(parse_markdown_export(&text)?.into_input());
    }

    let Some(activities) = &args.activities else {
        bail!("Either --export or --activities is required");
    };

    let mut input = SummaryInput {
        activities: read_activities_csv(open(activities)?)?,
        ..Default::default()
    };
    if let Some(path) = &args.routes {
        input
            .attempts
            .extend(read_attempts_csv(open(path)?, ClimbDiscipline::Route)?);
    }
    if let Some(path) = &args.boulders {
        input
            .attempts
            .extend(read_attempts_csv(open(path)?, ClimbDiscipline::Boulder)?);
    }
    if let Some(path) = &args.sleep {
        input.sleep = read_sleep_csv(open(path)?)?;
    }
    if let Some(path) = &args.readiness {
        input.readiness = read_readiness_csv(open(path)?)?;
    }
    if let Some(path) = &args.daily_stats {
        input.daily_stats = read_daily_stats_csv(open(path)?)?;
    }
    if let Some(path) = &args.vo2_max {
        input.vo2_max = read_vo2_max_csv(open(path)?)?;
    }
    Ok(input)
}

async fn summary(args: SummaryArgs) -> anyhow::Result<()> {
    if !(1..=MAX_WINDOW_DAYS).contains(&args.days) {
        bail!("--days must be between 1 and {}", MAX_WINDOW_DAYS);
    }
    let now = match &args.now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now timestamp: {}", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let store = ProfileStore::open(&args.profile).await?;
    let profile = store.current().await;
    let input = load_input(&args)?;

    let report = WeeklySummaryBuilder::new(&profile)
        .window_days(args.days)
        .build(&input, now);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}

async fn profile(action: ProfileCommand) -> anyhow::Result<()> {
    match action {
        ProfileCommand::Show { profile } => {
            let store = ProfileStore::open(&profile).await?;
            println!("{}", serde_json::to_string_pretty(&store.current().await)?);
        }
        ProfileCommand::Set {
            profile,
            max_hr_running,
            max_hr_cycling,
            hrv_baseline,
            utc_offset_minutes,
        } => {
            let update = ProfileUpdate {
                max_hr_running,
                max_hr_cycling,
                hrv_baseline_ms: hrv_baseline,
                utc_offset_minutes,
            };
            update.validate()?;
            if update.is_empty() {
                bail!("Nothing to update");
            }
            let store = ProfileStore::open(&profile).await?;
            let updated = store.update(&update).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
    }
    Ok(())
}
