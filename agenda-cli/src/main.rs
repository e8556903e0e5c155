mod commands;
mod render;

use std::path::{Path, PathBuf};

use agenda_core::clock::Clock;
use agenda_core::config::AgendaConfig;
use agenda_core::date_range::{parse_date, DateRange};
use agenda_core::event::Event;
use agenda_core::record::load_records;
use agenda_core::week::Week;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Inspect how stored events expand into occurrences and pack into calendar weeks")]
struct Cli {
    /// Events file (JSON array of event rows), overrides the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the occurrences touching a date range
    Expand {
        /// First day (YYYY-MM-DD), defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,

        /// Last day (YYYY-MM-DD), defaults to 30 days ahead
        #[arg(long)]
        to: Option<String>,
    },
    /// List the occurrences on one day
    Day {
        /// Day to show (YYYY-MM-DD), defaults to today
        date: Option<String>,
    },
    /// Show row placements and hidden counts for one week
    Week {
        /// Any day in the week (YYYY-MM-DD), defaults to today
        date: Option<String>,

        /// Rows per week, overrides the configured row capacity
        #[arg(short, long)]
        rows: Option<usize>,
    },
    /// Show row placements and hidden counts for every week of a month grid
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        month: Option<String>,

        /// Rows per week, overrides the configured row capacity
        #[arg(short, long)]
        rows: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AgendaConfig::load()?;
    let clock = config.clock()?;

    let events_path = cli.file.clone().unwrap_or_else(|| config.events_path());
    let events = load_events(&events_path)?;
    tracing::debug!(path = %events_path.display(), count = events.len(), "Loaded events");

    match cli.command {
        Commands::Expand { from, to } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref(), &clock)?;
            if !range.is_valid() {
                anyhow::bail!("--from must not be after --to");
            }
            commands::expand::run(&events, &range, &clock, cli.json)
        }
        Commands::Day { date } => {
            let date = resolve_date(date.as_deref(), &clock)?;
            commands::day::run(&events, date, cli.json)
        }
        Commands::Week { date, rows } => {
            let week = Week::containing(resolve_date(date.as_deref(), &clock)?);
            let rows = rows.unwrap_or(config.row_capacity);
            commands::week::run(&events, &week, rows, cli.json)
        }
        Commands::Month { month, rows } => {
            let (year, month) = resolve_month(month.as_deref(), &clock)?;
            let rows = rows.unwrap_or(config.row_capacity);
            commands::month::run(&events, year, month, rows, cli.json)
        }
    }
}

fn load_events(path: &Path) -> Result<Vec<Event>> {
    if !path.exists() {
        anyhow::bail!(
            "No events file at {}.\n\n\
            Point agenda at one with:\n  \
            agenda --file <events.json> <command>\n\n\
            or set events_file in {}",
            path.display(),
            AgendaConfig::config_path()?.display()
        );
    }

    Ok(load_records(path)?)
}

fn resolve_date(arg: Option<&str>, clock: &impl Clock) -> Result<NaiveDate> {
    match arg {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(clock.today()),
    }
}

/// Parse YYYY-MM, defaulting to the clock's current month
fn resolve_month(arg: Option<&str>, clock: &impl Clock) -> Result<(i32, u32)> {
    let Some(s) = arg else {
        let today = clock.today();
        return Ok((today.year(), today.month()));
    };

    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid month '{}'. Expected YYYY-MM", s))?;
    Ok((first.year(), first.month()))
}
