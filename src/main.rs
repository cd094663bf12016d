//! CLI entry point for bikeshare-stats.
//!
//! Provides an interactive prompt loop (the default), a one-shot `query` subcommand and a
//! `batch` subcommand that runs the same selection against every city in parallel.

mod prompt;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bikeshare_stats::calendar::{DaySelector, MonthSelector};
use bikeshare_stats::ingestion::{
    has_all_sources, CitySource, CompositeObserver, FileObserver, LoadObserver, LoadOptions,
    TracingObserver,
};
use bikeshare_stats::pipeline::{all_cities, run_batch, run_query, Query};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bikeshare-stats")]
#[command(about = "Descriptive statistics over US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Also append load events to this file
    #[arg(long, global = true, env = "BIKESHARE_LOAD_LOG")]
    load_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for city, month and day, show statistics, and offer to restart
    Interactive,
    /// Compute statistics for one city
    Query {
        /// chicago, "new york city" or washington
        #[arg(short, long)]
        city: CitySource,

        /// all, or january through june
        #[arg(short, long, default_value = "all")]
        month: MonthSelector,

        /// all, or a weekday name
        #[arg(short, long, default_value = "all")]
        day: DaySelector,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compute statistics for every city in parallel
    Batch {
        #[arg(short, long, default_value = "all")]
        month: MonthSelector,

        #[arg(short, long, default_value = "all")]
        day: DaySelector,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli);
    if !has_all_sources(&options.data_dir) {
        warn!(
            data_dir = %options.data_dir.display(),
            "data directory does not contain every city file"
        );
    }

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            prompt::run(&mut stdin.lock(), &mut stdout.lock(), &options)?;
        }
        Commands::Query {
            city,
            month,
            day,
            json,
        } => {
            let query = Query::new(city, month, day);
            let outcome = run_query(&query, &options)
                .with_context(|| format!("query failed for {city} (month={month}, day={day})"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", render::outcome(&outcome));
            }
        }
        Commands::Batch { month, day, json } => {
            let queries = all_cities(month, day);
            let results = run_batch(&queries, &options);
            let mut failures = 0usize;
            for (query, result) in queries.iter().zip(results) {
                match result {
                    Ok(outcome) if json => println!("{}", serde_json::to_string(&outcome)?),
                    Ok(outcome) => print!("{}", render::outcome(&outcome)),
                    Err(e) => {
                        failures += 1;
                        warn!(source = %query.source, error = %e, "batch query failed");
                    }
                }
            }
            info!(queries = queries.len(), failures, "batch finished");
            if failures == queries.len() {
                anyhow::bail!("every batch query failed");
            }
        }
    }

    Ok(())
}

fn load_options(cli: &Cli) -> LoadOptions {
    let tracing_observer: Arc<dyn LoadObserver> = Arc::new(TracingObserver);
    let observer: Arc<dyn LoadObserver> = match &cli.load_log {
        Some(path) => Arc::new(CompositeObserver::new(vec![
            tracing_observer,
            Arc::new(FileObserver::new(path)),
        ])),
        None => tracing_observer,
    };
    LoadOptions {
        observer: Some(observer),
        ..LoadOptions::with_data_dir(&cli.data_dir)
    }
}
