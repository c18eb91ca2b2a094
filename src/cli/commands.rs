//! Command runners for the ecofi-ace CLI.

use super::{Args, Command, default_output_path};
use crate::ace::AceDataset;
use crate::config::MdbToolsConfig;
use crate::constants::{DAILY_TABLE, STATION_TABLE};
use crate::models::TranslationStats;
use crate::source::{Database, MdbTools};
use crate::translator::{self, EcofiTranslator};
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run the selected command
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Arguments: {:?}", args);

    let mut config = MdbToolsConfig::default();
    if let Some(dir) = &args.mdbtools_dir {
        config = config.with_tools_dir(dir);
    }
    let backend = MdbTools::new(config);

    match args.command {
        Some(Command::Convert {
            database,
            output,
            pretty,
        }) => run_convert(backend, &database, output, pretty),
        Some(Command::Check { database }) => run_check(backend, &database),
        Some(Command::Tables { database }) => run_tables(&backend, &database),
        None => Ok(()),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ecofi_ace={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn run_convert(
    backend: MdbTools,
    database: &Path,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let (dataset, stats) = EcofiTranslator::new(backend).read_with_stats(database);

    let output = output.unwrap_or_else(|| default_output_path(database));
    dataset
        .write_json_file(&output, pretty)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_summary(database, &dataset, &stats);
    println!("  {} {}", "Output:".bright_cyan(), output.display());

    finish(&stats)
}

fn run_check(backend: MdbTools, database: &Path) -> Result<()> {
    let (dataset, stats) = EcofiTranslator::new(backend).read_with_stats(database);

    let mut buffer = Vec::new();
    dataset
        .write_json(&mut buffer, false)
        .context("Failed to serialize dataset")?;

    print_summary(database, &dataset, &stats);
    println!(
        "  {} {} bytes",
        "Serialized:".bright_cyan(),
        buffer.len().to_string().bright_white()
    );

    finish(&stats)
}

fn run_tables(backend: &MdbTools, database: &Path) -> Result<()> {
    let handle = translator::open(backend, database)
        .with_context(|| format!("Unable to open {}", database.display()))?;
    let names = handle
        .table_names()
        .with_context(|| format!("Unable to list tables of {}", database.display()))?;

    println!(
        "{} {}",
        "Tables in".bright_green().bold(),
        database.display()
    );
    for name in &names {
        if name == STATION_TABLE || name == DAILY_TABLE {
            println!("  {}", name.bright_white().bold());
        } else {
            println!("  {}", name);
        }
    }

    if !translator::has_weather_tables(Some(&handle)) {
        println!(
            "{}",
            format!("Missing weather tables: need {STATION_TABLE} and {DAILY_TABLE}").bright_red()
        );
    }
    Ok(())
}

fn print_summary(database: &Path, dataset: &AceDataset, stats: &TranslationStats) {
    println!("\n{}", "Translation Summary".bright_green().bold());
    println!("  {} {}", "Database:".bright_cyan(), database.display());
    println!(
        "  {} {}",
        "Weather stations:".bright_cyan(),
        dataset.len().to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Daily records:".bright_cyan(),
        dataset.daily_record_count().to_string().bright_white()
    );
    if stats.stations_skipped > 0 {
        println!(
            "  {} {}",
            "Rows without station code:".bright_yellow(),
            stats.stations_skipped.to_string().bright_yellow()
        );
    }
    if let Some(failure) = stats.failure {
        println!(
            "  {} {}",
            "Stopped early:".bright_red(),
            failure.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
}

fn finish(stats: &TranslationStats) -> Result<()> {
    match stats.failure {
        Some(failure) => anyhow::bail!("Translation stopped early: {failure}"),
        None => Ok(()),
    }
}
