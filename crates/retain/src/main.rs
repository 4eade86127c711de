//! Retain - E-commerce retention, funnel and revenue reports
//!
//! # Usage
//!
//! ```bash
//! # Print a report
//! retain report cohort --data data/
//! retain report funnel-by-source --format json
//!
//! # Write every report as CSV
//! retain export --out reports/
//!
//! # Ad-hoc SQL over the loaded tables
//! retain query "SELECT status, COUNT(*) FROM orders GROUP BY status"
//! ```

mod cmd;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retain_config::{Config, LogConfig, LogFormat, LogLevel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Retain - E-commerce retention, funnel and revenue reports
#[derive(Parser, Debug)]
#[command(name = "retain")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute and print one report
    Report(cmd::report::ReportArgs),

    /// Write every report as CSV into a directory
    Export(cmd::export::ExportArgs),

    /// Execute a read-only SQL query against the input tables
    Query(cmd::query::QueryArgs),

    /// List input tables with row counts and columns
    Tables(cmd::tables::TablesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log = resolve_log_config(cli.log_level.as_deref(), &config.log)?;
    init_logging(&log)?;

    match cli.command {
        Command::Report(args) => cmd::report::run(args, &config).await,
        Command::Export(args) => cmd::export::run(args, &config).await,
        Command::Query(args) => cmd::query::run(args, &config).await,
        Command::Tables(args) => cmd::tables::run(args, &config).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("failed to load config")
}

/// Resolve log settings: CLI flag > config file > default "info"
fn resolve_log_config(cli_level: Option<&str>, config: &LogConfig) -> Result<LogConfig> {
    let mut log = config.clone();
    if let Some(level) = cli_level {
        log.level = level
            .parse::<LogLevel>()
            .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;
    }
    Ok(log)
}

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr; stdout carries report output only.
fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(log.directive())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let (console, json) = match log.format {
        LogFormat::Console => (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(json)
        .init();

    Ok(())
}
