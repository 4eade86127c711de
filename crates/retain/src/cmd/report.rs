//! Report command - Compute one report and print it
//!
//! # Usage
//!
//! ```bash
//! retain report cohort
//! retain report matrix --data data/ --format csv
//! retain report funnel-by-device --format json
//! retain report summary
//! ```

use anyhow::{Context, Result};
use clap::Args;
use retain_analytics::ReportKind;
use retain_config::Config;
use retain_query::OutputFormat;

use super::{DataArgs, output, report_engine};

/// Report command arguments
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Report to compute (cohort, matrix, funnel, funnel-rates, funnel-by-source,
    /// funnel-by-device, trend, segments, quality, duplicates, outliers, summary)
    #[arg(value_name = "REPORT")]
    pub report: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the report command
pub async fn run(args: ReportArgs, config: &Config) -> Result<()> {
    let kind: ReportKind = args.report.parse()?;
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid format: {}", e))?;

    let engine = report_engine(&args.data, config)?;
    let result = engine
        .run(kind)
        .with_context(|| format!("{} report failed", kind))?;

    output::print_result(&result, format)?;

    eprintln!(
        "\n{} row(s) in {}ms [{}]",
        result.row_count, result.execution_time_ms, kind
    );

    Ok(())
}
