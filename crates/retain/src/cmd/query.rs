//! Query command - Execute SQL queries against the input tables
//!
//! The five CSV tables are registered under their file names (`events`,
//! `users`, `orders`, `order_items`, `products`). Only read-only
//! statements are accepted.
//!
//! # Usage
//!
//! ```bash
//! retain query "SELECT * FROM orders LIMIT 10"
//! retain query "SELECT traffic_source, COUNT(*) FROM events GROUP BY traffic_source" --format json
//! retain query "SELECT * FROM users WHERE age IS NULL" --format csv
//! ```

use anyhow::{Context, Result};
use clap::Args;
use retain_config::Config;
use retain_query::{OutputFormat, QueryEngine};

use super::{DataArgs, output};

/// Query command arguments
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL query to execute (SELECT only)
    #[arg(value_name = "SQL")]
    pub sql: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the query command
pub async fn run(args: QueryArgs, config: &Config) -> Result<()> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid format: {}", e))?;

    let engine = QueryEngine::from_data_dir(args.data.dir(config));

    let result = engine
        .query(&args.sql)
        .await
        .context("query execution failed")?;

    output::print_result(&result, format)?;

    eprintln!(
        "\n{} row(s) in {}ms [{}]",
        result.row_count,
        result.execution_time_ms,
        engine.backend_name()
    );

    Ok(())
}
