//! Tables command - List the input tables

use anyhow::{Context, Result};
use clap::Args;
use retain_config::Config;
use retain_query::{Column, DataType, OutputFormat, QueryEngine, QueryResult, TableInfo};
use serde_json::Value;

use super::{DataArgs, output};

/// Tables command arguments
#[derive(Args, Debug)]
pub struct TablesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the tables command
pub async fn run(args: TablesArgs, config: &Config) -> Result<()> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid format: {}", e))?;

    let dir = args.data.dir(config);
    let engine = QueryEngine::from_data_dir(&dir);

    let tables = engine
        .list_tables()
        .await
        .with_context(|| format!("failed to list tables in {}", dir.display()))?;

    output::print_result(&tables_result(&tables), format)
}

/// One row per table: name, row count and `column:type` list
fn tables_result(tables: &[TableInfo]) -> QueryResult {
    let columns = vec![
        Column::required("table", DataType::String),
        Column::optional("rows", DataType::UInt64),
        Column::required("columns", DataType::String),
    ];

    let rows = tables
        .iter()
        .map(|t| {
            let schema: Vec<String> = t
                .columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.data_type))
                .collect();
            vec![
                Value::String(t.name.clone()),
                t.row_count.map(Value::from).unwrap_or(Value::Null),
                Value::String(schema.join(", ")),
            ]
        })
        .collect();

    QueryResult::new(columns, rows, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tables_result() {
        let tables = vec![TableInfo {
            name: "orders".to_string(),
            row_count: Some(3),
            columns: vec![
                Column::optional("order_id", DataType::Int64),
                Column::optional("status", DataType::String),
            ],
        }];

        let result = tables_result(&tables);
        assert_eq!(result.row_count, 1);
        assert_eq!(result.rows[0][0], json!("orders"));
        assert_eq!(result.rows[0][1], json!(3));
        assert_eq!(
            result.rows[0][2],
            json!(format!("order_id:{}, status:{}", DataType::Int64, DataType::String))
        );
    }
}
