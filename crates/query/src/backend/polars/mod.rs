//! Polars backend for ad-hoc SQL over the input CSV files
//!
//! Each of the five tables is read from `{data_dir}/{table}.csv` and
//! registered under its logical name, so queries read
//! `SELECT status, count(*) FROM orders GROUP BY status`.
//! Numeric columns take their schema types, with unparseable values as
//! nulls. Timestamp columns stay as text, exactly as written in the files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use polars::prelude::*;

use crate::backend::{QueryBackend, validate_sql};
use crate::dataset::{TABLES, table_path, table_schema};
use crate::error::QueryError;
use crate::load::{cast_columns, read_csv};
use crate::result::{Column, DataType, QueryResult, TableInfo};

/// Polars backend over a data directory of CSV files
#[derive(Debug, Clone)]
pub struct PolarsBackend {
    data_dir: PathBuf,
}

impl PolarsBackend {
    /// Create a new Polars backend
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the CSV files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_table(&self, table: &str) -> Result<DataFrame, QueryError> {
        let df = read_csv(table, &table_path(&self.data_dir, table))?;
        cast_columns(df, &table_schema(table).unwrap_or_default())
    }

    /// Register all present tables in the SQL context
    ///
    /// A missing file is skipped so queries over the other tables still
    /// run; the query then fails only if it references the absent table.
    fn register_tables(&self, ctx: &mut polars::sql::SQLContext) -> Result<usize, QueryError> {
        let mut registered = 0;

        for table in TABLES {
            match self.read_table(table) {
                Ok(df) => {
                    ctx.register(table, df.lazy());
                    registered += 1;
                    tracing::debug!(table = table, "registered table");
                }
                Err(QueryError::TableNotFound { path, .. }) => {
                    tracing::debug!(table = table, path = %path, "table file missing, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(registered)
    }
}

#[async_trait]
impl QueryBackend for PolarsBackend {
    async fn execute(&self, sql: &str) -> Result<QueryResult, QueryError> {
        validate_sql(sql)?;

        let start = Instant::now();

        let mut ctx = polars::sql::SQLContext::new();
        self.register_tables(&mut ctx)?;

        let lf = ctx
            .execute(sql)
            .map_err(|e| QueryError::Execution(format!("SQL execution failed: {}", e)))?;

        let df = lf
            .collect()
            .map_err(|e| QueryError::Execution(format!("failed to collect results: {}", e)))?;

        let execution_time_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            rows = df.height(),
            cols = df.width(),
            time_ms = execution_time_ms,
            "query executed"
        );

        dataframe_to_result(&df, execution_time_ms)
    }

    async fn health_check(&self) -> Result<(), QueryError> {
        for table in TABLES {
            let path = table_path(&self.data_dir, table);
            if !path.exists() {
                return Err(QueryError::TableNotFound {
                    table: table.to_string(),
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "polars"
    }

    async fn list_tables(&self) -> Result<Vec<TableInfo>, QueryError> {
        let mut tables = Vec::new();

        for table in TABLES {
            let df = match self.read_table(table) {
                Ok(df) => df,
                Err(QueryError::TableNotFound { .. }) => continue,
                Err(e) => return Err(e),
            };

            tables.push(TableInfo {
                name: table.to_string(),
                row_count: Some(df.height() as u64),
                columns: schema_columns(&df),
            });
        }

        Ok(tables)
    }
}

fn schema_columns(df: &DataFrame) -> Vec<Column> {
    df.schema()
        .iter()
        .map(|(name, dtype)| Column::new(name.as_str(), DataType::from_polars(dtype), true))
        .collect()
}

/// Convert a Polars DataFrame to a QueryResult
fn dataframe_to_result(df: &DataFrame, execution_time_ms: u64) -> Result<QueryResult, QueryError> {
    let columns = schema_columns(df);

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut row = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let value = col.as_materialized_series().get(i)?;
            row.push(any_value_to_json(value));
        }
        rows.push(row);
    }

    Ok(QueryResult::new(columns, rows, execution_time_ms))
}

/// Convert a single cell to JSON; non-finite floats become null
fn any_value_to_json(value: AnyValue<'_>) -> serde_json::Value {
    use serde_json::Value;

    let float = |v: f64| {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    };

    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float(v as f64),
        AnyValue::Float64(v) => float(v),
        AnyValue::String(v) => Value::String(v.to_string()),
        AnyValue::StringOwned(v) => Value::String(v.to_string()),
        other => Value::String(other.to_string()),
    }
}
