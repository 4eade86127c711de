//! Tabular result types
//!
//! Every report and every ad-hoc query ends up as a `QueryResult`, which the
//! CLI renders as a table, JSON or CSV and the exporter writes to disk.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QueryError;

/// Flat table of JSON values with typed columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column definitions
    pub columns: Vec<Column>,

    /// Row data as JSON values
    pub rows: Vec<Vec<Value>>,

    /// Total row count
    pub row_count: usize,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Create a new result
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>, execution_time_ms: u64) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time_ms,
        }
    }

    /// Build a result from serializable records
    ///
    /// Each record is serialized to a JSON object and its fields are picked
    /// by column name; a field the record does not have becomes null.
    pub fn from_records<T: Serialize>(
        columns: Vec<Column>,
        records: &[T],
    ) -> Result<Self, QueryError> {
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let value = serde_json::to_value(record)?;
            let row = columns
                .iter()
                .map(|c| value.get(&c.name).cloned().unwrap_or(Value::Null))
                .collect();
            rows.push(row);
        }

        Ok(Self::new(columns, rows, 0))
    }

    /// Check if result is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Rows as JSON objects keyed by column name, in column order
    pub fn to_objects(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(c, v)| (c.name.clone(), v.clone()))
                    .collect()
            })
            .collect()
    }

    /// Render as CSV with a header row
    ///
    /// Nulls become empty fields. Fields containing a delimiter, quote or
    /// line break are quoted.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        let header: Vec<String> = self.columns.iter().map(|c| csv_field(&c.name)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(|v| csv_field(&cell_text(v))).collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        out
    }
}

/// Plain-text form of a cell; null is the empty string
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Data type
    pub data_type: DataType,

    /// Whether the column is nullable
    pub nullable: bool,
}

impl Column {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Non-nullable column
    pub fn required(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, false)
    }

    /// Nullable column
    pub fn optional(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, true)
    }
}

/// Data types supported in results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Timestamp or date
    Timestamp,
    /// Unknown/other type
    Unknown,
}

impl DataType {
    /// Convert from Polars data type
    pub fn from_polars(dtype: &polars::datatypes::DataType) -> Self {
        use polars::datatypes::DataType as PDT;
        match dtype {
            PDT::Int8 | PDT::Int16 | PDT::Int32 | PDT::Int64 => DataType::Int64,
            PDT::UInt8 | PDT::UInt16 | PDT::UInt32 | PDT::UInt64 => DataType::UInt64,
            PDT::Float32 | PDT::Float64 => DataType::Float64,
            PDT::String => DataType::String,
            PDT::Boolean => DataType::Boolean,
            PDT::Datetime(_, _) | PDT::Date | PDT::Time => DataType::Timestamp,
            _ => DataType::Unknown,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Float64 => "float64",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Table information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name
    pub name: String,

    /// Row count (if known)
    pub row_count: Option<u64>,

    /// Column definitions
    pub columns: Vec<Column>,
}
