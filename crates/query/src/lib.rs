//! Retain Query - input tables and ad-hoc SQL
//!
//! Loads the five input tables (events, users, orders, order_items,
//! products) from CSV files into typed records, and runs read-only SQL over
//! the same files through the polars SQL engine.
//!
//! # Usage
//!
//! ```ignore
//! use retain_query::{Dataset, QueryEngine};
//!
//! // Typed snapshot for the reports
//! let dataset = Dataset::load("data")?;
//! println!("orders: {}", dataset.orders.len());
//!
//! // Ad-hoc SQL
//! let engine = QueryEngine::from_data_dir("data");
//! let result = engine.query("SELECT status, COUNT(*) FROM orders GROUP BY status").await?;
//! println!("Rows: {}", result.row_count);
//! ```
//!
//! # CLI
//!
//! ```bash
//! retain query "SELECT traffic_source, COUNT(*) FROM users GROUP BY 1"
//! retain query "SELECT * FROM orders LIMIT 10" --format json
//! ```

pub mod backend;
pub mod dataset;
pub mod error;
pub mod load;
pub mod result;
pub mod tables;

#[cfg(test)]
mod test_support;

// Re-exports
pub use backend::QueryBackend;
pub use backend::polars::PolarsBackend;
pub use dataset::{Dataset, TABLES, table_path};
pub use error::QueryError;
pub use result::{Column, DataType, QueryResult, TableInfo, cell_text};
pub use tables::{Event, Order, OrderItem, OrderStatus, Product, TableRecord, User};

use std::path::PathBuf;
use std::sync::Arc;

/// Query engine that routes queries to a backend
pub struct QueryEngine {
    backend: Arc<dyn QueryBackend>,
}

impl QueryEngine {
    /// Create a new query engine with a specific backend
    pub fn new(backend: impl QueryBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a query engine over a directory of CSV files
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(PolarsBackend::new(data_dir))
    }

    /// Execute a SQL query
    pub async fn query(&self, sql: &str) -> Result<QueryResult, QueryError> {
        self.backend.execute(sql).await
    }

    /// Check if the backend is healthy
    pub async fn health_check(&self) -> Result<(), QueryError> {
        self.backend.health_check().await
    }

    /// List available tables
    pub async fn list_tables(&self) -> Result<Vec<TableInfo>, QueryError> {
        self.backend.list_tables().await
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

/// Output format for tabular results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON array of objects
    Json,
    /// CSV format
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
