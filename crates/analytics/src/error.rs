//! Analytics error types

use thiserror::Error;

/// Analytics errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Unknown report name
    #[error("unknown report: {0}")]
    UnknownReport(String),

    /// Invalid month value
    #[error("invalid month: {0}")]
    InvalidMonth(String),

    /// A report could not be computed
    #[error("report failed: {0}")]
    ReportFailed(String),

    /// Backend error (from retain-query)
    #[error("backend error: {0}")]
    Backend(#[from] retain_query::QueryError),
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
