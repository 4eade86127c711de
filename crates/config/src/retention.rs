//! Cohort retention configuration

use serde::Deserialize;

/// Order statuses that count as a real purchase by default
pub const DEFAULT_COUNTED_STATUSES: &[&str] = &["Complete", "Returned", "Shipped"];

/// Cohort retention settings
///
/// # Example
///
/// ```toml
/// [retention]
/// window_months = 12
/// counted_statuses = ["Complete", "Returned", "Shipped"]
/// min_offsets = 3
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Observation window in months (offsets 0..window_months are reported)
    /// Default: 12
    pub window_months: u32,

    /// Order statuses that count as a purchase
    /// Default: Complete, Returned, Shipped
    pub counted_statuses: Vec<String>,

    /// Minimum number of observed offsets for a cohort to appear in the
    /// retention matrix and in the average-retention findings
    /// Default: 3
    pub min_offsets: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            window_months: 12,
            counted_statuses: DEFAULT_COUNTED_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_offsets: 3,
        }
    }
}
