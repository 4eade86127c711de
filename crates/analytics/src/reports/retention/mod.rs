//! Cohort retention reports
//!
//! - **cohort**: sparse (cohort month, offset) retention rows
//! - **matrix**: the same rows pivoted into a dense heatmap

pub mod cohort;
pub mod matrix;

pub use cohort::{
    CohortRetentionReport, CohortRow, Purchase, assign_cohorts, cohort_retention, cohort_sizes,
    purchases,
};
pub use matrix::{MatrixRow, RetentionMatrix, RetentionMatrixReport, retention_matrix};
