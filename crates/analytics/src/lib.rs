//! Retain Analytics Engine
//!
//! Funnel, retention, revenue and data-quality reports over an e-commerce
//! snapshot.
//!
//! # Overview
//!
//! This crate provides the analytics layer for Retain, built on top of
//! `retain-query`. It includes:
//!
//! - **Cohort retention**: users grouped by first counted purchase month,
//!   retention by calendar month offset, and the dense retention matrix
//! - **Funnel**: distinct users per stage, step conversion, breakdowns by
//!   traffic source and device
//! - **Revenue**: monthly trend with month-over-month growth, spend tiers
//! - **Quality**: nulls, duplicates, orphaned keys, revenue outliers
//! - **Summary**: headline findings
//!
//! # Usage
//!
//! ```ignore
//! use retain_analytics::{ReportEngine, ReportKind, ReportSettings};
//! use retain_query::Dataset;
//!
//! let dataset = Dataset::load("data")?;
//! let engine = ReportEngine::new(dataset, ReportSettings::default());
//!
//! // Typed rows
//! for row in engine.cohort_retention() {
//!     println!("{} +{}: {:?}", row.cohort_month, row.month_offset, row.retention_pct);
//! }
//!
//! // Flat tables for rendering or export
//! let trend = engine.run(ReportKind::Trend)?;
//! ```

pub mod error;
pub mod month;
pub mod ratio;
pub mod reports;
pub mod settings;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod cohort_test;
#[cfg(test)]
mod funnel_test;

// Re-exports for convenience
pub use error::{AnalyticsError, Result};
pub use month::Month;
pub use ratio::{pct, round_to, safe_div};
pub use reports::{
    Dimension, Findings, Funnel, FunnelRates, FunnelStage, QualityAudit, Report, ReportEngine,
    ReportKind, RetentionMatrix,
};
pub use settings::ReportSettings;
