//! Report engine
//!
//! Reports are organized by domain:
//!
//! - **retention**: cohort retention rows and the retention matrix
//! - **funnel**: stage conversion, overall and by traffic source or device
//! - **revenue**: monthly trend and spend segments
//! - **quality**: null, duplicate, orphan and outlier checks
//! - **summary**: headline findings drawn from the others
//!
//! Every report is a pure function of an immutable `Dataset` and the
//! `ReportSettings`, so independent reports can run concurrently.

pub mod funnel;
pub mod quality;
pub mod retention;
pub mod revenue;
pub mod summary;

// Re-exports for convenience
pub use funnel::{
    Dimension, Funnel, FunnelBreakdownReport, FunnelRates, FunnelRatesReport, FunnelReport,
    FunnelStage,
};
pub use quality::{DuplicatesReport, OutliersReport, QualityAudit, QualityReport};
pub use retention::{CohortRetentionReport, RetentionMatrix, RetentionMatrixReport};
pub use revenue::{SegmentsReport, TrendReport};
pub use summary::{Findings, SummaryReport};

use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Instant;

use crate::error::{AnalyticsError, Result};
use crate::settings::ReportSettings;
use retain_query::{Dataset, QueryResult};

/// A report computed from the dataset
pub trait Report: Send + Sync {
    /// Compute this report as a flat table
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult>;

    /// Get the report name for logging/identification
    fn name(&self) -> &'static str;
}

/// Every report the engine can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Cohort,
    Matrix,
    Funnel,
    FunnelRates,
    FunnelBySource,
    FunnelByDevice,
    Trend,
    Segments,
    Quality,
    Duplicates,
    Outliers,
    Summary,
}

impl ReportKind {
    /// All reports, in export order
    pub const ALL: [ReportKind; 12] = [
        Self::Cohort,
        Self::Matrix,
        Self::Funnel,
        Self::FunnelRates,
        Self::FunnelBySource,
        Self::FunnelByDevice,
        Self::Trend,
        Self::Segments,
        Self::Quality,
        Self::Duplicates,
        Self::Outliers,
        Self::Summary,
    ];

    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cohort => "cohort",
            Self::Matrix => "matrix",
            Self::Funnel => "funnel",
            Self::FunnelRates => "funnel-rates",
            Self::FunnelBySource => "funnel-by-source",
            Self::FunnelByDevice => "funnel-by-device",
            Self::Trend => "trend",
            Self::Segments => "segments",
            Self::Quality => "quality",
            Self::Duplicates => "duplicates",
            Self::Outliers => "outliers",
            Self::Summary => "summary",
        }
    }

    /// File stem used when exporting
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Cohort => "cohort_retention",
            Self::Matrix => "cohort_retention_matrix",
            Self::Funnel => "funnel_overall",
            Self::FunnelRates => "funnel_rates",
            Self::FunnelBySource => "funnel_by_source",
            Self::FunnelByDevice => "funnel_by_device",
            Self::Trend => "monthly_trend",
            Self::Segments => "customer_segments",
            Self::Quality => "quality_checks",
            Self::Duplicates => "quality_duplicates",
            Self::Outliers => "quality_outliers",
            Self::Summary => "key_findings",
        }
    }

    /// The report implementation
    pub fn report(&self) -> Box<dyn Report> {
        match self {
            Self::Cohort => Box::new(CohortRetentionReport),
            Self::Matrix => Box::new(RetentionMatrixReport),
            Self::Funnel => Box::new(FunnelReport),
            Self::FunnelRates => Box::new(FunnelRatesReport),
            Self::FunnelBySource => Box::new(FunnelBreakdownReport::by_source()),
            Self::FunnelByDevice => Box::new(FunnelBreakdownReport::by_device()),
            Self::Trend => Box::new(TrendReport),
            Self::Segments => Box::new(SegmentsReport),
            Self::Quality => Box::new(QualityReport),
            Self::Duplicates => Box::new(DuplicatesReport),
            Self::Outliers => Box::new(OutliersReport),
            Self::Summary => Box::new(SummaryReport),
        }
    }
}

impl FromStr for ReportKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(AnalyticsError::UnknownReport(s))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report engine over one loaded dataset
pub struct ReportEngine {
    dataset: Dataset,
    settings: ReportSettings,
}

impl ReportEngine {
    /// Create a new report engine
    pub fn new(dataset: Dataset, settings: ReportSettings) -> Self {
        Self { dataset, settings }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Execute a report
    pub fn execute(&self, report: &dyn Report) -> Result<QueryResult> {
        let start = Instant::now();
        let mut result = report.run(&self.dataset, &self.settings)?;
        result.execution_time_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            report = report.name(),
            rows = result.row_count,
            time_ms = result.execution_time_ms,
            "report computed"
        );

        Ok(result)
    }

    /// Execute a report by kind
    pub fn run(&self, kind: ReportKind) -> Result<QueryResult> {
        self.execute(kind.report().as_ref())
    }

    /// Execute several reports on scoped threads
    ///
    /// Results come back in the order of `kinds` and are identical to
    /// running each report in turn.
    pub fn run_many(&self, kinds: &[ReportKind]) -> Vec<(ReportKind, Result<QueryResult>)> {
        thread::scope(|scope| {
            let handles: Vec<_> = kinds
                .iter()
                .map(|kind| (*kind, scope.spawn(move || self.run(*kind))))
                .collect();

            handles
                .into_iter()
                .map(|(kind, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(AnalyticsError::ReportFailed(format!("{} panicked", kind)))
                    });
                    (kind, result)
                })
                .collect()
        })
    }

    /// Execute every report
    pub fn run_all(&self) -> Vec<(ReportKind, Result<QueryResult>)> {
        self.run_many(&ReportKind::ALL)
    }

    // Typed accessors

    /// Sparse cohort retention rows
    pub fn cohort_retention(&self) -> Vec<retention::CohortRow> {
        retention::cohort_retention(&self.dataset.orders, &self.settings)
    }

    /// Retention matrix filtered by `min_offsets`
    pub fn retention_matrix(&self) -> RetentionMatrix {
        retention::retention_matrix(&self.dataset, &self.settings)
    }

    /// Overall funnel
    pub fn funnel(&self) -> Funnel {
        funnel::funnel(&self.dataset)
    }

    /// Funnel grouped by an event dimension
    pub fn funnel_breakdown(&self, dimension: Dimension) -> Vec<funnel::BreakdownRow> {
        funnel::funnel_breakdown(&self.dataset.events, dimension)
    }

    /// Monthly revenue trend
    pub fn monthly_trend(&self) -> Vec<revenue::TrendRow> {
        revenue::monthly_trend(&self.dataset, &self.settings)
    }

    /// Spend segments
    pub fn segments(&self) -> Vec<revenue::SegmentRow> {
        revenue::segments(&self.dataset, &self.settings)
    }

    /// Data-quality audit
    pub fn quality(&self) -> QualityAudit {
        QualityAudit::run(&self.dataset, &self.settings)
    }

    /// Headline findings
    pub fn findings(&self) -> Findings {
        summary::findings(&self.dataset, &self.settings)
    }
}
