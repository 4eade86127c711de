//! Data-quality audit
//!
//! Problems are reported, never corrected: nulls, duplicates, orphaned
//! keys and outliers all stay in the data the other reports read.
//!
//! - **quality**: one row per check (null counts, duplicates, orphans,
//!   unknown values, outliers)
//! - **duplicates**: listing of repeated (session, event type) pairs
//! - **outliers**: listing of flagged orders with their z-scores

pub mod integrity;
pub mod nulls;
pub mod outliers;

pub use integrity::{
    DuplicatePair, FieldCount, duplicate_keys, duplicate_session_events, orphaned_keys,
    unknown_values,
};
pub use nulls::{NullRow, null_audit, null_counts};
pub use outliers::{OutlierRow, RevenueStats, revenue_outliers};

use serde::Serialize;

use crate::error::Result;
use crate::ratio::pct;
use crate::reports::Report;
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, QueryResult};

/// Kind of quality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Null,
    DuplicatePair,
    DuplicateKey,
    Orphan,
    UnknownValue,
    Outlier,
}

/// One line of the audit summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRow {
    pub check: CheckKind,
    pub table: &'static str,
    pub field: &'static str,
    pub count: u64,
    pub pct: Option<f64>,
}

impl CheckRow {
    fn from_field(check: CheckKind, f: &FieldCount) -> Self {
        Self {
            check,
            table: f.table,
            field: f.field,
            count: f.count,
            pct: None,
        }
    }
}

/// Full audit of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct QualityAudit {
    pub nulls: Vec<NullRow>,
    pub duplicate_pairs: Vec<DuplicatePair>,
    pub duplicate_keys: Vec<FieldCount>,
    pub orphans: Vec<FieldCount>,
    pub unknown_values: Vec<FieldCount>,
    pub revenue: RevenueStats,
    pub outliers: Vec<OutlierRow>,
}

impl QualityAudit {
    /// Run every check
    pub fn run(dataset: &Dataset, settings: &ReportSettings) -> Self {
        let (revenue, outliers) = revenue_outliers(&dataset.orders, settings.z_threshold);

        let audit = Self {
            nulls: null_audit(dataset),
            duplicate_pairs: duplicate_session_events(&dataset.events),
            duplicate_keys: duplicate_keys(dataset),
            orphans: orphaned_keys(dataset),
            unknown_values: unknown_values(dataset),
            revenue,
            outliers,
        };

        tracing::debug!(
            duplicate_pairs = audit.duplicate_pairs.len(),
            orphans = audit.orphans.iter().map(|o| o.count).sum::<u64>(),
            outliers = audit.outliers.len(),
            "ran quality audit"
        );

        audit
    }

    /// Flatten into one row per check
    pub fn checks(&self) -> Vec<CheckRow> {
        let mut rows: Vec<CheckRow> = self
            .nulls
            .iter()
            .map(|n| CheckRow {
                check: CheckKind::Null,
                table: n.table,
                field: n.field,
                count: n.null_count,
                pct: n.null_pct,
            })
            .collect();

        rows.push(CheckRow {
            check: CheckKind::DuplicatePair,
            table: "events",
            field: "session_id,event_type",
            count: self.duplicate_pairs.len() as u64,
            pct: None,
        });
        rows.extend(
            self.duplicate_keys
                .iter()
                .map(|f| CheckRow::from_field(CheckKind::DuplicateKey, f)),
        );
        rows.extend(
            self.orphans
                .iter()
                .map(|f| CheckRow::from_field(CheckKind::Orphan, f)),
        );
        rows.extend(
            self.unknown_values
                .iter()
                .map(|f| CheckRow::from_field(CheckKind::UnknownValue, f)),
        );
        rows.push(CheckRow {
            check: CheckKind::Outlier,
            table: "orders",
            field: "total_sale_price",
            count: self.outliers.len() as u64,
            pct: pct(
                self.outliers.len() as f64,
                self.revenue.priced_orders as f64,
                2,
            ),
        });

        rows
    }
}

/// Audit summary report
pub struct QualityReport;

impl QualityReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("check", DataType::String),
            Column::required("table", DataType::String),
            Column::required("field", DataType::String),
            Column::required("count", DataType::Int64),
            Column::optional("pct", DataType::Float64),
        ]
    }
}

impl Report for QualityReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        let checks = QualityAudit::run(dataset, settings).checks();
        Ok(QueryResult::from_records(Self::columns(), &checks)?)
    }

    fn name(&self) -> &'static str {
        "quality"
    }
}

/// Duplicate (session, event type) listing
pub struct DuplicatesReport;

impl DuplicatesReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("session_id", DataType::Int64),
            Column::required("event_type", DataType::String),
            Column::required("occurrences", DataType::Int64),
        ]
    }
}

impl Report for DuplicatesReport {
    fn run(&self, dataset: &Dataset, _settings: &ReportSettings) -> Result<QueryResult> {
        let pairs = duplicate_session_events(&dataset.events);
        Ok(QueryResult::from_records(Self::columns(), &pairs)?)
    }

    fn name(&self) -> &'static str {
        "duplicates"
    }
}

/// Revenue outlier listing
pub struct OutliersReport;

impl OutliersReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::optional("order_id", DataType::Int64),
            Column::optional("user_id", DataType::Int64),
            Column::required("total_sale_price", DataType::Float64),
            Column::required("z_score", DataType::Float64),
        ]
    }
}

impl Report for OutliersReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        let (_, outliers) = revenue_outliers(&dataset.orders, settings.z_threshold);
        Ok(QueryResult::from_records(Self::columns(), &outliers)?)
    }

    fn name(&self) -> &'static str {
        "outliers"
    }
}
