//! Key findings across all reports

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::month::Month;
use crate::ratio::{mean, round_to};
use crate::reports::Report;
use crate::reports::funnel::{Dimension, FunnelStage, funnel, funnel_breakdown};
use crate::reports::retention::retention_matrix;
use crate::reports::revenue::{monthly_trend, segments};
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, QueryResult};

/// Headline numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Findings {
    pub overall_conversion_pct: Option<f64>,
    pub largest_drop_off_stage: Option<FunnelStage>,
    pub largest_drop_off_pct: Option<f64>,
    pub best_source: Option<String>,
    pub best_source_conversion_pct: Option<f64>,
    pub worst_source: Option<String>,
    pub worst_source_conversion_pct: Option<f64>,
    pub avg_month1_retention_pct: Option<f64>,
    pub avg_month3_retention_pct: Option<f64>,
    pub top_segment: Option<String>,
    pub top_segment_revenue_share_pct: Option<f64>,
    pub peak_revenue_month: Option<Month>,
    pub avg_monthly_conversion_pct: Option<f64>,
    pub total_counted_orders: u64,
    pub total_counted_revenue: f64,
}

/// Gather the findings
pub fn findings(dataset: &Dataset, settings: &ReportSettings) -> Findings {
    let funnel = funnel(dataset);
    let drop = funnel.largest_drop_off();

    // sorted best first; rows without a conversion sort last
    let sources: Vec<_> = funnel_breakdown(&dataset.events, Dimension::TrafficSource)
        .into_iter()
        .filter(|r| r.conversion_pct.is_some())
        .collect();
    let best = sources.first();
    let worst = sources.last();

    let matrix = retention_matrix(dataset, settings);

    // top tier's share; zero when it has no customers but others do
    let segments = segments(dataset, settings);
    let top_label = settings.tiers.last().map(|t| t.label.clone());
    let top_share = top_label.as_ref().and_then(|label| {
        match segments.iter().find(|s| &s.segment == label) {
            Some(row) => row.revenue_share_pct,
            None if !segments.is_empty() => Some(0.0),
            None => None,
        }
    });

    let trend = monthly_trend(dataset, settings);
    // earliest month wins a tie
    let peak = trend
        .iter()
        .fold(None, |best: Option<&crate::reports::revenue::TrendRow>, r| match best {
            Some(b) if b.total_revenue >= r.total_revenue => Some(b),
            _ => Some(r),
        })
        .map(|r| r.month);
    let conversions: Vec<f64> = trend.iter().filter_map(|r| r.conversion_pct).collect();

    let counted: Vec<_> = settings.counted(&dataset.orders).collect();
    let revenue: f64 = counted.iter().filter_map(|o| o.total_sale_price).sum();

    Findings {
        overall_conversion_pct: funnel.stage(FunnelStage::Purchase).conversion_from_top_pct,
        largest_drop_off_stage: drop.map(|s| s.stage),
        largest_drop_off_pct: drop.and_then(|s| s.drop_off_pct),
        best_source: best.map(|r| r.group.clone()),
        best_source_conversion_pct: best.and_then(|r| r.conversion_pct),
        worst_source: worst.map(|r| r.group.clone()),
        worst_source_conversion_pct: worst.and_then(|r| r.conversion_pct),
        avg_month1_retention_pct: matrix.average_at(1),
        avg_month3_retention_pct: matrix.average_at(3),
        top_segment: top_label,
        top_segment_revenue_share_pct: top_share,
        peak_revenue_month: peak,
        avg_monthly_conversion_pct: mean(&conversions).map(|v| round_to(v, 2)),
        total_counted_orders: counted.len() as u64,
        total_counted_revenue: round_to(revenue, 2),
    }
}

/// Findings as a two-column (finding, value) table
pub struct SummaryReport;

impl SummaryReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("finding", DataType::String),
            Column::optional("value", DataType::Unknown),
        ]
    }
}

impl Report for SummaryReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        let findings = serde_json::to_value(findings(dataset, settings))
            .map_err(retain_query::QueryError::from)?;

        let rows = match findings {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| vec![Value::String(k), v])
                .collect(),
            _ => Vec::new(),
        };

        Ok(QueryResult::new(Self::columns(), rows, 0))
    }

    fn name(&self) -> &'static str {
        "summary"
    }
}
