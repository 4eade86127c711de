//! Monthly revenue and conversion trend

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::month::Month;
use crate::ratio::{pct, round_to, safe_div};
use crate::reports::Report;
use crate::reports::funnel::FunnelStage;
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, QueryResult};

/// One calendar month of the trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub month: Month,
    /// Distinct users with a home event in the month
    pub unique_visitors: u64,
    /// Sum of counted order prices, rounded to cents
    pub total_revenue: f64,
    pub unique_buyers: u64,
    pub total_orders: u64,
    /// Mean price over counted orders that carry one
    pub avg_order_value: Option<f64>,
    /// `round(100 * buyers / visitors, 2)`
    pub conversion_pct: Option<f64>,
    /// Revenue change against the previous row, in percent
    pub mom_growth_pct: Option<f64>,
}

#[derive(Default)]
struct MonthAcc {
    visitors: HashSet<i64>,
    buyers: HashSet<i64>,
    revenue: f64,
    priced_orders: u64,
    orders: u64,
}

/// Compute the trend over the months that had home-page visitors
///
/// Orders placed in a month without visitors are left out.
pub fn monthly_trend(dataset: &Dataset, settings: &ReportSettings) -> Vec<TrendRow> {
    let mut months: BTreeMap<Month, MonthAcc> = BTreeMap::new();

    for event in &dataset.events {
        if FunnelStage::of(event) != Some(FunnelStage::Home) {
            continue;
        }
        if let (Some(user_id), Some(ts)) = (event.user_id, event.created_at.as_ref()) {
            months.entry(Month::of(ts)).or_default().visitors.insert(user_id);
        }
    }

    for order in settings.counted(&dataset.orders) {
        let Some(ts) = order.created_at.as_ref() else {
            continue;
        };
        let Some(acc) = months.get_mut(&Month::of(ts)) else {
            continue;
        };
        acc.orders += 1;
        if let Some(user_id) = order.user_id {
            acc.buyers.insert(user_id);
        }
        if let Some(price) = order.total_sale_price {
            acc.revenue += price;
            acc.priced_orders += 1;
        }
    }

    let mut rows = Vec::with_capacity(months.len());
    let mut previous_revenue: Option<f64> = None;

    for (month, acc) in months {
        let unique_visitors = acc.visitors.len() as u64;
        let unique_buyers = acc.buyers.len() as u64;

        rows.push(TrendRow {
            month,
            unique_visitors,
            total_revenue: round_to(acc.revenue, 2),
            unique_buyers,
            total_orders: acc.orders,
            avg_order_value: safe_div(acc.revenue, acc.priced_orders as f64)
                .map(|v| round_to(v, 2)),
            conversion_pct: pct(unique_buyers as f64, unique_visitors as f64, 2),
            mom_growth_pct: previous_revenue
                .and_then(|prev| pct(acc.revenue - prev, prev, 2)),
        });

        previous_revenue = Some(acc.revenue);
    }

    tracing::debug!(months = rows.len(), "computed monthly trend");

    rows
}

/// Monthly trend report
pub struct TrendReport;

impl TrendReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("month", DataType::String),
            Column::required("unique_visitors", DataType::Int64),
            Column::required("total_revenue", DataType::Float64),
            Column::required("unique_buyers", DataType::Int64),
            Column::required("total_orders", DataType::Int64),
            Column::optional("avg_order_value", DataType::Float64),
            Column::optional("conversion_pct", DataType::Float64),
            Column::optional("mom_growth_pct", DataType::Float64),
        ]
    }
}

impl Report for TrendReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        let rows = monthly_trend(dataset, settings);
        Ok(QueryResult::from_records(Self::columns(), &rows)?)
    }

    fn name(&self) -> &'static str {
        "trend"
    }
}
