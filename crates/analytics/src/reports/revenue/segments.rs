//! Customer spend segmentation

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::ratio::{pct, round_to, safe_div};
use crate::reports::Report;
use crate::settings::ReportSettings;
use retain_config::SegmentTier;
use retain_query::{Column, DataType, Dataset, QueryResult};

/// Spend and order count of one purchasing user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerSpend {
    pub user_id: i64,
    pub total_spend: f64,
    pub order_count: u64,
}

/// Aggregate over one spend tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub segment: String,
    pub customers: u64,
    pub avg_spend: Option<f64>,
    pub avg_orders: Option<f64>,
    pub total_revenue: f64,
    /// Tier revenue as a share of all tiered revenue
    pub revenue_share_pct: Option<f64>,
}

/// Per-user totals over counted orders
pub fn customer_spend(dataset: &Dataset, settings: &ReportSettings) -> Vec<CustomerSpend> {
    let mut spend: HashMap<i64, CustomerSpend> = HashMap::new();

    for order in settings.counted(&dataset.orders) {
        let Some(user_id) = order.user_id else {
            continue;
        };
        let entry = spend.entry(user_id).or_insert(CustomerSpend {
            user_id,
            total_spend: 0.0,
            order_count: 0,
        });
        entry.total_spend += order.total_sale_price.unwrap_or(0.0);
        entry.order_count += 1;
    }

    let mut customers: Vec<CustomerSpend> = spend.into_values().collect();
    customers.sort_by_key(|c| c.user_id);
    customers
}

/// Index of the right-inclusive tier containing `spend`
///
/// Zero or negative spend falls outside every tier.
pub fn tier_index(tiers: &[SegmentTier], spend: f64) -> Option<usize> {
    if spend <= 0.0 {
        return None;
    }
    tiers
        .iter()
        .position(|t| t.upper.is_none_or(|upper| spend <= upper))
}

#[derive(Default)]
struct TierAcc {
    customers: u64,
    spend: f64,
    orders: u64,
}

/// Bucket customers into tiers; empty tiers are omitted
pub fn segments(dataset: &Dataset, settings: &ReportSettings) -> Vec<SegmentRow> {
    let customers = customer_spend(dataset, settings);
    let mut tiers: Vec<TierAcc> = settings.tiers.iter().map(|_| TierAcc::default()).collect();
    let mut untiered = 0usize;

    for c in &customers {
        match tier_index(&settings.tiers, c.total_spend) {
            Some(i) => {
                tiers[i].customers += 1;
                tiers[i].spend += c.total_spend;
                tiers[i].orders += c.order_count;
            }
            None => untiered += 1,
        }
    }

    let tiered_revenue: f64 = tiers.iter().map(|t| t.spend).sum();

    let rows: Vec<SegmentRow> = settings
        .tiers
        .iter()
        .zip(&tiers)
        .filter(|(_, acc)| acc.customers > 0)
        .map(|(tier, acc)| SegmentRow {
            segment: tier.label.clone(),
            customers: acc.customers,
            avg_spend: safe_div(acc.spend, acc.customers as f64).map(|v| round_to(v, 2)),
            avg_orders: safe_div(acc.orders as f64, acc.customers as f64).map(|v| round_to(v, 2)),
            total_revenue: round_to(acc.spend, 2),
            revenue_share_pct: pct(acc.spend, tiered_revenue, 1),
        })
        .collect();

    tracing::debug!(
        customers = customers.len(),
        segments = rows.len(),
        untiered = untiered,
        "computed spend segments"
    );

    rows
}

/// Spend segment report
pub struct SegmentsReport;

impl SegmentsReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("segment", DataType::String),
            Column::required("customers", DataType::Int64),
            Column::optional("avg_spend", DataType::Float64),
            Column::optional("avg_orders", DataType::Float64),
            Column::required("total_revenue", DataType::Float64),
            Column::optional("revenue_share_pct", DataType::Float64),
        ]
    }
}

impl Report for SegmentsReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        let rows = segments(dataset, settings);
        Ok(QueryResult::from_records(Self::columns(), &rows)?)
    }

    fn name(&self) -> &'static str {
        "segments"
    }
}
