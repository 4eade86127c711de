//! Monthly cohort retention
//!
//! Users are grouped by the month of their first counted order; each later
//! counted order places the user in the retention bucket at that month's
//! calendar offset from the cohort month.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::error::Result;
use crate::month::Month;
use crate::ratio::pct;
use crate::reports::Report;
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, Order, QueryResult};

/// One (cohort, offset) bucket with at least one retained user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortRow {
    pub cohort_month: Month,
    /// Distinct users whose first counted order falls in the cohort month
    pub cohort_size: u64,
    pub month_offset: u32,
    /// Distinct cohort users with a counted order at this offset
    pub retained_users: u64,
    /// `round(100 * retained / size, 1)`; null only for an empty cohort
    pub retention_pct: Option<f64>,
}

/// A counted order reduced to what cohort analysis needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    pub user_id: i64,
    pub month: Month,
}

/// Counted orders with both a user and a timestamp
pub fn purchases(orders: &[Order], settings: &ReportSettings) -> Vec<Purchase> {
    settings
        .counted(orders)
        .filter_map(|o| {
            Some(Purchase {
                user_id: o.user_id?,
                month: Month::of(o.created_at.as_ref()?),
            })
        })
        .collect()
}

/// Map each purchasing user to the month of their earliest purchase
pub fn assign_cohorts(purchases: &[Purchase]) -> HashMap<i64, Month> {
    let mut cohorts: HashMap<i64, Month> = HashMap::new();
    for p in purchases {
        cohorts
            .entry(p.user_id)
            .and_modify(|m| *m = (*m).min(p.month))
            .or_insert(p.month);
    }
    cohorts
}

/// Distinct users per cohort month
pub fn cohort_sizes(cohorts: &HashMap<i64, Month>) -> BTreeMap<Month, u64> {
    let mut sizes = BTreeMap::new();
    for month in cohorts.values() {
        *sizes.entry(*month).or_insert(0) += 1;
    }
    sizes
}

/// Compute sparse retention rows, sorted by cohort month then offset
pub fn cohort_retention(orders: &[Order], settings: &ReportSettings) -> Vec<CohortRow> {
    let purchases = purchases(orders, settings);
    let cohorts = assign_cohorts(&purchases);
    let sizes = cohort_sizes(&cohorts);
    let window = settings.window_months as i64;

    let mut retained: BTreeMap<(Month, u32), BTreeSet<i64>> = BTreeMap::new();
    let mut outside_window = 0usize;

    for p in &purchases {
        let Some(cohort) = cohorts.get(&p.user_id) else {
            continue;
        };
        let offset = p.month.offset_from(cohort);
        if !(0..window).contains(&offset) {
            outside_window += 1;
            continue;
        }
        retained
            .entry((*cohort, offset as u32))
            .or_default()
            .insert(p.user_id);
    }

    let rows: Vec<CohortRow> = retained
        .into_iter()
        .map(|((cohort_month, month_offset), users)| {
            let cohort_size = sizes.get(&cohort_month).copied().unwrap_or(0);
            let retained_users = users.len() as u64;
            CohortRow {
                cohort_month,
                cohort_size,
                month_offset,
                retained_users,
                retention_pct: pct(retained_users as f64, cohort_size as f64, 1),
            }
        })
        .collect();

    tracing::debug!(
        purchases = purchases.len(),
        cohorts = sizes.len(),
        rows = rows.len(),
        outside_window = outside_window,
        "computed cohort retention"
    );

    rows
}

/// Cohort retention report
pub struct CohortRetentionReport;

impl CohortRetentionReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("cohort_month", DataType::String),
            Column::required("cohort_size", DataType::Int64),
            Column::required("month_offset", DataType::Int64),
            Column::required("retained_users", DataType::Int64),
            Column::optional("retention_pct", DataType::Float64),
        ]
    }
}

impl Report for CohortRetentionReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        let rows = cohort_retention(&dataset.orders, settings);
        Ok(QueryResult::from_records(Self::columns(), &rows)?)
    }

    fn name(&self) -> &'static str {
        "cohort"
    }
}
