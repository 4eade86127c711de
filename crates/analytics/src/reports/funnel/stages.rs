//! Overall purchase funnel

use serde::Serialize;

use crate::error::Result;
use crate::ratio::{pct, round_to, safe_div};
use crate::reports::Report;
use crate::reports::funnel::{FunnelStage, StageCounts};
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, QueryResult};

/// One funnel stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRow {
    pub stage: FunnelStage,
    pub users: u64,
    /// `round(100 * users / home users, 1)`
    pub conversion_from_top_pct: Option<f64>,
    /// `round(100 * (1 - users / previous stage users), 1)`; null for home
    pub drop_off_pct: Option<f64>,
    /// `round(100 * users / previous stage users, 1)`; null for home
    pub step_conversion_pct: Option<f64>,
}

/// Named stage-to-stage conversion rates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunnelRates {
    pub pct_home_to_category: Option<f64>,
    pub pct_category_to_product: Option<f64>,
    pub pct_product_to_cart: Option<f64>,
    pub pct_cart_to_purchase: Option<f64>,
    pub pct_overall: Option<f64>,
}

/// Stage rows plus the named rates
#[derive(Debug, Clone, PartialEq)]
pub struct Funnel {
    pub stages: Vec<StageRow>,
    pub rates: FunnelRates,
}

impl Funnel {
    /// Build from per-stage distinct user counts
    pub fn from_counts(counts: &StageCounts) -> Self {
        let users = counts.to_array();
        let home = users[0] as f64;

        let stages = FunnelStage::ALL
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let previous = (i > 0).then(|| users[i - 1]);
                StageRow {
                    stage: *stage,
                    users: users[i],
                    conversion_from_top_pct: pct(users[i] as f64, home, 1),
                    drop_off_pct: previous.and_then(|p| {
                        safe_div(users[i] as f64, p as f64).map(|r| round_to(100.0 * (1.0 - r), 1))
                    }),
                    step_conversion_pct: previous.and_then(|p| step_rate(p, users[i])),
                }
            })
            .collect();

        let rates = FunnelRates {
            pct_home_to_category: step_rate(users[0], users[1]),
            pct_category_to_product: step_rate(users[1], users[2]),
            pct_product_to_cart: step_rate(users[2], users[3]),
            pct_cart_to_purchase: step_rate(users[3], users[4]),
            pct_overall: step_rate(users[0], users[4]),
        };

        Self { stages, rates }
    }

    /// Stage with the largest drop-off, if any stage has one
    ///
    /// Ties go to the earlier stage.
    pub fn largest_drop_off(&self) -> Option<&StageRow> {
        self.stages
            .iter()
            .filter(|s| s.drop_off_pct.is_some())
            .fold(None, |best: Option<&StageRow>, s| match best {
                Some(b) if b.drop_off_pct >= s.drop_off_pct => Some(b),
                _ => Some(s),
            })
    }

    pub fn stage(&self, stage: FunnelStage) -> &StageRow {
        &self.stages[stage.index()]
    }
}

/// Conversion between two stages
///
/// Null when either stage recorded no users, which also covers a zero
/// denominator.
fn step_rate(from: u64, to: u64) -> Option<f64> {
    if from == 0 || to == 0 {
        return None;
    }
    pct(to as f64, from as f64, 1)
}

/// Compute the overall funnel over all events
pub fn funnel(dataset: &Dataset) -> Funnel {
    let counts = StageCounts::from_events(&dataset.events);
    let funnel = Funnel::from_counts(&counts);

    tracing::debug!(stages = ?counts.to_array(), "computed funnel");

    funnel
}

/// Funnel stage report
pub struct FunnelReport;

impl FunnelReport {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::required("stage", DataType::String),
            Column::required("users", DataType::Int64),
            Column::optional("conversion_from_top_pct", DataType::Float64),
            Column::optional("drop_off_pct", DataType::Float64),
            Column::optional("step_conversion_pct", DataType::Float64),
        ]
    }
}

impl Report for FunnelReport {
    fn run(&self, dataset: &Dataset, _settings: &ReportSettings) -> Result<QueryResult> {
        let funnel = funnel(dataset);
        Ok(QueryResult::from_records(Self::columns(), &funnel.stages)?)
    }

    fn name(&self) -> &'static str {
        "funnel"
    }
}

/// Single-row report of the named funnel rates
pub struct FunnelRatesReport;

impl FunnelRatesReport {
    pub fn columns() -> Vec<Column> {
        [
            "pct_home_to_category",
            "pct_category_to_product",
            "pct_product_to_cart",
            "pct_cart_to_purchase",
            "pct_overall",
        ]
        .into_iter()
        .map(|name| Column::optional(name, DataType::Float64))
        .collect()
    }
}

impl Report for FunnelRatesReport {
    fn run(&self, dataset: &Dataset, _settings: &ReportSettings) -> Result<QueryResult> {
        let funnel = funnel(dataset);
        Ok(QueryResult::from_records(Self::columns(), &[funnel.rates])?)
    }

    fn name(&self) -> &'static str {
        "funnel-rates"
    }
}
