//! Funnel conversion broken down by an event dimension

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::ratio::pct;
use crate::reports::Report;
use crate::reports::funnel::{FunnelStage, StageCounts};
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, Event, QueryResult};

/// Event field to group the funnel by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    TrafficSource,
    DeviceType,
}

impl Dimension {
    /// Column name on the events table
    pub fn column(&self) -> &'static str {
        match self {
            Self::TrafficSource => "traffic_source",
            Self::DeviceType => "device_type",
        }
    }

    fn value<'a>(&self, event: &'a Event) -> Option<&'a str> {
        match self {
            Self::TrafficSource => event.traffic_source.as_deref(),
            Self::DeviceType => event.device_type.as_deref(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Funnel counts for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub group: String,
    pub home: u64,
    pub category: u64,
    pub product: u64,
    pub cart: u64,
    pub purchase: u64,
    /// `round(100 * purchase / home, 2)`
    pub conversion_pct: Option<f64>,
    /// `round(100 * purchase / cart, 1)`; 0.0 for carts without purchases
    pub cart_to_purchase_pct: Option<f64>,
}

impl BreakdownRow {
    fn new(group: String, counts: &StageCounts) -> Self {
        let users = counts.to_array();
        let [home, category, product, cart, purchase] = users;
        Self {
            group,
            home,
            category,
            product,
            cart,
            purchase,
            conversion_pct: pct(purchase as f64, home as f64, 2),
            cart_to_purchase_pct: pct(purchase as f64, cart as f64, 1),
        }
    }

    pub fn users(&self, stage: FunnelStage) -> u64 {
        match stage {
            FunnelStage::Home => self.home,
            FunnelStage::Category => self.category,
            FunnelStage::Product => self.product,
            FunnelStage::Cart => self.cart,
            FunnelStage::Purchase => self.purchase,
        }
    }
}

/// Conversion descending with nulls last, then group name
fn by_conversion(a: &BreakdownRow, b: &BreakdownRow) -> Ordering {
    let conversion = match (a.conversion_pct, b.conversion_pct) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    conversion.then_with(|| a.group.cmp(&b.group))
}

/// Group events by `dimension` and count each group's funnel
///
/// Events whose dimension is null are left out.
pub fn funnel_breakdown(events: &[Event], dimension: Dimension) -> Vec<BreakdownRow> {
    let mut groups: BTreeMap<&str, StageCounts> = BTreeMap::new();
    let mut skipped = 0usize;

    for event in events {
        match dimension.value(event) {
            Some(group) => groups.entry(group).or_default().add(event),
            None => skipped += 1,
        }
    }

    let mut rows: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|(group, counts)| BreakdownRow::new(group.to_string(), &counts))
        .collect();
    rows.sort_by(by_conversion);

    tracing::debug!(
        dimension = %dimension,
        groups = rows.len(),
        skipped = skipped,
        "computed funnel breakdown"
    );

    rows
}

/// Funnel breakdown report
pub struct FunnelBreakdownReport {
    dimension: Dimension,
}

impl FunnelBreakdownReport {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    pub fn by_source() -> Self {
        Self::new(Dimension::TrafficSource)
    }

    pub fn by_device() -> Self {
        Self::new(Dimension::DeviceType)
    }

    /// Columns, with the group column named after the dimension
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![Column::required("group", DataType::String)];
        for stage in FunnelStage::ALL {
            columns.push(Column::required(stage.as_str(), DataType::Int64));
        }
        columns.push(Column::optional("conversion_pct", DataType::Float64));
        columns.push(Column::optional("cart_to_purchase_pct", DataType::Float64));
        columns
    }
}

impl Report for FunnelBreakdownReport {
    fn run(&self, dataset: &Dataset, _settings: &ReportSettings) -> Result<QueryResult> {
        let rows = funnel_breakdown(&dataset.events, self.dimension);
        let mut result = QueryResult::from_records(self.columns(), &rows)?;
        result.columns[0].name = self.dimension.column().to_string();
        Ok(result)
    }

    fn name(&self) -> &'static str {
        match self.dimension {
            Dimension::TrafficSource => "funnel-by-source",
            Dimension::DeviceType => "funnel-by-device",
        }
    }
}
