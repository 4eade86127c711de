//! Report settings
//!
//! The tunable parts of every report, resolved from `retain_config::Config`.

use std::collections::BTreeSet;

use retain_config::{Config, SegmentTier};
use retain_query::Order;

/// Parameters shared by all reports
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Retention offsets `0..window_months` are reported
    pub window_months: u32,

    /// Order statuses that count as a purchase
    pub counted_statuses: BTreeSet<String>,

    /// Observed offsets a cohort needs to enter the matrix averages
    pub min_offsets: u32,

    /// Absolute z-score above which an order is a revenue outlier
    pub z_threshold: f64,

    /// Spend tiers, ascending, the last one unbounded
    pub tiers: Vec<SegmentTier>,
}

impl ReportSettings {
    /// Whether an order counts as a purchase
    ///
    /// An order with a null status never counts.
    pub fn is_counted(&self, order: &Order) -> bool {
        order
            .status
            .as_deref()
            .is_some_and(|s| self.counted_statuses.contains(s))
    }

    /// Orders that count as a purchase
    pub fn counted<'a>(&'a self, orders: &'a [Order]) -> impl Iterator<Item = &'a Order> + 'a {
        orders.iter().filter(|o| self.is_counted(o))
    }

    pub fn with_window(mut self, window_months: u32) -> Self {
        self.window_months = window_months;
        self
    }

    pub fn with_min_offsets(mut self, min_offsets: u32) -> Self {
        self.min_offsets = min_offsets;
        self
    }

    pub fn with_z_threshold(mut self, z_threshold: f64) -> Self {
        self.z_threshold = z_threshold;
        self
    }

    pub fn with_tiers(mut self, tiers: Vec<SegmentTier>) -> Self {
        self.tiers = tiers;
        self
    }
}

impl From<&Config> for ReportSettings {
    fn from(config: &Config) -> Self {
        Self {
            window_months: config.retention.window_months,
            counted_statuses: config.retention.counted_statuses.iter().cloned().collect(),
            min_offsets: config.retention.min_offsets,
            z_threshold: config.quality.z_threshold,
            tiers: config.segments.tiers.clone(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}
