//! Customer spend segmentation configuration

use serde::Deserialize;

/// A single spend tier
///
/// Tiers are right-inclusive: a tier covers `(previous upper, upper]`.
/// The first tier starts above zero and the last tier has no upper bound.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentTier {
    /// Display label (e.g., "VIP (>$400)")
    pub label: String,

    /// Inclusive upper bound on total spend; `None` means unbounded
    #[serde(default)]
    pub upper: Option<f64>,
}

impl SegmentTier {
    /// Create a bounded tier
    pub fn bounded(label: impl Into<String>, upper: f64) -> Self {
        Self {
            label: label.into(),
            upper: Some(upper),
        }
    }

    /// Create the open-ended top tier
    pub fn unbounded(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            upper: None,
        }
    }
}

/// Spend segmentation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentsConfig {
    /// Ordered spend tiers
    /// Default: Low (<$50), Mid ($50-$150), High ($150-$400), VIP (>$400)
    pub tiers: Vec<SegmentTier>,
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                SegmentTier::bounded("Low (<$50)", 50.0),
                SegmentTier::bounded("Mid ($50-$150)", 150.0),
                SegmentTier::bounded("High ($150-$400)", 400.0),
                SegmentTier::unbounded("VIP (>$400)"),
            ],
        }
    }
}
