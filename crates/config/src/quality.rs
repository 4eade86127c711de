//! Data-quality audit configuration

use serde::Deserialize;

/// Data-quality audit settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Absolute z-score above which an order's revenue is flagged
    /// Default: 3.0
    pub z_threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self { z_threshold: 3.0 }
    }
}
