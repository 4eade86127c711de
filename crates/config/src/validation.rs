//! Configuration validation
//!
//! Validates config consistency:
//! - Retention window is within 1..=120 months
//! - At least one counted order status
//! - The matrix minimum does not exceed the window
//! - Outlier threshold is a positive finite number
//! - Segment tiers are strictly increasing with only the last one unbounded

use crate::Config;
use crate::error::{ConfigError, Result};

/// Upper bound on the retention window (ten years)
const MAX_WINDOW_MONTHS: u32 = 120;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_retention(config)?;
    validate_quality(config)?;
    validate_segments(config)?;
    Ok(())
}

fn validate_retention(config: &Config) -> Result<()> {
    let retention = &config.retention;

    if retention.window_months == 0 || retention.window_months > MAX_WINDOW_MONTHS {
        return Err(ConfigError::invalid_value(
            "retention",
            "window_months",
            format!("must be between 1 and {}", MAX_WINDOW_MONTHS),
        ));
    }

    if retention.counted_statuses.is_empty()
        || retention.counted_statuses.iter().any(|s| s.trim().is_empty())
    {
        return Err(ConfigError::missing_field("retention", "counted_statuses"));
    }

    if retention.min_offsets > retention.window_months {
        return Err(ConfigError::invalid_value(
            "retention",
            "min_offsets",
            format!(
                "{} exceeds window_months ({})",
                retention.min_offsets, retention.window_months
            ),
        ));
    }

    Ok(())
}

fn validate_quality(config: &Config) -> Result<()> {
    let threshold = config.quality.z_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ConfigError::invalid_value(
            "quality",
            "z_threshold",
            format!("must be a positive number, got {}", threshold),
        ));
    }
    Ok(())
}

fn validate_segments(config: &Config) -> Result<()> {
    let tiers = &config.segments.tiers;
    if tiers.is_empty() {
        return Err(ConfigError::missing_field("segments", "tiers"));
    }

    let last = tiers.len() - 1;
    let mut previous = 0.0_f64;

    for (i, tier) in tiers.iter().enumerate() {
        match tier.upper {
            Some(upper) => {
                if !upper.is_finite() || upper <= previous {
                    return Err(ConfigError::invalid_value(
                        "segments",
                        "tiers",
                        format!(
                            "tier '{}' upper bound {} must be greater than {}",
                            tier.label, upper, previous
                        ),
                    ));
                }
                previous = upper;
            }
            None if i != last => {
                return Err(ConfigError::invalid_value(
                    "segments",
                    "tiers",
                    format!("only the last tier may be unbounded, '{}' is not last", tier.label),
                ));
            }
            None => {}
        }
    }

    Ok(())
}
