//! Retain Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid config - only specify what you need to change.
//!
//! # Parsing
//!
//! ```
//! use retain_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[retention]\nwindow_months = 6").unwrap();
//! assert_eq!(config.retention.window_months, 6);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "console"
//!
//! [data]
//! dir = "data"
//!
//! [retention]
//! window_months = 12
//! counted_statuses = ["Complete", "Returned", "Shipped"]
//! min_offsets = 3
//!
//! [quality]
//! z_threshold = 3.0
//!
//! [segments]
//! tiers = [
//!   { label = "Low (<$50)", upper = 50.0 },
//!   { label = "VIP (>$50)" },
//! ]
//! ```

mod data;
mod error;
mod logging;
mod quality;
mod retention;
mod segments;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use data::DataConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use quality::QualityConfig;
pub use retention::RetentionConfig;
pub use segments::{SegmentTier, SegmentsConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Input data location
    pub data: DataConfig,

    /// Cohort retention settings
    pub retention: RetentionConfig,

    /// Data-quality audit settings
    pub quality: QualityConfig,

    /// Customer spend segmentation tiers
    pub segments: SegmentsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML,
    /// or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Load from a file if one is given, otherwise try the default locations
    ///
    /// Falls back to `Config::default()` when no file is found. An explicitly
    /// given path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        for candidate in DEFAULT_PATHS {
            let candidate = Path::new(candidate);
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }

        Ok(Self::default())
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks window bounds, the counted status set, the outlier threshold
    /// and segment tier ordering.
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

/// Locations searched when no config path is given
const DEFAULT_PATHS: &[&str] = &["configs/retain.toml", "retain.toml"];

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
