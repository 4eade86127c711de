//! Command implementations for the Retain CLI

pub mod export;
pub mod output;
pub mod query;
pub mod report;
pub mod tables;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use retain_analytics::{ReportEngine, ReportSettings};
use retain_config::Config;
use retain_query::Dataset;

/// Input data location shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Directory holding the input CSV files (overrides [data] dir)
    #[arg(short, long, value_name = "DIR")]
    pub data: Option<PathBuf>,
}

impl DataArgs {
    /// CLI flag > config file
    pub fn dir(&self, config: &Config) -> PathBuf {
        self.data.clone().unwrap_or_else(|| config.data.dir.clone())
    }
}

/// Load the dataset and build a report engine from the config
pub fn report_engine(data: &DataArgs, config: &Config) -> Result<ReportEngine> {
    let dir = data.dir(config);
    let dataset = Dataset::load(&dir)
        .with_context(|| format!("failed to load data from {}", dir.display()))?;

    Ok(ReportEngine::new(dataset, ReportSettings::from(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_flag_overrides_config() {
        let config = Config::default();

        let args = DataArgs::default();
        assert_eq!(args.dir(&config), PathBuf::from("data"));

        let args = DataArgs {
            data: Some(PathBuf::from("/srv/shop")),
        };
        assert_eq!(args.dir(&config), PathBuf::from("/srv/shop"));
    }

    #[test]
    fn test_report_engine_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = DataArgs {
            data: Some(dir.path().join("absent")),
        };
        let err = report_engine(&args, &Config::default()).err().unwrap();
        assert!(err.to_string().contains("failed to load data"));
    }
}
