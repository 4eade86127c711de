//! Export command - Write every report as CSV
//!
//! Reports are computed concurrently over one loaded snapshot and written
//! as `<report>.csv` into the output directory, which is created if
//! needed. Existing files with the same names are overwritten.
//!
//! # Usage
//!
//! ```bash
//! retain export --out reports/
//! retain export --out reports/ --data /srv/thelook
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use retain_analytics::ReportEngine;
use retain_config::Config;

use super::{DataArgs, report_engine};

/// Export command arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory to write the CSV files into
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Run the export command
pub async fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let engine = report_engine(&args.data, config)?;
    let written = export_all(&engine, &args.out)?;

    eprintln!("\n{} report(s) written to {}", written.len(), args.out.display());

    Ok(())
}

/// Write every report into `out`, returning the paths written
///
/// A failing report does not stop the others; the export as a whole fails
/// afterwards if any report did.
pub fn export_all(engine: &ReportEngine, out: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory: {}", out.display()))?;

    let mut written = Vec::new();
    let mut failed = Vec::new();

    for (kind, result) in engine.run_all() {
        let result = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(report = %kind, error = %e, "report failed");
                failed.push(kind.to_string());
                continue;
            }
        };

        let path = out.join(format!("{}.csv", kind.file_stem()));
        fs::write(&path, result.to_csv())
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(
            report = %kind,
            rows = result.row_count,
            path = %path.display(),
            "report exported"
        );
        written.push(path);
    }

    if !failed.is_empty() {
        anyhow::bail!("{} report(s) failed: {}", failed.len(), failed.join(", "));
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_analytics::{ReportKind, ReportSettings};
    use retain_query::Dataset;

    const TABLES: &[(&str, &str)] = &[
        (
            "events.csv",
            "event_id,session_id,user_id,event_type,created_at,device_type,browser,traffic_source,uri,product_id\n\
             1,100,1,home,2024-01-03 10:00:00,mobile,Chrome,Search,/,\n\
             2,100,1,purchase,2024-01-03 10:04:00,mobile,Chrome,Search,/purchase,10\n",
        ),
        (
            "users.csv",
            "user_id,age,gender,country,state,traffic_source,created_at\n\
             1,34,F,United States,California,Search,2023-12-01 08:00:00\n",
        ),
        (
            "orders.csv",
            "order_id,user_id,status,num_of_item,total_sale_price,created_at,traffic_source\n\
             10,1,Complete,1,59.5,2024-01-03 10:04:00,Search\n\
             11,1,Shipped,1,20.0,2024-02-01 12:00:00,Search\n",
        ),
        (
            "order_items.csv",
            "order_item_id,order_id,user_id,product_id,status,sale_price,created_at,shipped_at,returned_at\n\
             1000,10,1,10,Complete,59.5,2024-01-03 10:04:00,,\n",
        ),
        (
            "products.csv",
            "product_id,product_name,category,brand,retail_price,cost,department\n\
             10,Slim Jeans,Jeans,Levi's,59.5,12.1,Women\n",
        ),
    ];

    fn engine(dir: &Path) -> ReportEngine {
        for (name, contents) in TABLES {
            fs::write(dir.join(name), contents).unwrap();
        }
        ReportEngine::new(Dataset::load(dir).unwrap(), ReportSettings::default())
    }

    #[test]
    fn test_export_writes_every_report() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let out_dir = out.path().join("nested").join("reports");

        let written = export_all(&engine(data.path()), &out_dir).unwrap();
        assert_eq!(written.len(), ReportKind::ALL.len());

        for kind in ReportKind::ALL {
            let path = out_dir.join(format!("{}.csv", kind.file_stem()));
            assert!(path.exists(), "missing {}", path.display());
        }

        let cohort = fs::read_to_string(out_dir.join("cohort_retention.csv")).unwrap();
        let lines: Vec<&str> = cohort.lines().collect();
        assert_eq!(
            lines[0],
            "cohort_month,cohort_size,month_offset,retained_users,retention_pct"
        );
        assert_eq!(lines[1], "2024-01,1,0,1,100.0");
        assert_eq!(lines[2], "2024-01,1,1,1,100.0");
    }

    #[test]
    fn test_export_overwrites_existing_files() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let stale = out.path().join("monthly_trend.csv");
        fs::write(&stale, "stale").unwrap();

        export_all(&engine(data.path()), out.path()).unwrap();

        let trend = fs::read_to_string(&stale).unwrap();
        assert!(trend.starts_with("month,unique_visitors,"));
    }
}
