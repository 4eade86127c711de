//! Dense retention matrix (cohort x offset)

use serde_json::Value;

use crate::error::Result;
use crate::month::Month;
use crate::ratio::{mean, round_to};
use crate::reports::Report;
use crate::reports::retention::cohort::{CohortRow, cohort_retention};
use crate::settings::ReportSettings;
use retain_query::{Column, DataType, Dataset, QueryResult};

/// One cohort's retention by offset; missing offsets are `None`
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub cohort_month: Month,
    pub cohort_size: u64,
    pub cells: Vec<Option<f64>>,
}

impl MatrixRow {
    /// Offsets with an observed retention value
    pub fn observed(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Retention heatmap built from the sparse cohort rows
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionMatrix {
    window: u32,
    rows: Vec<MatrixRow>,
}

impl RetentionMatrix {
    /// Pivot sparse rows (already sorted by cohort) into one row per cohort
    pub fn from_rows(rows: &[CohortRow], window: u32) -> Self {
        let mut matrix: Vec<MatrixRow> = Vec::new();

        for row in rows {
            let new_cohort = matrix
                .last()
                .is_none_or(|last| last.cohort_month != row.cohort_month);
            if new_cohort {
                matrix.push(MatrixRow {
                    cohort_month: row.cohort_month,
                    cohort_size: row.cohort_size,
                    cells: vec![None; window as usize],
                });
            }
            let Some(current) = matrix.last_mut() else {
                continue;
            };
            if let Some(cell) = current.cells.get_mut(row.month_offset as usize) {
                *cell = row.retention_pct;
            }
        }

        Self {
            window,
            rows: matrix,
        }
    }

    /// Keep only cohorts with at least `min_offsets` observed offsets
    pub fn with_min_offsets(mut self, min_offsets: u32) -> Self {
        self.rows.retain(|r| r.observed() >= min_offsets as usize);
        self
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// Mean retention at `offset` across cohorts that observed it
    ///
    /// Rounded to one decimal; `None` when no cohort has the offset.
    pub fn average_at(&self, offset: u32) -> Option<f64> {
        let values: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|r| r.cells.get(offset as usize).copied().flatten())
            .collect();
        mean(&values).map(|m| round_to(m, 1))
    }

    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![
            Column::required("cohort_month", DataType::String),
            Column::required("cohort_size", DataType::Int64),
        ];
        for offset in 0..self.window {
            columns.push(Column::optional(format!("m{}", offset), DataType::Float64));
        }
        columns
    }

    pub fn to_result(&self) -> QueryResult {
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut row = Vec::with_capacity(r.cells.len() + 2);
                row.push(Value::String(r.cohort_month.to_string()));
                row.push(Value::from(r.cohort_size));
                row.extend(r.cells.iter().map(|c| match c {
                    Some(v) => Value::from(*v),
                    None => Value::Null,
                }));
                row
            })
            .collect();

        QueryResult::new(self.columns(), rows, 0)
    }
}

/// Build the filtered retention matrix for a dataset
pub fn retention_matrix(dataset: &Dataset, settings: &ReportSettings) -> RetentionMatrix {
    let rows = cohort_retention(&dataset.orders, settings);
    RetentionMatrix::from_rows(&rows, settings.window_months).with_min_offsets(settings.min_offsets)
}

/// Retention matrix report
pub struct RetentionMatrixReport;

impl Report for RetentionMatrixReport {
    fn run(&self, dataset: &Dataset, settings: &ReportSettings) -> Result<QueryResult> {
        Ok(retention_matrix(dataset, settings).to_result())
    }

    fn name(&self) -> &'static str {
        "matrix"
    }
}
