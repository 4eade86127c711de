//! CSV loading through polars
//!
//! Reads each table's CSV into a `DataFrame` of text columns, then
//! converts columns to their schema types. Values that cannot be converted
//! become nulls rather than errors; the data-quality audit reports them.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::error::QueryError;
use crate::result::DataType as ColumnType;

/// Timestamp layouts accepted in input files, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Read a CSV file with a header row into a `DataFrame`
///
/// Every column is read as text; no type is guessed from a sample of rows.
pub fn read_csv(table: &str, path: &Path) -> Result<DataFrame, QueryError> {
    if !path.exists() {
        return Err(QueryError::TableNotFound {
            table: table.to_string(),
            path: path.display().to_string(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    tracing::debug!(
        table = table,
        rows = df.height(),
        cols = df.width(),
        path = %path.display(),
        "read CSV"
    );

    Ok(df)
}

/// Cast the numeric columns of a text frame to their schema types
///
/// Unparseable values become null. Text and timestamp columns are left as
/// written, as are columns outside the schema.
pub fn cast_columns(
    mut df: DataFrame,
    schema: &[(&str, ColumnType)],
) -> Result<DataFrame, QueryError> {
    for (name, ty) in schema {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let series = column.as_materialized_series();
        let cast = match ty {
            ColumnType::Int64 => Series::new(series.name().clone(), int_values(series)?),
            ColumnType::Float64 => Series::new(series.name().clone(), float_values(series)?),
            _ => continue,
        };
        df.with_column(cast)?;
    }
    Ok(df)
}

/// Integer values; floats such as `12.0` are truncated
fn int_values(series: &Series) -> Result<Vec<Option<i64>>, QueryError> {
    let ints = series.cast(&DataType::Int64)?;
    let floats = float_values(series)?;
    Ok(ints
        .i64()?
        .into_iter()
        .zip(floats)
        .map(|(i, f)| i.or_else(|| f.map(|f| f.trunc() as i64)))
        .collect())
}

/// Finite floating point values
fn float_values(series: &Series) -> Result<Vec<Option<f64>>, QueryError> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|f| f.is_finite()))
        .collect())
}

/// Column accessor bound to one table, for error messages
pub struct Columns<'a> {
    table: &'a str,
    df: &'a DataFrame,
}

impl<'a> Columns<'a> {
    pub fn new(table: &'a str, df: &'a DataFrame) -> Self {
        Self { table, df }
    }

    fn series(&self, name: &str) -> Result<&'a Series, QueryError> {
        let column = self
            .df
            .column(name)
            .map_err(|_| QueryError::missing_column(self.table, name))?;
        Ok(column.as_materialized_series())
    }

    /// Integer column (floats such as `12.0` are truncated)
    pub fn i64(&self, name: &str) -> Result<Vec<Option<i64>>, QueryError> {
        int_values(self.series(name)?)
    }

    /// Floating point column
    pub fn f64(&self, name: &str) -> Result<Vec<Option<f64>>, QueryError> {
        float_values(self.series(name)?)
    }

    /// String column; empty strings are treated as null
    pub fn string(&self, name: &str) -> Result<Vec<Option<String>>, QueryError> {
        let series = self.series(name)?.cast(&DataType::String)?;
        Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from))
            .collect())
    }

    /// Timestamp column parsed from text; unparseable values become null
    pub fn timestamp(&self, name: &str) -> Result<Vec<Option<NaiveDateTime>>, QueryError> {
        let raw = self.string(name)?;
        let mut unparsed = 0usize;

        let values: Vec<Option<NaiveDateTime>> = raw
            .into_iter()
            .map(|v| {
                let v = v?;
                let parsed = parse_timestamp(&v);
                if parsed.is_none() {
                    unparsed += 1;
                }
                parsed
            })
            .collect();

        if unparsed > 0 {
            tracing::warn!(
                table = self.table,
                column = name,
                count = unparsed,
                "unparseable timestamps treated as null"
            );
        }

        Ok(values)
    }
}

/// Parse a timestamp in any accepted layout
///
/// Values with a UTC offset are converted to UTC and the offset dropped;
/// a bare date is taken as midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    // pandas writes tz-aware values as "2024-01-05 10:00:00+00:00"
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
