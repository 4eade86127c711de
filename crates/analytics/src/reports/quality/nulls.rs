//! Null counts per field

use serde::Serialize;

use crate::ratio::pct;
use retain_query::{Dataset, TableRecord};

/// Nulls in one field of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullRow {
    pub table: &'static str,
    pub field: &'static str,
    pub null_count: u64,
    /// `round(100 * nulls / rows, 2)`; null for an empty table
    pub null_pct: Option<f64>,
}

/// Null count for every field of a table, in column order
pub fn null_counts<T: TableRecord>(records: &[T]) -> Vec<NullRow> {
    let mut counts = vec![0u64; T::COLUMNS.len()];
    for record in records {
        for (count, is_null) in counts.iter_mut().zip(record.null_mask()) {
            if is_null {
                *count += 1;
            }
        }
    }

    T::COLUMNS
        .iter()
        .zip(counts)
        .map(|(field, null_count)| NullRow {
            table: T::TABLE,
            field: *field,
            null_count,
            null_pct: pct(null_count as f64, records.len() as f64, 2),
        })
        .collect()
}

/// Null counts for every table
pub fn null_audit(dataset: &Dataset) -> Vec<NullRow> {
    let mut rows = null_counts(&dataset.events);
    rows.extend(null_counts(&dataset.users));
    rows.extend(null_counts(&dataset.orders));
    rows.extend(null_counts(&dataset.order_items));
    rows.extend(null_counts(&dataset.products));
    rows
}
