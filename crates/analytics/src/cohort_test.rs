//! Tests for cohort retention

use std::collections::HashMap;

use crate::fixtures::{at, complete, order};
use crate::month::Month;
use crate::reports::retention::{
    CohortRow, RetentionMatrix, assign_cohorts, cohort_retention, cohort_sizes, purchases,
};
use crate::settings::ReportSettings;
use retain_query::Order;

fn month(s: &str) -> Month {
    s.parse().unwrap()
}

fn row(cohort: &str, size: u64, offset: u32, retained: u64, pct: f64) -> CohortRow {
    CohortRow {
        cohort_month: month(cohort),
        cohort_size: size,
        month_offset: offset,
        retained_users: retained,
        retention_pct: Some(pct),
    }
}

fn three_users() -> Vec<Order> {
    vec![
        complete(1, 1, at(2024, 1, 5)),
        complete(2, 1, at(2024, 3, 9)),
        complete(3, 2, at(2024, 1, 20)),
        complete(4, 3, at(2024, 2, 2)),
    ]
}

#[test]
fn test_three_user_example() {
    let rows = cohort_retention(&three_users(), &ReportSettings::default());

    assert_eq!(
        rows,
        vec![
            row("2024-01", 2, 0, 2, 100.0),
            row("2024-01", 2, 2, 1, 50.0),
            row("2024-02", 1, 0, 1, 100.0),
        ]
    );
}

#[test]
fn test_uncounted_statuses_ignored() {
    let mut orders = three_users();
    // an earlier cancelled order must not move user 1's cohort
    orders.push(order(5, 1, "Cancelled", at(2023, 11, 1), 99.0));
    orders.push(order(6, 4, "Processing", at(2024, 1, 1), 10.0));

    let rows = cohort_retention(&orders, &ReportSettings::default());
    assert_eq!(rows[0], row("2024-01", 2, 0, 2, 100.0));
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_null_status_not_counted() {
    let mut orders = three_users();
    orders.push(Order {
        status: None,
        ..complete(7, 9, at(2024, 1, 1))
    });

    let rows = cohort_retention(&orders, &ReportSettings::default());
    assert_eq!(rows[0].cohort_size, 2);
}

#[test]
fn test_returned_and_shipped_count() {
    let orders = vec![
        order(1, 1, "Returned", at(2024, 5, 1), 10.0),
        order(2, 1, "Shipped", at(2024, 6, 1), 10.0),
    ];
    let rows = cohort_retention(&orders, &ReportSettings::default());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].month_offset, 1);
}

#[test]
fn test_calendar_offsets_not_elapsed_days() {
    // one day apart, across a month boundary and a year boundary
    let orders = vec![
        complete(1, 1, at(2023, 12, 31)),
        complete(2, 1, at(2024, 1, 1)),
    ];
    let rows = cohort_retention(&orders, &ReportSettings::default());
    assert_eq!(rows[1].month_offset, 1);
    assert_eq!(rows[1].cohort_month, month("2023-12"));
}

#[test]
fn test_window_excludes_late_offsets_but_keeps_size() {
    let orders = vec![
        complete(1, 1, at(2024, 1, 1)),
        complete(2, 1, at(2025, 1, 1)),
        complete(3, 2, at(2024, 1, 1)),
    ];
    let rows = cohort_retention(&orders, &ReportSettings::default());

    // offset 12 is outside the default window
    assert_eq!(rows, vec![row("2024-01", 2, 0, 2, 100.0)]);

    let wide = ReportSettings::default().with_window(13);
    let rows = cohort_retention(&orders, &wide);
    assert_eq!(rows[1], row("2024-01", 2, 12, 1, 50.0));
}

#[test]
fn test_orders_without_user_or_timestamp_skipped() {
    let mut orders = three_users();
    orders.push(Order {
        user_id: None,
        ..complete(8, 0, at(2024, 1, 1))
    });
    orders.push(Order {
        created_at: None,
        ..complete(9, 5, at(2024, 1, 1))
    });

    let rows = cohort_retention(&orders, &ReportSettings::default());
    assert_eq!(rows, cohort_retention(&three_users(), &ReportSettings::default()));
}

#[test]
fn test_repeat_orders_in_month_counted_once() {
    let orders = vec![
        complete(1, 1, at(2024, 1, 1)),
        complete(2, 1, at(2024, 1, 2)),
        complete(3, 1, at(2024, 1, 3)),
    ];
    let rows = cohort_retention(&orders, &ReportSettings::default());
    assert_eq!(rows, vec![row("2024-01", 1, 0, 1, 100.0)]);
}

#[test]
fn test_invariants_hold() {
    let mut orders = Vec::new();
    let mut id = 0;
    for user in 1..=40i64 {
        let first = (user % 6) as u32 + 1;
        for k in 0..(user % 5) as u32 + 1 {
            id += 1;
            let m = first + k * (user as u32 % 3 + 1);
            let (y, m) = if m > 12 { (2024, m - 12) } else { (2023, m) };
            orders.push(complete(id, user, at(y, m, 10)));
        }
    }
    let settings = ReportSettings::default();
    let rows = cohort_retention(&orders, &settings);

    // sizes match the independent cohort assignment
    let cohorts = assign_cohorts(&purchases(&orders, &settings));
    let sizes = cohort_sizes(&cohorts);
    let total: u64 = sizes.values().sum();
    assert_eq!(total, 40);

    for r in &rows {
        assert_eq!(Some(&r.cohort_size), sizes.get(&r.cohort_month));
        assert!(r.retained_users <= r.cohort_size);
        assert!(r.retained_users > 0);
        assert!(r.cohort_size > 0);
        assert!(r.month_offset < 12);
        let pct = r.retention_pct.unwrap();
        assert!((0.0..=100.0).contains(&pct));
        if r.month_offset == 0 {
            assert_eq!(r.retained_users, r.cohort_size);
        }
    }

    // sorted by cohort then offset
    let keys: Vec<(Month, u32)> = rows.iter().map(|r| (r.cohort_month, r.month_offset)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    // every cohort has an offset-0 row
    let with_zero: HashMap<Month, bool> = rows
        .iter()
        .filter(|r| r.month_offset == 0)
        .map(|r| (r.cohort_month, true))
        .collect();
    assert_eq!(with_zero.len(), sizes.len());
}

#[test]
fn test_idempotent_and_order_independent() {
    let settings = ReportSettings::default();
    let orders = three_users();
    let mut reversed = orders.clone();
    reversed.reverse();

    let first = cohort_retention(&orders, &settings);
    assert_eq!(first, cohort_retention(&orders, &settings));
    assert_eq!(first, cohort_retention(&reversed, &settings));
}

#[test]
fn test_empty_input() {
    let rows = cohort_retention(&[], &ReportSettings::default());
    assert!(rows.is_empty());
    assert!(RetentionMatrix::from_rows(&rows, 12).rows().is_empty());
}

#[test]
fn test_custom_counted_statuses() {
    let orders = vec![
        order(1, 1, "Complete", at(2024, 1, 1), 10.0),
        order(2, 2, "Shipped", at(2024, 1, 1), 10.0),
    ];
    let mut settings = ReportSettings::default();
    settings.counted_statuses = ["Complete".to_string()].into_iter().collect();

    let rows = cohort_retention(&orders, &settings);
    assert_eq!(rows, vec![row("2024-01", 1, 0, 1, 100.0)]);
}
