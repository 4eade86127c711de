//! Tests for funnel stages and breakdowns

use crate::fixtures::{dataset_with_events, event, journey};
use crate::reports::funnel::{
    Dimension, Funnel, FunnelBreakdownReport, FunnelRates, FunnelStage, StageCounts, funnel,
    funnel_breakdown,
};
use crate::reports::Report;
use crate::settings::ReportSettings;
use retain_query::Event;

fn counts(home: i64, category: i64, product: i64, cart: i64, purchase: i64) -> StageCounts {
    let mut events: Vec<Event> = Vec::new();
    let stages = [
        ("home", home),
        ("category", category),
        ("product", product),
        ("cart", cart),
        ("purchase", purchase),
    ];
    for (stage, n) in stages {
        for user in 0..n {
            events.push(event(user, stage, "Search", "mobile"));
        }
    }
    StageCounts::from_events(&events)
}

#[test]
fn test_empty_stage_makes_step_rate_null() {
    let funnel = Funnel::from_counts(&counts(100, 40, 0, 0, 0));

    assert_eq!(funnel.rates.pct_home_to_category, Some(40.0));
    assert_eq!(funnel.rates.pct_category_to_product, None);
    assert_eq!(funnel.rates.pct_product_to_cart, None);
    assert_eq!(funnel.rates.pct_cart_to_purchase, None);
    assert_eq!(funnel.rates.pct_overall, None);
}

#[test]
fn test_stage_rows() {
    let funnel = Funnel::from_counts(&counts(200, 120, 90, 30, 12));
    let users: Vec<u64> = funnel.stages.iter().map(|s| s.users).collect();
    assert_eq!(users, vec![200, 120, 90, 30, 12]);

    let home = funnel.stage(FunnelStage::Home);
    assert_eq!(home.conversion_from_top_pct, Some(100.0));
    assert_eq!(home.drop_off_pct, None);
    assert_eq!(home.step_conversion_pct, None);

    let category = funnel.stage(FunnelStage::Category);
    assert_eq!(category.conversion_from_top_pct, Some(60.0));
    assert_eq!(category.drop_off_pct, Some(40.0));
    assert_eq!(category.step_conversion_pct, Some(60.0));

    let cart = funnel.stage(FunnelStage::Cart);
    assert_eq!(cart.drop_off_pct, Some(66.7));
    assert_eq!(cart.conversion_from_top_pct, Some(15.0));

    let purchase = funnel.stage(FunnelStage::Purchase);
    assert_eq!(purchase.conversion_from_top_pct, Some(6.0));
    assert_eq!(funnel.rates.pct_overall, Some(6.0));
    assert_eq!(funnel.rates.pct_cart_to_purchase, Some(40.0));
}

#[test]
fn test_largest_drop_off() {
    let funnel = Funnel::from_counts(&counts(200, 120, 90, 30, 12));
    let drop = funnel.largest_drop_off().unwrap();
    assert_eq!(drop.stage, FunnelStage::Cart);
}

#[test]
fn test_no_visitors() {
    let funnel = Funnel::from_counts(&counts(0, 0, 0, 0, 0));
    assert!(funnel.stages.iter().all(|s| s.conversion_from_top_pct.is_none()));
    assert!(funnel.stages.iter().all(|s| s.drop_off_pct.is_none()));
    assert!(funnel.largest_drop_off().is_none());
    assert_eq!(funnel.rates, FunnelRates::default());
}

#[test]
fn test_distinct_users_not_events() {
    let mut events = journey(1, "purchase", "Search", "mobile");
    events.extend(journey(1, "purchase", "Search", "mobile"));
    events.extend(journey(2, "cart", "Search", "mobile"));

    let funnel = funnel(&dataset_with_events(events));
    let users: Vec<u64> = funnel.stages.iter().map(|s| s.users).collect();
    assert_eq!(users, vec![2, 2, 2, 2, 1]);
}

fn breakdown_events() -> Vec<Event> {
    let mut events = Vec::new();
    // Email: 2 visitors, 1 buyer
    events.extend(journey(1, "purchase", "Email", "mobile"));
    events.extend(journey(2, "cart", "Email", "desktop"));
    // Search: 4 visitors, 1 buyer
    events.extend(journey(3, "purchase", "Search", "desktop"));
    for user in 4..7 {
        events.extend(journey(user, "home", "Search", "mobile"));
    }
    // Adwords: 1 visitor, no buyer
    events.extend(journey(7, "cart", "Adwords", "tablet"));
    // Organic: purchase without a home visit
    events.push(event(8, "purchase", "Organic", "mobile"));
    // Facebook: 1 visitor, 1 buyer
    events.extend(journey(9, "purchase", "Facebook", "mobile"));
    // null source is excluded
    let mut anonymous = event(10, "home", "x", "mobile");
    anonymous.traffic_source = None;
    events.push(anonymous);
    events
}

#[test]
fn test_breakdown_by_source_sorted() {
    let rows = funnel_breakdown(&breakdown_events(), Dimension::TrafficSource);
    let groups: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();

    assert_eq!(groups, vec!["Facebook", "Email", "Search", "Adwords", "Organic"]);

    let email = &rows[1];
    assert_eq!(email.home, 2);
    assert_eq!(email.cart, 2);
    assert_eq!(email.purchase, 1);
    assert_eq!(email.conversion_pct, Some(50.0));
    assert_eq!(email.cart_to_purchase_pct, Some(50.0));

    let search = &rows[2];
    assert_eq!(search.conversion_pct, Some(25.0));

    let adwords = &rows[3];
    assert_eq!(adwords.conversion_pct, Some(0.0));
    assert_eq!(adwords.cart_to_purchase_pct, Some(0.0));

    let organic = &rows[4];
    assert_eq!(organic.home, 0);
    assert_eq!(organic.conversion_pct, None);
    assert_eq!(organic.cart_to_purchase_pct, None);
}

#[test]
fn test_empty_purchase_stage_rules() {
    let events: Vec<Event> = (1..=4)
        .flat_map(|user| journey(user, "cart", "Adwords", "mobile"))
        .collect();

    // the named step rate treats an empty stage as unobserved
    let overall = funnel(&dataset_with_events(events.clone()));
    assert_eq!(overall.rates.pct_cart_to_purchase, None);

    // the breakdown only guards its denominator
    let rows = funnel_breakdown(&events, Dimension::TrafficSource);
    assert_eq!(rows[0].cart, 4);
    assert_eq!(rows[0].cart_to_purchase_pct, Some(0.0));
    assert_eq!(rows[0].conversion_pct, Some(0.0));
}

#[test]
fn test_breakdown_ties_by_name() {
    let mut events = journey(1, "purchase", "Zeta", "mobile");
    events.extend(journey(2, "purchase", "Alpha", "mobile"));
    let rows = funnel_breakdown(&events, Dimension::TrafficSource);
    assert_eq!(rows[0].group, "Alpha");
    assert_eq!(rows[1].group, "Zeta");
}

#[test]
fn test_breakdown_by_device() {
    let rows = funnel_breakdown(&breakdown_events(), Dimension::DeviceType);
    let groups: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(groups.len(), 3);
    assert!(groups.contains(&"tablet"));
    let total_home: u64 = rows.iter().map(|r| r.home).sum();
    assert_eq!(total_home, 9);
}

#[test]
fn test_breakdown_report_names_group_column() {
    let dataset = dataset_with_events(breakdown_events());
    let result = FunnelBreakdownReport::by_device()
        .run(&dataset, &ReportSettings::default())
        .unwrap();
    assert_eq!(result.columns[0].name, "device_type");
    assert_eq!(result.columns.len(), 8);
}
