//! Record builders for tests

use chrono::{NaiveDate, NaiveDateTime};
use retain_query::{Dataset, Event, Order, User};

/// Midday on the given date
pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn order(order_id: i64, user_id: i64, status: &str, ts: NaiveDateTime, price: f64) -> Order {
    Order {
        order_id: Some(order_id),
        user_id: Some(user_id),
        status: Some(status.to_string()),
        num_of_item: Some(1),
        total_sale_price: Some(price),
        created_at: Some(ts),
        traffic_source: Some("Search".to_string()),
    }
}

/// Complete order priced at 10
pub fn complete(order_id: i64, user_id: i64, ts: NaiveDateTime) -> Order {
    order(order_id, user_id, "Complete", ts, 10.0)
}

pub fn event(user_id: i64, event_type: &str, source: &str, device: &str) -> Event {
    Event {
        event_id: None,
        session_id: Some(user_id * 100),
        user_id: Some(user_id),
        event_type: Some(event_type.to_string()),
        created_at: Some(at(2024, 1, 15)),
        device_type: Some(device.to_string()),
        browser: Some("Chrome".to_string()),
        traffic_source: Some(source.to_string()),
        uri: Some("/".to_string()),
        product_id: None,
    }
}

/// Events walking `user_id` down the funnel to (and including) `last`
pub fn journey(user_id: i64, last: &str, source: &str, device: &str) -> Vec<Event> {
    let stages = ["home", "category", "product", "cart", "purchase"];
    let Some(end) = stages.iter().position(|s| *s == last) else {
        return Vec::new();
    };
    stages[..=end]
        .iter()
        .map(|stage| event(user_id, stage, source, device))
        .collect()
}

pub fn user(user_id: i64) -> User {
    User {
        user_id: Some(user_id),
        age: Some(30),
        gender: Some("F".to_string()),
        country: Some("United States".to_string()),
        state: Some("Texas".to_string()),
        traffic_source: Some("Search".to_string()),
        created_at: Some(at(2023, 12, 1)),
    }
}

pub fn dataset_with_orders(orders: Vec<Order>) -> Dataset {
    Dataset {
        orders,
        ..Default::default()
    }
}

pub fn dataset_with_events(events: Vec<Event>) -> Dataset {
    Dataset {
        events,
        ..Default::default()
    }
}
