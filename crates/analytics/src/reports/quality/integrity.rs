//! Duplicates, orphaned foreign keys and unknown categorical values

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use crate::reports::funnel::FunnelStage;
use retain_query::{Dataset, Event, Order, OrderItem, OrderStatus, Product, TableRecord, User};

/// A (session, event type) pair seen more than once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub session_id: i64,
    pub event_type: String,
    pub occurrences: u64,
}

/// A count attached to one field of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCount {
    pub table: &'static str,
    pub field: &'static str,
    pub count: u64,
}

/// Pairs occurring more than once, sorted by session then event type
///
/// Events missing either field are not paired.
pub fn duplicate_session_events(events: &[Event]) -> Vec<DuplicatePair> {
    let mut pairs: BTreeMap<(i64, &str), u64> = BTreeMap::new();
    for event in events {
        if let (Some(session_id), Some(event_type)) = (event.session_id, event.event_type.as_deref())
        {
            *pairs.entry((session_id, event_type)).or_insert(0) += 1;
        }
    }

    pairs
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|((session_id, event_type), occurrences)| DuplicatePair {
            session_id,
            event_type: event_type.to_string(),
            occurrences,
        })
        .collect()
}

/// Number of distinct values occurring more than once
fn repeated<K: Eq + Hash>(keys: impl IntoIterator<Item = K>) -> u64 {
    let mut seen: HashMap<K, u64> = HashMap::new();
    for key in keys {
        *seen.entry(key).or_insert(0) += 1;
    }
    seen.values().filter(|n| **n > 1).count() as u64
}

fn key_count<T: TableRecord>(field: &'static str, keys: impl IntoIterator<Item = i64>) -> FieldCount {
    FieldCount {
        table: T::TABLE,
        field,
        count: repeated(keys),
    }
}

/// Primary keys shared by more than one row, per table
pub fn duplicate_keys(dataset: &Dataset) -> Vec<FieldCount> {
    vec![
        key_count::<Event>("event_id", dataset.events.iter().filter_map(|e| e.event_id)),
        key_count::<User>("user_id", dataset.users.iter().filter_map(|u| u.user_id)),
        key_count::<Order>("order_id", dataset.orders.iter().filter_map(|o| o.order_id)),
        key_count::<OrderItem>(
            "order_item_id",
            dataset.order_items.iter().filter_map(|i| i.order_item_id),
        ),
        key_count::<Product>(
            "product_id",
            dataset.products.iter().filter_map(|p| p.product_id),
        ),
    ]
}

fn orphans(
    table: &'static str,
    field: &'static str,
    refs: impl IntoIterator<Item = Option<i64>>,
    known: &HashSet<i64>,
) -> FieldCount {
    let count = refs
        .into_iter()
        .flatten()
        .filter(|id| !known.contains(id))
        .count() as u64;
    FieldCount { table, field, count }
}

/// Rows whose non-null foreign key points at no existing row
///
/// Checks events and orders against users, and order items against
/// orders and products. Null keys are counted by the null audit instead.
pub fn orphaned_keys(dataset: &Dataset) -> Vec<FieldCount> {
    let users: HashSet<i64> = dataset.users.iter().filter_map(|u| u.user_id).collect();
    let orders: HashSet<i64> = dataset.orders.iter().filter_map(|o| o.order_id).collect();
    let products: HashSet<i64> = dataset.products.iter().filter_map(|p| p.product_id).collect();

    vec![
        orphans(Event::TABLE, "user_id", dataset.events.iter().map(|e| e.user_id), &users),
        orphans(Order::TABLE, "user_id", dataset.orders.iter().map(|o| o.user_id), &users),
        orphans(
            OrderItem::TABLE,
            "order_id",
            dataset.order_items.iter().map(|i| i.order_id),
            &orders,
        ),
        orphans(
            OrderItem::TABLE,
            "product_id",
            dataset.order_items.iter().map(|i| i.product_id),
            &products,
        ),
    ]
}

/// Non-null categorical values outside the known vocabulary
pub fn unknown_values(dataset: &Dataset) -> Vec<FieldCount> {
    let statuses = dataset
        .orders
        .iter()
        .filter_map(|o| o.status.as_deref())
        .filter(|s| OrderStatus::parse(s).is_none())
        .count() as u64;
    let event_types = dataset
        .events
        .iter()
        .filter_map(|e| e.event_type.as_deref())
        .filter(|t| FunnelStage::parse(t).is_none())
        .count() as u64;

    vec![
        FieldCount {
            table: Order::TABLE,
            field: "status",
            count: statuses,
        },
        FieldCount {
            table: Event::TABLE,
            field: "event_type",
            count: event_types,
        },
    ]
}
