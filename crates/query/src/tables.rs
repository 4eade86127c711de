//! Typed records for the five input tables
//!
//! Every field is optional: a null in the input is kept as `None` so the
//! data-quality audit can count it, and each report decides for itself
//! whether a record without the field participates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Common shape of an input table's records
pub trait TableRecord {
    /// Logical table name (also the CSV file stem)
    const TABLE: &'static str;

    /// Column names in input order
    const COLUMNS: &'static [&'static str];

    /// Whether each column is null for this record, aligned with `COLUMNS`
    fn null_mask(&self) -> Vec<bool>;
}

/// Web event (one step of a browsing session)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Option<i64>,
    pub session_id: Option<i64>,
    pub user_id: Option<i64>,
    pub event_type: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub traffic_source: Option<String>,
    pub uri: Option<String>,
    pub product_id: Option<i64>,
}

impl TableRecord for Event {
    const TABLE: &'static str = "events";
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "session_id",
        "user_id",
        "event_type",
        "created_at",
        "device_type",
        "browser",
        "traffic_source",
        "uri",
        "product_id",
    ];

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.event_id.is_none(),
            self.session_id.is_none(),
            self.user_id.is_none(),
            self.event_type.is_none(),
            self.created_at.is_none(),
            self.device_type.is_none(),
            self.browser.is_none(),
            self.traffic_source.is_none(),
            self.uri.is_none(),
            self.product_id.is_none(),
        ]
    }
}

/// Registered user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Option<i64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub traffic_source: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl TableRecord for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "age",
        "gender",
        "country",
        "state",
        "traffic_source",
        "created_at",
    ];

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.user_id.is_none(),
            self.age.is_none(),
            self.gender.is_none(),
            self.country.is_none(),
            self.state.is_none(),
            self.traffic_source.is_none(),
            self.created_at.is_none(),
        ]
    }
}

/// Order header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub num_of_item: Option<i64>,
    pub total_sale_price: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
    pub traffic_source: Option<String>,
}

impl Order {
    /// Parsed status, if present and part of the known vocabulary
    pub fn order_status(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(OrderStatus::parse)
    }
}

impl TableRecord for Order {
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "user_id",
        "status",
        "num_of_item",
        "total_sale_price",
        "created_at",
        "traffic_source",
    ];

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.order_id.is_none(),
            self.user_id.is_none(),
            self.status.is_none(),
            self.num_of_item.is_none(),
            self.total_sale_price.is_none(),
            self.created_at.is_none(),
            self.traffic_source.is_none(),
        ]
    }
}

/// Order line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: Option<i64>,
    pub order_id: Option<i64>,
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub status: Option<String>,
    pub sale_price: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub returned_at: Option<NaiveDateTime>,
}

impl TableRecord for OrderItem {
    const TABLE: &'static str = "order_items";
    const COLUMNS: &'static [&'static str] = &[
        "order_item_id",
        "order_id",
        "user_id",
        "product_id",
        "status",
        "sale_price",
        "created_at",
        "shipped_at",
        "returned_at",
    ];

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.order_item_id.is_none(),
            self.order_id.is_none(),
            self.user_id.is_none(),
            self.product_id.is_none(),
            self.status.is_none(),
            self.sale_price.is_none(),
            self.created_at.is_none(),
            self.shipped_at.is_none(),
            self.returned_at.is_none(),
        ]
    }
}

/// Catalogue product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub retail_price: Option<f64>,
    pub cost: Option<f64>,
    pub department: Option<String>,
}

impl TableRecord for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "category",
        "brand",
        "retail_price",
        "cost",
        "department",
    ];

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.product_id.is_none(),
            self.product_name.is_none(),
            self.category.is_none(),
            self.brand.is_none(),
            self.retail_price.is_none(),
            self.cost.is_none(),
            self.department.is_none(),
        ]
    }
}

/// Order status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Complete,
    Returned,
    Shipped,
    Cancelled,
    Processing,
}

impl OrderStatus {
    /// All known statuses
    pub const ALL: [OrderStatus; 5] = [
        Self::Complete,
        Self::Returned,
        Self::Shipped,
        Self::Cancelled,
        Self::Processing,
    ];

    /// Parse a status as written in the input (exact, case-sensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Complete" => Some(Self::Complete),
            "Returned" => Some(Self::Returned),
            "Shipped" => Some(Self::Shipped),
            "Cancelled" => Some(Self::Cancelled),
            "Processing" => Some(Self::Processing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Returned => "Returned",
            Self::Shipped => "Shipped",
            Self::Cancelled => "Cancelled",
            Self::Processing => "Processing",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
