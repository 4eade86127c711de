//! The five-table input snapshot
//!
//! # File Organization
//!
//! ```text
//! {data_dir}/
//! ├── events.csv
//! ├── users.csv
//! ├── orders.csv
//! ├── order_items.csv
//! └── products.csv
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::DataFrame;

use crate::error::QueryError;
use crate::load::{Columns, read_csv};
use crate::result::{Column, DataType, TableInfo};
use crate::tables::{Event, Order, OrderItem, Product, TableRecord, User};

/// Logical table names, in load order
pub const TABLES: &[&str] = &[
    Event::TABLE,
    User::TABLE,
    Order::TABLE,
    OrderItem::TABLE,
    Product::TABLE,
];

/// Path of a table's CSV file inside a data directory
pub fn table_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{}.csv", table))
}

/// Column names and types of a logical table
pub fn table_schema(table: &str) -> Option<Vec<(&'static str, DataType)>> {
    let (columns, types) = match table {
        t if t == Event::TABLE => (Event::COLUMNS, EVENT_TYPES),
        t if t == User::TABLE => (User::COLUMNS, USER_TYPES),
        t if t == Order::TABLE => (Order::COLUMNS, ORDER_TYPES),
        t if t == OrderItem::TABLE => (OrderItem::COLUMNS, ORDER_ITEM_TYPES),
        t if t == Product::TABLE => (Product::COLUMNS, PRODUCT_TYPES),
        _ => return None,
    };
    Some(columns.iter().copied().zip(types.iter().copied()).collect())
}

/// Immutable in-memory snapshot of the input tables
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub events: Vec<Event>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub products: Vec<Product>,
}

impl Dataset {
    /// Load all five tables from a data directory
    ///
    /// # Errors
    ///
    /// Fails if a file is missing, unreadable, or lacks a schema column.
    /// Individual null or malformed values are not errors.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, QueryError> {
        let dir = dir.as_ref();
        let start = Instant::now();

        let events = events_from_frame(&read_csv(Event::TABLE, &table_path(dir, Event::TABLE))?)?;
        let users = users_from_frame(&read_csv(User::TABLE, &table_path(dir, User::TABLE))?)?;
        let orders = orders_from_frame(&read_csv(Order::TABLE, &table_path(dir, Order::TABLE))?)?;
        let order_items = order_items_from_frame(&read_csv(
            OrderItem::TABLE,
            &table_path(dir, OrderItem::TABLE),
        )?)?;
        let products =
            products_from_frame(&read_csv(Product::TABLE, &table_path(dir, Product::TABLE))?)?;

        let dataset = Self {
            events,
            users,
            orders,
            order_items,
            products,
        };

        tracing::info!(
            dir = %dir.display(),
            events = dataset.events.len(),
            users = dataset.users.len(),
            orders = dataset.orders.len(),
            order_items = dataset.order_items.len(),
            products = dataset.products.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "loaded dataset"
        );

        Ok(dataset)
    }

    /// Row count of a table by logical name
    pub fn row_count(&self, table: &str) -> Option<usize> {
        match table {
            t if t == Event::TABLE => Some(self.events.len()),
            t if t == User::TABLE => Some(self.users.len()),
            t if t == Order::TABLE => Some(self.orders.len()),
            t if t == OrderItem::TABLE => Some(self.order_items.len()),
            t if t == Product::TABLE => Some(self.products.len()),
            _ => None,
        }
    }

    /// Describe every table: name, row count and typed columns
    pub fn table_infos(&self) -> Vec<TableInfo> {
        vec![
            info::<Event>(self.events.len(), EVENT_TYPES),
            info::<User>(self.users.len(), USER_TYPES),
            info::<Order>(self.orders.len(), ORDER_TYPES),
            info::<OrderItem>(self.order_items.len(), ORDER_ITEM_TYPES),
            info::<Product>(self.products.len(), PRODUCT_TYPES),
        ]
    }
}

const EVENT_TYPES: &[DataType] = &[
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::String,
    DataType::Timestamp,
    DataType::String,
    DataType::String,
    DataType::String,
    DataType::String,
    DataType::Int64,
];

const USER_TYPES: &[DataType] = &[
    DataType::Int64,
    DataType::Int64,
    DataType::String,
    DataType::String,
    DataType::String,
    DataType::String,
    DataType::Timestamp,
];

const ORDER_TYPES: &[DataType] = &[
    DataType::Int64,
    DataType::Int64,
    DataType::String,
    DataType::Int64,
    DataType::Float64,
    DataType::Timestamp,
    DataType::String,
];

const ORDER_ITEM_TYPES: &[DataType] = &[
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::String,
    DataType::Float64,
    DataType::Timestamp,
    DataType::Timestamp,
    DataType::Timestamp,
];

const PRODUCT_TYPES: &[DataType] = &[
    DataType::Int64,
    DataType::String,
    DataType::String,
    DataType::String,
    DataType::Float64,
    DataType::Float64,
    DataType::String,
];

fn info<T: TableRecord>(rows: usize, types: &[DataType]) -> TableInfo {
    let columns = T::COLUMNS
        .iter()
        .zip(types)
        .map(|(name, dtype)| Column::new(*name, *dtype, true))
        .collect();

    TableInfo {
        name: T::TABLE.to_string(),
        row_count: Some(rows as u64),
        columns,
    }
}

fn events_from_frame(df: &DataFrame) -> Result<Vec<Event>, QueryError> {
    let c = Columns::new(Event::TABLE, df);
    let event_id = c.i64("event_id")?;
    let session_id = c.i64("session_id")?;
    let user_id = c.i64("user_id")?;
    let event_type = c.string("event_type")?;
    let created_at = c.timestamp("created_at")?;
    let device_type = c.string("device_type")?;
    let browser = c.string("browser")?;
    let traffic_source = c.string("traffic_source")?;
    let uri = c.string("uri")?;
    let product_id = c.i64("product_id")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(Event {
            event_id: event_id[i],
            session_id: session_id[i],
            user_id: user_id[i],
            event_type: event_type[i].clone(),
            created_at: created_at[i],
            device_type: device_type[i].clone(),
            browser: browser[i].clone(),
            traffic_source: traffic_source[i].clone(),
            uri: uri[i].clone(),
            product_id: product_id[i],
        });
    }
    Ok(rows)
}

fn users_from_frame(df: &DataFrame) -> Result<Vec<User>, QueryError> {
    let c = Columns::new(User::TABLE, df);
    let user_id = c.i64("user_id")?;
    let age = c.i64("age")?;
    let gender = c.string("gender")?;
    let country = c.string("country")?;
    let state = c.string("state")?;
    let traffic_source = c.string("traffic_source")?;
    let created_at = c.timestamp("created_at")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(User {
            user_id: user_id[i],
            age: age[i],
            gender: gender[i].clone(),
            country: country[i].clone(),
            state: state[i].clone(),
            traffic_source: traffic_source[i].clone(),
            created_at: created_at[i],
        });
    }
    Ok(rows)
}

fn orders_from_frame(df: &DataFrame) -> Result<Vec<Order>, QueryError> {
    let c = Columns::new(Order::TABLE, df);
    let order_id = c.i64("order_id")?;
    let user_id = c.i64("user_id")?;
    let status = c.string("status")?;
    let num_of_item = c.i64("num_of_item")?;
    let total_sale_price = c.f64("total_sale_price")?;
    let created_at = c.timestamp("created_at")?;
    let traffic_source = c.string("traffic_source")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(Order {
            order_id: order_id[i],
            user_id: user_id[i],
            status: status[i].clone(),
            num_of_item: num_of_item[i],
            total_sale_price: total_sale_price[i],
            created_at: created_at[i],
            traffic_source: traffic_source[i].clone(),
        });
    }
    Ok(rows)
}

fn order_items_from_frame(df: &DataFrame) -> Result<Vec<OrderItem>, QueryError> {
    let c = Columns::new(OrderItem::TABLE, df);
    let order_item_id = c.i64("order_item_id")?;
    let order_id = c.i64("order_id")?;
    let user_id = c.i64("user_id")?;
    let product_id = c.i64("product_id")?;
    let status = c.string("status")?;
    let sale_price = c.f64("sale_price")?;
    let created_at = c.timestamp("created_at")?;
    let shipped_at = c.timestamp("shipped_at")?;
    let returned_at = c.timestamp("returned_at")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(OrderItem {
            order_item_id: order_item_id[i],
            order_id: order_id[i],
            user_id: user_id[i],
            product_id: product_id[i],
            status: status[i].clone(),
            sale_price: sale_price[i],
            created_at: created_at[i],
            shipped_at: shipped_at[i],
            returned_at: returned_at[i],
        });
    }
    Ok(rows)
}

fn products_from_frame(df: &DataFrame) -> Result<Vec<Product>, QueryError> {
    let c = Columns::new(Product::TABLE, df);
    let product_id = c.i64("product_id")?;
    let product_name = c.string("product_name")?;
    let category = c.string("category")?;
    let brand = c.string("brand")?;
    let retail_price = c.f64("retail_price")?;
    let cost = c.f64("cost")?;
    let department = c.string("department")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(Product {
            product_id: product_id[i],
            product_name: product_name[i].clone(),
            category: category[i].clone(),
            brand: brand[i].clone(),
            retail_price: retail_price[i],
            cost: cost[i],
            department: department[i].clone(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod dataset_test;
