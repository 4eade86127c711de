//! Revenue outliers by z-score

use serde::Serialize;

use crate::ratio::{mean, round_to, sample_std};
use retain_query::Order;

/// Order flagged as a revenue outlier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRow {
    pub order_id: Option<i64>,
    pub user_id: Option<i64>,
    pub total_sale_price: f64,
    /// Rounded to two decimals
    pub z_score: f64,
}

/// Distribution of order prices
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevenueStats {
    /// Orders that carry a price
    pub priced_orders: u64,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
}

/// Flag orders whose |z| exceeds `threshold`
///
/// All orders with a price take part, whatever their status. Nothing is
/// flagged when the standard deviation is zero or undefined.
pub fn revenue_outliers(orders: &[Order], threshold: f64) -> (RevenueStats, Vec<OutlierRow>) {
    let prices: Vec<f64> = orders.iter().filter_map(|o| o.total_sale_price).collect();
    let stats = RevenueStats {
        priced_orders: prices.len() as u64,
        mean: mean(&prices),
        std: sample_std(&prices),
    };

    let (Some(mu), Some(sigma)) = (stats.mean, stats.std) else {
        return (stats, Vec::new());
    };
    if sigma == 0.0 {
        return (stats, Vec::new());
    }

    let outliers = orders
        .iter()
        .filter_map(|o| {
            let price = o.total_sale_price?;
            let z = (price - mu) / sigma;
            (z.abs() > threshold).then(|| OutlierRow {
                order_id: o.order_id,
                user_id: o.user_id,
                total_sale_price: price,
                z_score: round_to(z, 2),
            })
        })
        .collect();

    (stats, outliers)
}
