//! Revenue reports
//!
//! - **trend**: monthly revenue, buyers and visitor conversion
//! - **segments**: customers bucketed by total spend

pub mod segments;
pub mod trend;

pub use segments::{
    CustomerSpend, SegmentRow, SegmentsReport, customer_spend, segments, tier_index,
};
pub use trend::{TrendReport, TrendRow, monthly_trend};
