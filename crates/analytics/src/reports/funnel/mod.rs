//! Purchase funnel reports
//!
//! - **stages**: distinct users per stage, conversion and drop-off
//! - **breakdown**: the same counts grouped by traffic source or device

pub mod breakdown;
pub mod stages;

pub use breakdown::{BreakdownRow, Dimension, FunnelBreakdownReport, funnel_breakdown};
pub use stages::{
    Funnel, FunnelRates, FunnelRatesReport, FunnelReport, StageRow, funnel,
};

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use retain_query::Event;

/// Funnel stage, in funnel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunnelStage {
    Home,
    Category,
    Product,
    Cart,
    Purchase,
}

impl FunnelStage {
    /// All stages, top of the funnel first
    pub const ALL: [FunnelStage; 5] = [
        Self::Home,
        Self::Category,
        Self::Product,
        Self::Cart,
        Self::Purchase,
    ];

    /// Parse an event type (exact, case-sensitive)
    pub fn parse(event_type: &str) -> Option<Self> {
        match event_type {
            "home" => Some(Self::Home),
            "category" => Some(Self::Category),
            "product" => Some(Self::Product),
            "cart" => Some(Self::Cart),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Category => "category",
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Purchase => "purchase",
        }
    }

    /// Position in the funnel (home = 0)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Stage of an event, if it has a known event type
    pub fn of(event: &Event) -> Option<Self> {
        event.event_type.as_deref().and_then(Self::parse)
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FunnelStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Distinct users seen at each stage
#[derive(Debug, Clone, Default)]
pub struct StageCounts {
    users: [HashSet<i64>; 5],
}

impl StageCounts {
    /// Record an event; events without a user or a known stage are skipped
    pub fn add(&mut self, event: &Event) {
        if let (Some(stage), Some(user_id)) = (FunnelStage::of(event), event.user_id) {
            self.users[stage.index()].insert(user_id);
        }
    }

    /// Count distinct users per stage over a set of events
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut counts = Self::default();
        for event in events {
            counts.add(event);
        }
        counts
    }

    /// Distinct users at a stage
    pub fn users(&self, stage: FunnelStage) -> u64 {
        self.users[stage.index()].len() as u64
    }

    /// Per-stage counts in funnel order
    pub fn to_array(&self) -> [u64; 5] {
        FunnelStage::ALL.map(|s| self.users(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(user_id: Option<i64>, event_type: Option<&str>) -> Event {
        Event {
            user_id,
            event_type: event_type.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_parse_roundtrip() {
        for stage in FunnelStage::ALL {
            assert_eq!(FunnelStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(FunnelStage::parse("Home"), None);
        assert_eq!(FunnelStage::parse("checkout"), None);
    }

    #[test]
    fn test_stage_order() {
        assert!(FunnelStage::Home < FunnelStage::Purchase);
        assert_eq!(FunnelStage::Cart.index(), 3);
    }

    #[test]
    fn test_stage_counts_distinct_users() {
        let events = vec![
            event(Some(1), Some("home")),
            event(Some(1), Some("home")),
            event(Some(2), Some("home")),
            event(Some(1), Some("cart")),
            event(None, Some("home")),
            event(Some(3), Some("checkout")),
            event(Some(4), None),
        ];
        let counts = StageCounts::from_events(&events);
        assert_eq!(counts.to_array(), [2, 0, 0, 1, 0]);
    }
}
