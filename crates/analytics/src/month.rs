//! Calendar months
//!
//! Cohorts and trends bucket timestamps by calendar month. Offsets between
//! months are computed on the calendar (`year * 12 + month`), never from
//! elapsed days, so Jan 31 and Feb 1 are one month apart.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::{AnalyticsError, Result};

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month (1-12)
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AnalyticsError::InvalidMonth(format!(
                "{}-{:02}: month must be 1-12",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// Truncate a timestamp to its month
    pub fn of(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Months since year 0, January
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Calendar months from `start` to `self` (negative if `self` is earlier)
    pub fn offset_from(&self, start: &Month) -> i64 {
        self.ordinal() - start.ordinal()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = AnalyticsError;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| AnalyticsError::InvalidMonth(format!("expected YYYY-MM: {}", s)))?;

        let year: i32 = year
            .parse()
            .map_err(|_| AnalyticsError::InvalidMonth(format!("bad year: {}", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| AnalyticsError::InvalidMonth(format!("bad month: {}", s)))?;

        Self::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_truncate() {
        let month = Month::of(&ts(2024, 2, 29));
        assert_eq!(month, Month::new(2024, 2).unwrap());
        assert_eq!(month.to_string(), "2024-02");
    }

    #[test]
    fn test_offset_is_calendar_based() {
        let jan = Month::of(&ts(2024, 1, 31));
        let feb = Month::of(&ts(2024, 2, 1));
        assert_eq!(feb.offset_from(&jan), 1);

        let dec = Month::new(2023, 12).unwrap();
        assert_eq!(Month::new(2024, 3).unwrap().offset_from(&dec), 3);
        assert_eq!(dec.offset_from(&Month::new(2024, 3).unwrap()), -3);
        assert_eq!(dec.offset_from(&dec), 0);
    }

    #[test]
    fn test_ordering() {
        let mut months = vec![
            Month::new(2024, 1).unwrap(),
            Month::new(2023, 12).unwrap(),
            Month::new(2023, 2).unwrap(),
        ];
        months.sort();
        let text: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(text, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("2024-03".parse::<Month>().unwrap(), Month::new(2024, 3).unwrap());
        assert!("2024-13".parse::<Month>().is_err());
        assert!("2024".parse::<Month>().is_err());
        assert!("march".parse::<Month>().is_err());
    }

    #[test]
    fn test_serialize_as_text() {
        let json = serde_json::to_string(&Month::new(2024, 1).unwrap()).unwrap();
        assert_eq!(json, "\"2024-01\"");
    }
}
