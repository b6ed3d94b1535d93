// src/config/date.rs
//! Target date for a scan: a literal day or "today" on the US/Eastern calendar,
//! which is the calendar the MLB schedule uses.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::US;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDate {
    Today,
    Fixed(NaiveDate),
}

impl TargetDate {
    pub fn resolve(self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            TargetDate::Today => us_eastern_date(now),
            TargetDate::Fixed(d) => d,
        }
    }
}

impl FromStr for TargetDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("today") {
            return Ok(TargetDate::Today);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(TargetDate::Fixed)
            .map_err(|e| anyhow!("invalid date {s:?} (expected YYYY-MM-DD or \"today\"): {e}"))
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDate::Today => f.write_str("today"),
            TargetDate::Fixed(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Calendar date in US/Eastern for the given instant.
pub fn us_eastern_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&US::Eastern).date_naive()
}
