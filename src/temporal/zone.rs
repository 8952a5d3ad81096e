//! Time zones used when anchoring and re-zoning temporal values

use crate::core::{Result, TranslationError};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An IANA zone (daylight-saving aware) or a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Self::Named(chrono_tz::UTC)
    }

    /// Interpret a wall-clock time in this zone.
    ///
    /// Times repeated by a backward transition take the earlier offset; times
    /// skipped by a forward transition are pushed past the gap.
    pub fn localize(&self, local: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Fixed(offset) => local.and_local_timezone(*offset).single(),
            Self::Named(tz) => tz
                .from_local_datetime(local)
                .earliest()
                .or_else(|| tz.from_local_datetime(&(*local + TimeDelta::hours(1))).earliest())
                .map(|dt| dt.fixed_offset()),
        }
    }

    /// The same instant expressed in this zone
    pub fn at_instant(&self, dt: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Self::Fixed(offset) => dt.with_timezone(offset),
            Self::Named(tz) => dt.with_timezone(tz).fixed_offset(),
        }
    }
}

impl FromStr for Zone {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }
        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            return parse_fixed_offset(trimmed)
                .map(Self::Fixed)
                .ok_or_else(|| TranslationError::invalid_zone(s));
        }
        Tz::from_str(trimmed)
            .map(Self::Named)
            .map_err(|_| TranslationError::invalid_zone(s))
    }
}

/// Parse `+HH`, `+HHMM` or `+HH:MM`
fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
