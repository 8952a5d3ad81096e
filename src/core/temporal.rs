//! Precision-tagged temporal values
//!
//! The precision of a value is carried by its variant rather than by a separate
//! flag: a `Year` has no month, a `Date` has no time of day, and so on. Values are
//! never mutated; re-zoning or coarsening produces a new value.

use crate::core::{Result, TranslationError};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Precision levels understood by the HL7 date/time converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalPrecision {
    /// Year precision (YYYY)
    Year,
    /// Month precision (YYYY-MM)
    Month,
    /// Day precision (YYYY-MM-DD)
    Day,
    /// Minute precision (YYYY-MM-DDTHH:MM)
    Minute,
    /// Second precision (YYYY-MM-DDTHH:MM:SS)
    Second,
    /// Millisecond precision (YYYY-MM-DDTHH:MM:SS.sss)
    Millisecond,
}

impl fmt::Display for TemporalPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "YEAR"),
            Self::Month => write!(f, "MONTH"),
            Self::Day => write!(f, "DAY"),
            Self::Minute => write!(f, "MINUTE"),
            Self::Second => write!(f, "SECOND"),
            Self::Millisecond => write!(f, "MILLI"),
        }
    }
}

impl FromStr for TemporalPrecision {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "YEAR" => Ok(Self::Year),
            "MONTH" => Ok(Self::Month),
            "DAY" => Ok(Self::Day),
            "MINUTE" => Ok(Self::Minute),
            "SECOND" => Ok(Self::Second),
            "MILLI" | "MILLISECOND" => Ok(Self::Millisecond),
            _ => Err(TranslationError::unsupported_precision(s)),
        }
    }
}

/// A parsed date/time whose variant is its precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalValue {
    Year(i32),
    YearMonth { year: i32, month: u32 },
    Date(NaiveDate),
    LocalDateTime(NaiveDateTime),
    OffsetDateTime(DateTime<FixedOffset>),
    Instant(DateTime<Utc>),
}

impl TemporalValue {
    /// Finest precision the value carries
    pub fn precision(&self) -> TemporalPrecision {
        match self {
            Self::Year(_) => TemporalPrecision::Year,
            Self::YearMonth { .. } => TemporalPrecision::Month,
            Self::Date(_) => TemporalPrecision::Day,
            _ => match self.time() {
                Some(time) if time.nanosecond() > 0 => TemporalPrecision::Millisecond,
                _ => TemporalPrecision::Second,
            },
        }
    }

    /// Wall-clock time of day, for variants that have one
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::LocalDateTime(dt) => Some(dt.time()),
            Self::OffsetDateTime(dt) => Some(dt.time()),
            Self::Instant(dt) => Some(dt.time()),
            _ => None,
        }
    }

    /// True when any of hour, minute or second is non-zero.
    ///
    /// Date-only values are never non-zero. Sub-second digits are ignored.
    pub fn is_time_non_zero(&self) -> bool {
        self.time()
            .is_some_and(|t| t.hour() > 0 || t.minute() > 0 || t.second() > 0)
    }

    /// First calendar day covered by the value
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Year(year) => NaiveDate::from_ymd_opt(*year, 1, 1),
            Self::YearMonth { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1),
            Self::Date(date) => Some(*date),
            Self::LocalDateTime(dt) => Some(dt.date()),
            Self::OffsetDateTime(dt) => Some(dt.date_naive()),
            Self::Instant(dt) => Some(dt.date_naive()),
        }
    }

    pub fn is_date_only(&self) -> bool {
        matches!(self, Self::Year(_) | Self::YearMonth { .. } | Self::Date(_))
    }

    /// Parse a FHIR `date`, `dateTime` or `instant` literal.
    ///
    /// `YYYY`, `YYYY-MM` and `YYYY-MM-DD` keep their partial precision. A time with
    /// a `Z` suffix becomes an `Instant`, an explicit offset an `OffsetDateTime`,
    /// and a time without zone a `LocalDateTime`.
    pub fn parse_fhir(text: &str) -> Result<Self> {
        let s = text.trim();
        let fail = || TranslationError::unparseable_temporal(text);

        if !s.contains('T') {
            let parts: Vec<&str> = s.split('-').collect();
            let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
            return match parts.as_slice() {
                [y] if y.len() == 4 && all_digits(y) => {
                    y.parse::<i32>().map(Self::Year).map_err(|_| fail())
                }
                [y, m] if y.len() == 4 && m.len() == 2 && all_digits(y) && all_digits(m) => {
                    let year = y.parse::<i32>().map_err(|_| fail())?;
                    let month = m.parse::<u32>().map_err(|_| fail())?;
                    if !(1..=12).contains(&month) {
                        return Err(fail());
                    }
                    Ok(Self::YearMonth { year, month })
                }
                [_, _, _] => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(Self::Date)
                    .map_err(|_| fail()),
                _ => Err(fail()),
            };
        }

        if s.ends_with('Z') || s.ends_with('z') {
            return DateTime::parse_from_rfc3339(s)
                .map(|dt| Self::Instant(dt.with_timezone(&Utc)))
                .map_err(|_| fail());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::OffsetDateTime(dt));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
            .map(Self::LocalDateTime)
            .map_err(|_| fail())
    }
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year:04}"),
            Self::YearMonth { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::LocalDateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::OffsetDateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
            Self::Instant(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.fZ")),
        }
    }
}

impl From<NaiveDate> for TemporalValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<FixedOffset>> for TemporalValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::OffsetDateTime(dt)
    }
}

impl From<DateTime<Utc>> for TemporalValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }
}
