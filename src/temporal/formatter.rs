//! Rendering of temporal values in receiver-specific formats

use super::zone::Zone;
use crate::config::ReceiverDateTimeSettings;
use crate::core::{Result, TemporalValue, TranslationError};
use chrono::{DateTime, FixedOffset, Timelike};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output formats a receiver can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimeFormat {
    /// `yyyyMMddHHmmssxx`
    #[default]
    Offset,
    /// `yyyyMMddHHmmss`
    Local,
    /// `yyyyMMddHHmmss.SSSSxx`
    HighPrecisionOffset,
    /// `yyyyMMdd`
    DateOnly,
}

impl DateTimeFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Offset => "yyyyMMddHHmmssxx",
            Self::Local => "yyyyMMddHHmmss",
            Self::HighPrecisionOffset => "yyyyMMddHHmmss.SSSSxx",
            Self::DateOnly => "yyyyMMdd",
        }
    }

    fn render(&self, dt: &DateTime<FixedOffset>) -> String {
        match self {
            Self::Offset => dt.format("%Y%m%d%H%M%S%z").to_string(),
            Self::Local => dt.format("%Y%m%d%H%M%S").to_string(),
            Self::HighPrecisionOffset => {
                // four fraction digits, truncated
                let fraction = dt.nanosecond().min(999_999_999) / 100_000;
                format!(
                    "{}.{fraction:04}{}",
                    dt.format("%Y%m%d%H%M%S"),
                    dt.format("%z")
                )
            }
            Self::DateOnly => dt.format("%Y%m%d").to_string(),
        }
    }
}

impl FromStr for DateTimeFormat {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFFSET" => Ok(Self::Offset),
            "LOCAL" => Ok(Self::Local),
            "HIGH_PRECISION_OFFSET" => Ok(Self::HighPrecisionOffset),
            "DATE_ONLY" => Ok(Self::DateOnly),
            _ => Err(TranslationError::configuration_error(format!(
                "Date time format not found: {s}"
            ))),
        }
    }
}

static POSITIVE_ZERO_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+?\+(00|0000|00:00)$").expect("valid zero offset regex"));

/// Renders temporal values per output format and zone
pub struct TemporalFormatter;

impl TemporalFormatter {
    /// Format `value` with the pattern of `output`.
    ///
    /// Date-only values (year, year-month, date) are anchored to the start of
    /// their first day in `zone`, or UTC without one. This is a lossy coercion:
    /// the result carries a midnight time the input never had. Local date/times
    /// need a zone. Offset date/times and instants keep their own offset unless
    /// a zone is supplied and their time of day is non-zero.
    pub fn format(
        value: &TemporalValue,
        output: DateTimeFormat,
        zone: Option<&Zone>,
        correct_positive_utc_offset: bool,
    ) -> Result<String> {
        let zoned = Self::to_zoned(value, zone)?;
        let rendered = output.render(&zoned);
        trace!("formatted {value} as {rendered} ({:?})", output);
        Ok(if correct_positive_utc_offset {
            Self::correct_positive_utc_offset(&rendered)
        } else {
            rendered
        })
    }

    /// Format per a receiver's date/time settings
    pub fn format_for_receiver(
        value: &TemporalValue,
        settings: &ReceiverDateTimeSettings,
    ) -> Result<String> {
        Self::format(
            value,
            settings.output_format(),
            settings.time_zone.as_ref(),
            settings.convert_positive_offset_to_negative,
        )
    }

    /// Resolve a value to a concrete instant with offset
    pub fn to_zoned(value: &TemporalValue, zone: Option<&Zone>) -> Result<DateTime<FixedOffset>> {
        match value {
            TemporalValue::LocalDateTime(local) => {
                let zone = zone.ok_or_else(|| {
                    TranslationError::missing_zone(format!(
                        "A zone is required to format the local date/time {value}"
                    ))
                })?;
                zone.localize(local)
                    .ok_or_else(|| TranslationError::unparseable_temporal(value.to_string()))
            }
            TemporalValue::OffsetDateTime(dt) => Ok(Self::rezone(value, dt, zone)),
            TemporalValue::Instant(dt) => Ok(Self::rezone(value, &dt.fixed_offset(), zone)),
            _ => {
                let midnight = value
                    .start_date()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .ok_or_else(|| TranslationError::unparseable_temporal(value.to_string()))?;
                zone.copied()
                    .unwrap_or_else(Zone::utc)
                    .localize(&midnight)
                    .ok_or_else(|| TranslationError::unparseable_temporal(value.to_string()))
            }
        }
    }

    fn rezone(
        value: &TemporalValue,
        dt: &DateTime<FixedOffset>,
        zone: Option<&Zone>,
    ) -> DateTime<FixedOffset> {
        match zone {
            Some(zone) if value.is_time_non_zero() => zone.at_instant(dt),
            _ => *dt,
        }
    }

    /// Rewrite a trailing `+00`, `+0000` or `+00:00` offset with a minus sign.
    ///
    /// Only applies when the offset is preceded by at least one character.
    pub fn correct_positive_utc_offset(text: &str) -> String {
        let Some(captures) = POSITIVE_ZERO_OFFSET.captures(text) else {
            return text.to_string();
        };
        let zero = &captures[1];
        let suffix_start = text.len() - zero.len() - 1;
        format!("{}-{zero}", &text[..suffix_start])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::TemporalParser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn eastern_morning() -> TemporalValue {
        TemporalValue::parse_fhir("2022-01-04T11:00:00-05:00").unwrap()
    }

    #[rstest]
    #[case(DateTimeFormat::Local, "20220104110000")]
    #[case(DateTimeFormat::Offset, "20220104110000-0500")]
    #[case(DateTimeFormat::HighPrecisionOffset, "20220104110000.0000-0500")]
    #[case(DateTimeFormat::DateOnly, "20220104")]
    fn test_format_kinds(#[case] output: DateTimeFormat, #[case] expected: &str) {
        let eastern: Zone = "US/Eastern".parse().unwrap();
        let formatted =
            TemporalFormatter::format(&eastern_morning(), output, Some(&eastern), false).unwrap();
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_format_names() {
        assert_eq!("high_precision_offset".parse::<DateTimeFormat>().unwrap(), DateTimeFormat::HighPrecisionOffset);
        assert_eq!("DATE_ONLY".parse::<DateTimeFormat>().unwrap(), DateTimeFormat::DateOnly);
        assert!("ISO".parse::<DateTimeFormat>().is_err());
    }

    #[test]
    fn test_format_rezones_non_midnight_values() {
        let pacific: Zone = "US/Pacific".parse().unwrap();
        let formatted =
            TemporalFormatter::format(&eastern_morning(), DateTimeFormat::Offset, Some(&pacific), false)
                .unwrap();
        assert_eq!(formatted, "20220104080000-0800");
    }

    #[test]
    fn test_midnight_values_keep_their_offset() {
        let midnight = TemporalValue::parse_fhir("2022-01-04T00:00:00-05:00").unwrap();
        let pacific: Zone = "US/Pacific".parse().unwrap();
        let formatted =
            TemporalFormatter::format(&midnight, DateTimeFormat::Offset, Some(&pacific), false).unwrap();
        assert_eq!(formatted, "20220104000000-0500");
    }

    #[test]
    fn test_local_date_time_requires_zone() {
        let local = TemporalParser::parse("01/02/2022 05:00").unwrap();
        let err = TemporalFormatter::format(&local, DateTimeFormat::Offset, None, false).unwrap_err();
        assert!(matches!(err, TranslationError::MissingZone { .. }));

        let chicago: Zone = "America/Chicago".parse().unwrap();
        assert_eq!(
            TemporalFormatter::format(&local, DateTimeFormat::Offset, Some(&chicago), false).unwrap(),
            "20220102050000-0600"
        );
    }

    #[test]
    fn test_dates_anchor_to_start_of_day() {
        let date = TemporalParser::parse("20220101").unwrap();
        assert_eq!(
            TemporalFormatter::format(&date, DateTimeFormat::Offset, None, false).unwrap(),
            "20220101000000+0000"
        );
        let denver: Zone = "America/Denver".parse().unwrap();
        assert_eq!(
            TemporalFormatter::format(&date, DateTimeFormat::Offset, Some(&denver), false).unwrap(),
            "20220101000000-0700"
        );
    }

    #[rstest]
    #[case("2022-01-05 08:00:00+0000", "2022-01-05 08:00:00-0000")]
    #[case("2022-01-05 08:00:00+00", "2022-01-05 08:00:00-00")]
    #[case("2022-01-05 08:00:00+00:00", "2022-01-05 08:00:00-00:00")]
    #[case("2022-01-05 08:00:00+12", "2022-01-05 08:00:00+12")]
    #[case("2022-01-05 08:00:00+03:30", "2022-01-05 08:00:00+03:30")]
    #[case("2022-01-05 08:00:00-0400", "2022-01-05 08:00:00-0400")]
    #[case("+0000", "+0000")]
    #[case("", "")]
    fn test_correct_positive_utc_offset(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(TemporalFormatter::correct_positive_utc_offset(input), expected);
    }

    #[test]
    fn test_zero_offset_is_written_negative_when_requested() {
        let utc = TemporalParser::parse("2022-04-29T15:43:02.307Z").unwrap();
        assert_eq!(
            TemporalFormatter::format(&utc, DateTimeFormat::HighPrecisionOffset, None, true).unwrap(),
            "20220429154302.3070-0000"
        );
    }

    #[test]
    fn test_format_for_receiver() {
        let settings = ReceiverDateTimeSettings::default()
            .with_time_zone("UTC".parse().unwrap())
            .with_high_precision_header_format(true);
        let value = TemporalValue::parse_fhir("2023-07-21T10:30:17.328-07:00").unwrap();
        assert_eq!(
            TemporalFormatter::format_for_receiver(&value, &settings).unwrap(),
            "20230721173017.3280+0000"
        );
    }
}
