//! Parser for the date/time strings senders put in reports

use super::pattern::DateTimePattern;
use crate::core::{Result, TemporalValue, TranslationError};
use chrono::{DateTime, Utc};
use log::{debug, trace};
use once_cell::sync::Lazy;

/// Single pattern covering the common grammars, tried first
pub const VARIABLE_DATE_TIME_PATTERN: &str = "[yyyyMMdd][yyyyMMddHHmmss.SSSSxx][yyyyMMdd[HHmm][ss][.S][Z]]\
[yyyy-MM-dd HH:mm:ss.ZZZ][uuuuMMddHHmmss[.nnnn]Z][uuuuMMddHHmm[.nnnn]Z][uuuuMMddHHmmss[.SSS]Z]\
[uuuuMMddHHmm[.SSS]Z][uuuu-MM-dd'T'HH:mm[:ss]['Z'][xxx]][uuuu-MM-dd'T'HH:mm[:ss][.S[S][S]]['Z'][xxx]]\
[uuuu-MM-dd'T'HH:mm[:ss][.nnnn]['Z'][xxx]][yyyy-MM-dd[ H:mm:ss[.S[S][S]]]][yyyyMMdd[ H:mm:ss[.S[S][S]]]]\
[M/d/yyyy[ H:mm[:ss[.S[S][S]]]]][yyyy/M/d[ H:mm[:ss[.S[S][S]]]]]";

/// Patterns tried one by one, in order, when the variable pattern fails
pub const FALLBACK_DATE_TIME_PATTERNS: [&str; 17] = [
    "[yyyyMMdd[HHmm][ss][.S][Z]]",
    "[yyyy-MM-dd HH:mm:ss.ZZZ]",
    "[uuuuMMddHHmmss[.nnnn][Z]][uuuuMMddHHmm[.nnnn][Z]]",
    "[uuuuMMddHHmmss[.SSS][Z]][uuuuMMddHHmm[.SSS][Z]]",
    "[uuuu-MM-dd'T'HH:mm[:ss]['Z'][xxx]]",
    "[uuuu-MM-dd'T'HH:mm[:ss][.S[S][S]]['Z']]",
    "[uuuu-MM-dd'T'HH:mm[:ss][.nnn]['Z'][xxx]]",
    "[uuuu-MM-dd'T'HH:mm[:ss][.nnnn]['Z'][xxx]]",
    "[yyyy-MM-dd[ H:mm:ss[.S[S][S]]]]",
    "[yyyyMMdd[ H:mm:ss[.S[S][S]]]]",
    "[yyyy/M/d[ H:mm[:ss[.S[S][S]]]]]",
    "yyyy-MM-dd",
    "yyyy-dd-MM",
    "MMdduuuu",
    "uuuuMMdd",
    "M/d/yy[ H:mm[:ss]]",
    "[M/d/yyyy[ H:mm[:ss[.S[S][S]]]]]",
];

static VARIABLE_PATTERN: Lazy<DateTimePattern> =
    Lazy::new(|| DateTimePattern::new(VARIABLE_DATE_TIME_PATTERN));

static FALLBACK_PATTERNS: Lazy<Vec<DateTimePattern>> = Lazy::new(|| {
    FALLBACK_DATE_TIME_PATTERNS
        .iter()
        .map(|p| DateTimePattern::new(p))
        .collect()
});

/// Parses heterogeneous date/time strings into precision-tagged values
pub struct TemporalParser;

impl TemporalParser {
    /// Parse `text` against the accepted grammars.
    ///
    /// The variable pattern is tried first. When it fails and the text carries a
    /// `Z`/`z` marker, a strict ISO instant parse is attempted, giving a UTC
    /// offset date/time. Otherwise the fallback patterns are tried in order and
    /// the first match wins. Ambiguous inputs such as `01/02/2020` therefore
    /// resolve month-first.
    pub fn parse(text: &str) -> Result<TemporalValue> {
        if text.trim().is_empty() {
            return Err(TranslationError::unparseable_temporal(text));
        }

        if let Some(value) = VARIABLE_PATTERN.parse(text) {
            trace!("'{text}' matched the variable date/time pattern");
            return Ok(value);
        }

        if text.contains(['Z', 'z'])
            && let Ok(instant) = DateTime::parse_from_rfc3339(text)
        {
            debug!("'{text}' parsed as an ISO instant");
            let utc = instant.with_timezone(&Utc).fixed_offset();
            return Ok(TemporalValue::OffsetDateTime(utc));
        }

        for (index, pattern) in FALLBACK_PATTERNS.iter().enumerate() {
            if let Some(value) = pattern.parse(text) {
                debug!("'{text}' matched fallback pattern {index} '{}'", pattern.source());
                return Ok(value);
            }
        }

        Err(TranslationError::unparseable_temporal(text))
    }

    /// True when the value's hour, minute or second is non-zero
    pub fn is_time_non_zero(value: &TemporalValue) -> bool {
        value.is_time_non_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> TemporalValue {
        TemporalValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn local(s: &str) -> TemporalValue {
        TemporalValue::LocalDateTime(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap())
    }

    #[test]
    fn test_blank_input_fails() {
        for text in ["", "   "] {
            assert!(matches!(
                TemporalParser::parse(text),
                Err(TranslationError::UnparseableTemporal { .. })
            ));
        }
    }

    #[test]
    fn test_us_slash_dates_are_month_first() {
        assert_eq!(TemporalParser::parse("09/12/2021").unwrap(), date(2021, 9, 12));
        assert_eq!(TemporalParser::parse("01/02/2020").unwrap(), date(2020, 1, 2));
        assert_eq!(TemporalParser::parse("3/1/1999").unwrap(), date(1999, 3, 1));
    }

    #[test]
    fn test_literal_z_without_offset_reads_as_local() {
        assert_eq!(
            TemporalParser::parse("1975-08-01T11:39:00Z").unwrap(),
            local("1975-08-01 11:39:00")
        );
    }

    #[test]
    fn test_fractional_instant_uses_iso_retry() {
        let value = TemporalParser::parse("2022-04-29T15:43:02.307Z").unwrap();
        assert_eq!(value.to_string(), "2022-04-29T15:43:02.307+00:00");
    }

    #[test]
    fn test_hl7_local_timestamp_uses_fallback() {
        assert_eq!(
            TemporalParser::parse("20220101120000").unwrap(),
            local("2022-01-01 12:00:00")
        );
    }

    #[test]
    fn test_garbage_fails() {
        assert!(TemporalParser::parse("not a date").is_err());
        assert!(TemporalParser::parse("2022-99-99").is_err());
    }
}
