//! Parsing and formatting sender date/times end to end

// The glob import below brings `hl7_translation::core` into scope; keep the
// built-in `core` resolvable for macro expansions (rstest).
extern crate core;

use hl7_translation::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn utc() -> Zone {
    Zone::utc()
}

/// Parse, render with an offset in UTC, and parse the rendering again
fn normalize(input: &str) -> TemporalValue {
    let parsed = TemporalParser::parse(input).unwrap();
    let rendered = TemporalFormatter::format(&parsed, DateTimeFormat::Offset, Some(&utc()), false).unwrap();
    TemporalParser::parse(&rendered).unwrap()
}

#[rstest]
#[case("20220101")]
#[case("202201011230")]
#[case("20220101123045")]
#[case("20220101123045.5")]
#[case("20220104110000-0500")]
#[case("20220104110000.1234-0500")]
#[case("2022-01-01 12:30:45.123")]
#[case("2022-01-01T10:00:00Z")]
#[case("2022-01-01T10:00:00.123Z")]
#[case("1975-08-01T11:39:00+05:30")]
#[case("1975-08-01T11:39")]
#[case("2022-01-01")]
#[case("2022-01-01 8:15:00")]
#[case("20220101 8:15:00")]
#[case("1/2/2022")]
#[case("1/2/2022 8:00")]
#[case("12/31/2022 23:59:59")]
#[case("2022/1/2")]
#[case("2022/1/2 8:00:30")]
#[case("2/3/02 8:00")]
fn test_offset_rendering_is_stable(#[case] input: &str) {
    let normalized = normalize(input);
    let again = TemporalFormatter::format(&normalized, DateTimeFormat::Offset, Some(&utc()), false).unwrap();
    assert_eq!(TemporalParser::parse(&again).unwrap(), normalized, "input {input}");
}

#[rstest]
#[case("20220101", DateTimeFormat::Offset, "20220101000000-0000")]
#[case("2022-01-01T10:00:00Z", DateTimeFormat::Offset, "20220101100000-0000")]
#[case("2022-01-01T10:00:00Z", DateTimeFormat::HighPrecisionOffset, "20220101100000.0000-0000")]
#[case("2022-01-01T10:00:00Z", DateTimeFormat::Local, "20220101100000")]
fn test_zero_offset_correction(
    #[case] input: &str,
    #[case] output: DateTimeFormat,
    #[case] expected: &str,
) {
    let value = TemporalParser::parse(input).unwrap();
    assert_eq!(
        TemporalFormatter::format(&value, output, Some(&utc()), true).unwrap(),
        expected
    );
}

#[test]
fn test_zero_offset_correction_leaves_other_offsets() {
    let value = TemporalParser::parse("20220104110000-0500").unwrap();
    assert_eq!(
        TemporalFormatter::format(&value, DateTimeFormat::Offset, None, true).unwrap(),
        "20220104110000-0500"
    );
    let corrected = TemporalFormatter::correct_positive_utc_offset("+0000");
    assert_eq!(corrected, "+0000");
}

#[test]
fn test_receiver_settings_drive_formatting() {
    let settings = ReceiverDateTimeSettings::default()
        .with_time_zone("America/Chicago".parse().unwrap())
        .with_format(DateTimeFormat::Offset);
    let value = TemporalParser::parse("2022-07-04T15:30:00+00:00").unwrap();
    assert_eq!(
        TemporalFormatter::format_for_receiver(&value, &settings).unwrap(),
        "20220704103000-0500"
    );
}

#[rstest]
#[case(None, false, DateTimeFormat::Offset)]
#[case(None, true, DateTimeFormat::HighPrecisionOffset)]
#[case(Some(DateTimeFormat::Offset), true, DateTimeFormat::HighPrecisionOffset)]
#[case(Some(DateTimeFormat::Local), true, DateTimeFormat::Local)]
#[case(Some(DateTimeFormat::DateOnly), true, DateTimeFormat::DateOnly)]
#[case(Some(DateTimeFormat::HighPrecisionOffset), false, DateTimeFormat::HighPrecisionOffset)]
fn test_high_precision_header_switch(
    #[case] format: Option<DateTimeFormat>,
    #[case] high_precision: bool,
    #[case] expected: DateTimeFormat,
) {
    let mut settings = ReceiverDateTimeSettings::default().with_high_precision_header_format(high_precision);
    if let Some(format) = format {
        settings = settings.with_format(format);
    }
    assert_eq!(settings.output_format(), expected);
}

#[rstest]
#[case("20220101", TemporalPrecision::Day)]
#[case("1/2/2022 8:00", TemporalPrecision::Second)]
#[case("2022-01-01T10:00:00.123Z", TemporalPrecision::Millisecond)]
#[case("20220104110000-0500", TemporalPrecision::Second)]
fn test_precision_follows_input(#[case] input: &str, #[case] precision: TemporalPrecision) {
    let value = TemporalParser::parse(input).unwrap();
    assert_eq!(value.precision(), precision);
    assert_eq!(value.is_date_only(), precision == TemporalPrecision::Day);
}

#[test]
fn test_literal_z_without_offset_is_local() {
    let value = TemporalParser::parse("2022-01-01T10:00:00Z").unwrap();
    assert!(matches!(value, TemporalValue::LocalDateTime(_)));
    let err = TemporalFormatter::format(&value, DateTimeFormat::Offset, None, false).unwrap_err();
    assert!(matches!(err, TranslationError::MissingZone { .. }));
}

#[test]
fn test_unparseable_input() {
    for input in ["", "not a date", "2022-13-45", "99999999999999999"] {
        let err = TemporalParser::parse(input).unwrap_err();
        assert!(
            matches!(err, TranslationError::UnparseableTemporal { .. }),
            "input {input}: {err:?}"
        );
    }
}

#[rstest]
#[case("2022-01-01T10:00:00.123456")]
#[case("2022-01-01T10:00:00.123456-05:00")]
#[case("20220101120000.123456")]
fn test_fraction_digits_must_fit_a_grammar(#[case] input: &str) {
    let err = TemporalParser::parse(input).unwrap_err();
    assert!(
        matches!(err, TranslationError::UnparseableTemporal { .. }),
        "input {input}: {err:?}"
    );
}
