//! `changeTimezone`

use super::{Collection, bool_param, string_param};
use crate::core::{Result, TemporalValue, TranslationError, TranslationValue};
use crate::registry::function::CustomFunction;
use crate::temporal::{DateTimeFormat, TemporalFormatter, TemporalParser, Zone};
use log::trace;

/// Move a date/time into another zone.
///
/// Parameters: zone, then optionally the output format (`OFFSET`, `LOCAL`,
/// `HIGH_PRECISION_OFFSET`, `DATE_ONLY`), whether to write a zero offset as
/// `-0000`, and whether an `OFFSET` rendering uses the high precision format.
///
/// Strings are parsed and re-rendered as strings; date/time values stay
/// date/time values. Date-only values are returned unchanged.
pub fn change_timezone(
    function: CustomFunction,
    focus: &[TranslationValue],
    parameters: &[Collection],
) -> Result<Collection> {
    let [value] = focus else {
        return Err(TranslationError::invalid_invocation(
            function.name(),
            "Must call changeTimezone on a single element",
        ));
    };
    let zone_name = string_param(function, parameters, 0)?.ok_or_else(|| {
        TranslationError::invalid_invocation(function.name(), "Must pass a timezone as the parameter")
    })?;
    let zone: Zone = zone_name.parse()?;
    let format = match string_param(function, parameters, 1)? {
        Some(name) => name.parse::<DateTimeFormat>().map_err(|_| {
            TranslationError::invalid_invocation(
                function.name(),
                format!("Date time format not found: {name}"),
            )
        })?,
        None => DateTimeFormat::default(),
    };
    let correct_positive_offset = bool_param(function, parameters, 2)?;
    // the precision flag only upgrades the offset format
    let format = if format == DateTimeFormat::Offset && bool_param(function, parameters, 3)? {
        DateTimeFormat::HighPrecisionOffset
    } else {
        format
    };

    let result = match value {
        TranslationValue::DateTime(temporal) => {
            TranslationValue::DateTime(rezone(temporal, &zone)?)
        }
        other => {
            let text = other.as_str().ok_or_else(|| {
                TranslationError::invalid_invocation(
                    function.name(),
                    format!(
                        "Must call changeTimezone on a dateTime, instant, or date; was attempted on a {}",
                        other.type_name()
                    ),
                )
            })?;
            let temporal = TemporalParser::parse(text)?;
            if temporal.is_date_only() {
                TranslationValue::string(text)
            } else {
                TranslationValue::String(TemporalFormatter::format(
                    &temporal,
                    format,
                    Some(&zone),
                    correct_positive_offset,
                )?)
            }
        }
    };
    trace!("changeTimezone({zone}) {value} -> {result}");
    Ok(vec![result])
}

fn rezone(temporal: &TemporalValue, zone: &Zone) -> Result<TemporalValue> {
    if temporal.is_date_only() {
        return Ok(*temporal);
    }
    let zoned = TemporalFormatter::to_zoned(temporal, Some(zone))?;
    Ok(TemporalValue::OffsetDateTime(zone.at_instant(&zoned)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(focus: TranslationValue, params: &[&str]) -> Result<Collection> {
        let parameters: Vec<Collection> = params
            .iter()
            .map(|p| vec![TranslationValue::string(*p)])
            .collect();
        change_timezone(CustomFunction::ChangeTimezone, &[focus], &parameters)
    }

    #[test]
    fn test_change_timezone_of_string() {
        let result = call(TranslationValue::string("2021-08-09T08:52:00Z"), &["America/New_York"]);
        // the literal Z form parses as a local time and is anchored in the target zone
        assert_eq!(result.unwrap(), vec![TranslationValue::string("20210809085200-0400")]);

        let result = call(
            TranslationValue::string("2021-08-09T08:52:00-04:00"),
            &["UTC", "LOCAL"],
        );
        assert_eq!(result.unwrap(), vec![TranslationValue::string("20210809125200")]);
    }

    #[test]
    fn test_zero_offset_correction() {
        let result = call(
            TranslationValue::string("2021-08-09T08:52:00-04:00"),
            &["UTC", "OFFSET", "true"],
        );
        assert_eq!(result.unwrap(), vec![TranslationValue::string("20210809125200-0000")]);
    }

    #[test]
    fn test_dates_are_unchanged() {
        let result = call(TranslationValue::string("2021-08-09"), &["America/New_York"]);
        assert_eq!(result.unwrap(), vec![TranslationValue::string("2021-08-09")]);
    }

    #[test]
    fn test_date_time_values_stay_date_times() {
        let value = TemporalValue::parse_fhir("2021-08-09T12:00:00Z").unwrap();
        let result = call(TranslationValue::DateTime(value), &["Asia/Tokyo"]).unwrap();
        assert_eq!(
            result,
            vec![TranslationValue::DateTime(
                TemporalValue::parse_fhir("2021-08-09T21:00:00+09:00").unwrap()
            )]
        );
    }

    #[test]
    fn test_invalid_arguments() {
        let focus = TranslationValue::string("2021-08-09T08:52:00-04:00");
        assert!(matches!(
            call(focus.clone(), &["Mars/Olympus"]).unwrap_err(),
            TranslationError::InvalidZone { .. }
        ));
        assert!(matches!(
            call(focus, &["UTC", "ISO"]).unwrap_err(),
            TranslationError::InvalidFunctionInvocation { .. }
        ));
        assert!(matches!(
            call(TranslationValue::Integer(3), &["UTC"]).unwrap_err(),
            TranslationError::InvalidFunctionInvocation { .. }
        ));
    }
}
