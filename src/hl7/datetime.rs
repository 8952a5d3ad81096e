//! FHIR date/time to HL7 DTM conversion

use super::field_lengths::normalize_field_path;
use crate::config::ReceiverDateTimeSettings;
use crate::constants::ConstantContext;
use crate::core::{Result, TemporalPrecision, TemporalValue, TranslationError};
use crate::temporal::{DateTimeFormat, TemporalFormatter, Zone};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Offset, Timelike};
use log::trace;

/// A FHIR date/time broken into calendar fields.
///
/// `month` is 0-based, as in the FHIR model calendar; the HL7 output is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FhirTemporal {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
    pub precision: TemporalPrecision,
    pub time_zone: Option<Zone>,
}

impl FhirTemporal {
    pub fn from_temporal(value: &TemporalValue) -> Self {
        let date = value.start_date().unwrap_or_default();
        let time = value.time().unwrap_or_default();
        let time_zone = match value {
            TemporalValue::OffsetDateTime(dt) => Some(Zone::Fixed(*dt.offset())),
            TemporalValue::Instant(_) => Some(Zone::utc()),
            _ => None,
        };
        Self {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            millis: time.nanosecond().min(999_999_999) / 1_000_000,
            precision: value.precision(),
            time_zone,
        }
    }

    /// Parse a FHIR `date`/`dateTime`/`instant` literal
    pub fn parse(text: &str) -> Result<Self> {
        TemporalValue::parse_fhir(text).map(|value| Self::from_temporal(&value))
    }

    pub fn with_precision(mut self, precision: TemporalPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Set the precision by name (`YEAR` .. `MILLI`)
    pub fn with_precision_name(self, precision: &str) -> Result<Self> {
        Ok(self.with_precision(precision.parse()?))
    }

    pub fn with_time_zone(mut self, zone: Zone) -> Self {
        self.time_zone = Some(zone);
        self
    }

    fn local(&self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day)
            .and_then(|date| {
                date.and_hms_milli_opt(self.hour, self.minute, self.second, self.millis)
            })
            .ok_or_else(|| TranslationError::unparseable_temporal(format!("{self:?}")))
    }

    /// Offset of the zone at this wall-clock time as `hour * 100 + minute`,
    /// daylight saving included
    pub fn offset_hhmm(&self) -> Result<Option<i32>> {
        let Some(zone) = self.time_zone else {
            return Ok(None);
        };
        let local = self.local()?;
        let zoned = zone
            .localize(&local)
            .ok_or_else(|| TranslationError::unparseable_temporal(local.to_string()))?;
        let minutes = zoned.offset().fix().local_minus_utc() / 60;
        Ok(Some(minutes / 60 * 100 + minutes % 60))
    }

    /// Back to a temporal value at this precision
    pub fn to_temporal(&self) -> Result<TemporalValue> {
        Ok(match self.precision {
            TemporalPrecision::Year => TemporalValue::Year(self.year),
            TemporalPrecision::Month => TemporalValue::YearMonth {
                year: self.year,
                month: self.month + 1,
            },
            TemporalPrecision::Day => TemporalValue::Date(self.local()?.date()),
            _ => {
                let local = self.local()?;
                match self.time_zone {
                    Some(zone) => TemporalValue::OffsetDateTime(
                        zone.localize(&local)
                            .ok_or_else(|| TranslationError::unparseable_temporal(local.to_string()))?,
                    ),
                    None => TemporalValue::LocalDateTime(local),
                }
            }
        })
    }
}

/// Renders FHIR date/times as HL7 DTM strings
#[derive(Debug, Clone, Copy, Default)]
pub struct Hl7DateTimeConverter;

impl Hl7DateTimeConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert at the value's own precision.
    ///
    /// When the context carries a receiver configuration asking for receiver
    /// local time, minute and finer values are rendered in the receiver's zone
    /// and format instead.
    pub fn convert(&self, date_time: &FhirTemporal, context: Option<&ConstantContext>) -> Result<String> {
        if let Some(settings) = receiver_settings(context)
            && settings.convert_to_receiver_local_time
            && date_time.precision >= TemporalPrecision::Minute
        {
            let value = date_time.to_temporal()?;
            return TemporalFormatter::format_for_receiver(&value, settings);
        }
        Self::to_dtm(date_time)
    }

    /// Convert for a specific HL7 field; fields the receiver lists in
    /// `convert_timestamp_to_date_time` are written without offset
    pub fn convert_with_field(
        &self,
        date_time: &FhirTemporal,
        field_path: &str,
        context: Option<&ConstantContext>,
    ) -> Result<String> {
        if let Some(settings) = receiver_settings(context)
            && date_time.precision >= TemporalPrecision::Minute
            && is_listed(&settings.convert_timestamp_to_date_time, field_path)
        {
            let value = date_time.to_temporal()?;
            let zone = settings.time_zone.or(date_time.time_zone);
            return TemporalFormatter::format(&value, DateTimeFormat::Local, zone.as_ref(), false);
        }
        self.convert(date_time, context)
    }

    /// HL7 DT of a date: `yyyy`, `yyyyMM` or `yyyyMMdd` by precision
    pub fn convert_date_to_hl7(value: &TemporalValue) -> Result<String> {
        match value {
            TemporalValue::Year(year) => Ok(format!("{year:04}")),
            TemporalValue::YearMonth { year, month } => Ok(format!("{year:04}{month:02}")),
            _ => value
                .start_date()
                .map(|date| date.format("%Y%m%d").to_string())
                .ok_or_else(|| TranslationError::unparseable_temporal(value.to_string())),
        }
    }

    /// The DTM literal, precision branch by branch
    pub fn to_dtm(dt: &FhirTemporal) -> Result<String> {
        let date = format!("{:04}{:02}{:02}", dt.year, dt.month + 1, dt.day);
        let dtm = match dt.precision {
            TemporalPrecision::Year => format!("{:04}", dt.year),
            TemporalPrecision::Month => format!("{:04}{:02}", dt.year, dt.month + 1),
            TemporalPrecision::Day => date,
            TemporalPrecision::Minute => {
                format!("{date}{:02}{:02}{}", dt.hour, dt.minute, offset_suffix(dt)?)
            }
            TemporalPrecision::Second | TemporalPrecision::Millisecond => {
                let fraction = if dt.precision == TemporalPrecision::Millisecond && dt.millis > 0 {
                    format!(".{:04}", dt.millis * 10)
                } else {
                    String::new()
                };
                format!(
                    "{date}{:02}{:02}{:02}{fraction}{}",
                    dt.hour,
                    dt.minute,
                    dt.second,
                    offset_suffix(dt)?
                )
            }
        };
        trace!("{:?} precision value as DTM {dtm}", dt.precision);
        Ok(dtm)
    }
}

fn offset_suffix(dt: &FhirTemporal) -> Result<String> {
    Ok(dt
        .offset_hhmm()?
        .map(|hhmm| {
            let sign = if hhmm < 0 { '-' } else { '+' };
            format!("{sign}{:04}", hhmm.abs())
        })
        .unwrap_or_default())
}

fn receiver_settings(context: Option<&ConstantContext>) -> Option<&ReceiverDateTimeSettings> {
    context
        .and_then(ConstantContext::config)
        .map(|config| &config.date_time)
}

fn is_listed(fields: &[String], field_path: &str) -> bool {
    let field = normalize_field_path(field_path);
    fields
        .iter()
        .any(|f| normalize_field_path(f).eq_ignore_ascii_case(&field))
}
