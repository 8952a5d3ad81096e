//! Splitting of free-text phone numbers into their dialing parts
//!
//! Numbers are read with the `phonenumber` metadata. Numbers without an
//! international prefix are read in the North American Numbering Plan, the
//! default region of the receivers this crate serves.

use log::trace;
use phonenumber::{Mode, PhoneNumber, country};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Region assumed for numbers written without `+` and a country code
pub const DEFAULT_REGION: country::Id = country::US;

/// Which part of a phone number to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonePart {
    Country,
    AreaCode,
    Local,
    Extension,
}

/// The dialing parts of a phone number
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberParts {
    pub country_code: String,
    pub area_code: Option<String>,
    pub local_number: String,
    pub extension: Option<String>,
}

impl PhoneNumberParts {
    /// Split `text` into its parts, or `None` when it is not a dialable number.
    ///
    /// The area code is the national destination code: the first digit group
    /// after the country code in international format. Numbers formatted as a
    /// single group have none.
    ///
    /// ```text
    /// +1 (303) 555-0100 x123  ->  1 / 303 / 5550100 / 123
    /// 303.555.0100            ->  1 / 303 / 5550100
    /// +44 20 7946 0958        ->  44 / 20 / 79460958
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let number = match phonenumber::parse(Some(DEFAULT_REGION), trimmed) {
            Ok(number) => number,
            Err(err) => {
                trace!("not a phone number {trimmed:?}: {err}");
                return None;
            }
        };

        let national = number.national().to_string();
        let area_code = destination_code(&number).filter(|code| national.starts_with(code.as_str()));
        let local_number = match &area_code {
            Some(code) => national[code.len()..].to_string(),
            None => national,
        };
        Some(Self {
            country_code: number.code().value().to_string(),
            area_code,
            local_number,
            extension: number.extension().map(|ext| ext.to_string()),
        })
    }

    pub fn part(&self, part: PhonePart) -> Option<&str> {
        match part {
            PhonePart::Country => Some(&self.country_code),
            PhonePart::AreaCode => self.area_code.as_deref(),
            PhonePart::Local => Some(&self.local_number),
            PhonePart::Extension => self.extension.as_deref(),
        }
    }

    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }
}

/// Second digit group of the international rendering, extension excluded
fn destination_code(number: &PhoneNumber) -> Option<String> {
    let mut formatted = String::new();
    write!(formatted, "{}", number.format().mode(Mode::International)).ok()?;
    let digits = match number.extension() {
        Some(ext) => formatted.strip_suffix(&**ext).unwrap_or(&formatted),
        None => &formatted,
    };
    let groups: Vec<&str> = digits
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .collect();
    match groups.as_slice() {
        [_country, code, _, ..] => Some(code.to_string()),
        _ => None,
    }
}
