//! Coding system and identifier helpers

use super::{Collection, single_string, sole_string, string_param};
use crate::core::{Result, TranslationError, TranslationValue};
use crate::registry::function::CustomFunction;
use once_cell::sync::Lazy;
use regex::Regex;

/// FHIR code system URLs and the HL7 v2 table 0396 ids they map to
const CODING_SYSTEMS: [(&str, &str); 12] = [
    ("http://hl7.org/fhir/sid/icd-10-cm", "I10"),
    ("http://loinc.org", "LN"),
    ("https://terminology.hl7.org/CodeSystem-v2-0396.html#v2-0396-99zzzorL", "L"),
    ("http://snomed.info/sct", "SCT"),
    ("http://terminology.hl7.org/CodeSystem/v2-0189", "HL70189"),
    ("http://terminology.hl7.org/CodeSystem/v3-Race", "HL70005"),
    ("http://terminology.hl7.org/CodeSystem/v2-0006", "HL70006"),
    ("http://terminology.hl7.org/ValueSet/v2-0136", "HL70136"),
    ("http://terminology.hl7.org/CodeSystem/v2-0078", "HL70078"),
    ("http://terminology.hl7.org/CodeSystem/v2-0131", "HL70131"),
    ("http://unitsofmeasure.org", "UCUM"),
    ("http://terminology.hl7.org/CodeSystem/v3-NullFlavor", "NULLFL"),
];

const OID_TYPE: &str = "ISO";
const CLIA_TYPE: &str = "CLIA";

static OID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-2](\.(0|[1-9]\d*))+$").expect("valid OID regex"));

/// Ten characters: alphanumeric, digit, letter, seven digits
static CLIA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\d]\d[a-zA-Z]\d{7}$").expect("valid CLIA regex"));

static URN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^urn:(oid|uuid|dns|uri|clia|id):(.*)$").expect("valid URN regex")
});

/// `<name>-<type>:<value>`
static TYPED_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)-(.*):(.*)$").expect("valid typed id regex"));

/// HL7 coding system id for a FHIR system URL; empty for unknown systems
pub fn coding_system_id(url: &str) -> &'static str {
    CODING_SYSTEMS
        .iter()
        .find(|(fhir_url, _)| *fhir_url == url)
        .map_or("", |(_, hl7_id)| *hl7_id)
}

pub fn get_coding_system_mapping(
    function: CustomFunction,
    focus: &[TranslationValue],
) -> Result<Collection> {
    Ok(single_string(function, focus)?
        .map(|url| TranslationValue::string(coding_system_id(url)))
        .into_iter()
        .collect())
}

pub fn split(
    function: CustomFunction,
    focus: &[TranslationValue],
    parameters: &[Collection],
) -> Result<Collection> {
    let delimiter = string_param(function, parameters, 0)?.ok_or_else(|| {
        TranslationError::invalid_invocation(function.name(), "Must pass a delimiter")
    })?;
    Ok(sole_string(focus)
        .map(|text| {
            text.split(delimiter.as_str())
                .map(TranslationValue::string)
                .collect()
        })
        .unwrap_or_default())
}

/// Identifier value of a URN (`urn:oid:1.2.3`) or typed id (`lab-CLIA:05D2222542`)
pub fn identifier_value(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        return None;
    }
    if let Some(captures) = URN.captures(text) {
        return captures.get(2).map(|m| m.as_str());
    }
    if let Some(captures) = TYPED_ID.captures(text) {
        return captures.get(3).map(|m| m.as_str());
    }
    Some(text)
}

/// Identifier type: `ISO` for OIDs, `CLIA` for CLIA numbers, else the stated type
pub fn identifier_type(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    if let Some(captures) = URN.captures(text) {
        let scheme = captures.get(1)?.as_str().to_ascii_uppercase();
        return match scheme.as_str() {
            "OID" => Some(OID_TYPE.to_string()),
            "ID" => None,
            _ => Some(scheme),
        };
    }
    if let Some(captures) = TYPED_ID.captures(text) {
        let value = captures.get(3)?.as_str();
        return Some(if OID.is_match(value) {
            OID_TYPE.to_string()
        } else if CLIA.is_match(value) {
            CLIA_TYPE.to_string()
        } else {
            captures.get(2)?.as_str().to_string()
        });
    }
    CLIA.is_match(text).then(|| CLIA_TYPE.to_string())
}

pub fn get_id(focus: &[TranslationValue]) -> Collection {
    sole_string(focus)
        .and_then(identifier_value)
        .map(TranslationValue::string)
        .into_iter()
        .collect()
}

pub fn get_id_type(focus: &[TranslationValue]) -> Collection {
    sole_string(focus)
        .and_then(identifier_type)
        .map(TranslationValue::String)
        .into_iter()
        .collect()
}
