//! Test device lookups against the LIVD (LOINC In Vitro Diagnostic) table

use super::table::{Filter, LookupTable};
use crate::core::JsonValueExt;
use log::trace;
use serde_json::Value as JsonValue;

pub const LIVD_TABLE_NAME: &str = "LIVD-SARS-CoV-2";

pub const TESTKIT_NAME_ID: &str = "Testkit Name ID";
pub const EQUIPMENT_UID: &str = "Equipment UID";
pub const MODEL: &str = "Model";
pub const TEST_PERFORMED_CODE: &str = "Test Performed LOINC Code";
pub const PROCESSING_MODE_CODE: &str = "processing_mode_code";
pub const MANUFACTURER: &str = "Manufacturer";

/// Processing mode of test data; test devices only match test data
pub const TEST_PROCESSING_MODE: &str = "T";

/// Device id suffixes of the 99ELR coding convention
const STANDARD_99ELR_TYPES: [&str; 7] = ["EUA", "DII", "DIT", "DIM", "MNT", "MNI", "MNM"];

/// What is known about a test device, most specific key first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LivdQuery {
    pub test_performed_code: Option<String>,
    pub processing_mode_code: Option<String>,
    pub device_id: Option<String>,
    pub equipment_model_id: Option<String>,
    pub test_kit_name_id: Option<String>,
    pub equipment_model_name: Option<String>,
}

impl LivdQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_performed_code(mut self, code: impl Into<String>) -> Self {
        self.test_performed_code = Some(code.into());
        self
    }

    pub fn with_processing_mode_code(mut self, code: impl Into<String>) -> Self {
        self.processing_mode_code = Some(code.into());
        self
    }

    pub fn with_device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    pub fn with_equipment_model_id(mut self, id: impl Into<String>) -> Self {
        self.equipment_model_id = Some(id.into());
        self
    }

    pub fn with_test_kit_name_id(mut self, id: impl Into<String>) -> Self {
        self.test_kit_name_id = Some(id.into());
        self
    }

    pub fn with_equipment_model_name(mut self, name: impl Into<String>) -> Self {
        self.equipment_model_name = Some(name.into());
        self
    }

    /// Look up `column` for the device.
    ///
    /// Only the most specific non-empty key is used: device id, then equipment
    /// model id, then test kit name id, then model name.
    pub fn find(&self, table: &dyn LookupTable, column: &str) -> Option<String> {
        let filters = self.base_filters();
        let result = if let Some(device_id) = non_empty(&self.device_id) {
            lookup_by_device_id(table, column, device_id, &filters)
        } else if let Some(id) = non_empty(&self.equipment_model_id) {
            lookup(table, column, EQUIPMENT_UID, id, &filters)
        } else if let Some(id) = non_empty(&self.test_kit_name_id) {
            lookup(table, column, TESTKIT_NAME_ID, id, &filters)
        } else if let Some(name) = non_empty(&self.equipment_model_name) {
            lookup(table, column, MODEL, cleaned_model_name(name), &filters)
        } else {
            None
        };
        trace!("LIVD {column} for {self:?}: {result:?}");
        result
    }

    fn base_filters(&self) -> Vec<Filter> {
        let mut filters = Vec::with_capacity(2);
        if let Some(code) = &self.test_performed_code {
            filters.push(Filter::equals(TEST_PERFORMED_CODE, code.as_str()));
        }
        let test_data = self
            .processing_mode_code
            .as_deref()
            .is_some_and(|mode| mode.eq_ignore_ascii_case(TEST_PROCESSING_MODE));
        if !test_data {
            filters.push(Filter::not_equals(PROCESSING_MODE_CODE, TEST_PROCESSING_MODE));
        }
        filters
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A device id may be a test kit id or an equipment id, in 99ELR form
/// (`<id>_<type>`), or cut short and marked with a trailing `#`
fn lookup_by_device_id(
    table: &dyn LookupTable,
    column: &str,
    device_id: &str,
    filters: &[Filter],
) -> Option<String> {
    if device_id.trim().is_empty() {
        return None;
    }
    if let Some((id, suffix)) = device_id.rsplit_once('_')
        && STANDARD_99ELR_TYPES.contains(&suffix)
    {
        return lookup(table, column, TESTKIT_NAME_ID, id, filters)
            .or_else(|| lookup(table, column, EQUIPMENT_UID, id, filters));
    }
    if let Some(prefix) = device_id.strip_suffix('#') {
        return lookup_with(table, column, Filter::starts_with(TESTKIT_NAME_ID, prefix), filters)
            .or_else(|| lookup_with(table, column, Filter::starts_with(EQUIPMENT_UID, prefix), filters));
    }
    lookup(table, column, TESTKIT_NAME_ID, device_id, filters)
        .or_else(|| lookup(table, column, EQUIPMENT_UID, device_id, filters))
}

fn lookup(
    table: &dyn LookupTable,
    column: &str,
    on_column: &str,
    value: &str,
    filters: &[Filter],
) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    lookup_with(table, column, Filter::equals(on_column, value), filters)
}

fn lookup_with(
    table: &dyn LookupTable,
    column: &str,
    key: Filter,
    filters: &[Filter],
) -> Option<String> {
    let mut all = filters.to_vec();
    all.push(key);
    table.find_single_result(column, &all)
}

/// Drop a single trailing `*` from a model name
pub fn cleaned_model_name(name: &str) -> &str {
    name.strip_suffix('*').unwrap_or(name)
}

/// Device details of an Observation, following its device reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationDevice {
    pub test_performed_code: Option<String>,
    pub device_id: Option<String>,
    pub equipment_model_id: Option<String>,
    pub device_name: Option<String>,
}

impl ObservationDevice {
    /// Extract device details from an Observation resource.
    ///
    /// The device reference is resolved against the Observation's contained
    /// resources (`#id`) and, when given, the entries of the enclosing bundle.
    /// The device name falls back to the reference display.
    pub fn from_observation(observation: &JsonValue, bundle: Option<&JsonValue>) -> Self {
        let first_code = |element: Option<&JsonValue>| {
            element
                .and_then(|e| e.get_property("coding"))
                .and_then(|coding| coding.get(0))
                .and_then(|coding| coding.get_str("code"))
                .map(str::to_string)
        };
        let reference = observation.get_property("device");
        let device = reference
            .and_then(|r| r.get_str("reference"))
            .and_then(|r| resolve_reference(observation, r, bundle));

        let device_name = device
            .and_then(|d| d.get_property("deviceName"))
            .and_then(|names| names.get(0))
            .and_then(|name| name.get_str("name"))
            .or_else(|| reference.and_then(|r| r.get_str("display")))
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string);

        Self {
            test_performed_code: first_code(observation.get_property("code")),
            device_id: first_code(observation.get_property("method")),
            equipment_model_id: device
                .and_then(|d| d.get_property("identifier"))
                .and_then(|ids| ids.get(0))
                .and_then(|id| id.get_str("id").or_else(|| id.get_str("value")))
                .map(str::to_string),
            device_name,
        }
    }

    /// Queries to try in order, each with a single device key
    pub fn queries(&self) -> Vec<LivdQuery> {
        let base = LivdQuery {
            test_performed_code: self.test_performed_code.clone(),
            ..LivdQuery::default()
        };
        let mut queries = Vec::with_capacity(3);
        if let Some(id) = non_empty(&self.device_id) {
            queries.push(base.clone().with_device_id(id));
        }
        if let Some(id) = non_empty(&self.equipment_model_id) {
            queries.push(base.clone().with_equipment_model_id(id));
        }
        if let Some(name) = non_empty(&self.device_name) {
            queries.push(base.with_equipment_model_name(name));
        }
        queries
    }
}

fn resolve_reference<'a>(
    resource: &'a JsonValue,
    reference: &str,
    bundle: Option<&'a JsonValue>,
) -> Option<&'a JsonValue> {
    if let Some(id) = reference.strip_prefix('#') {
        return resource
            .get_property("contained")?
            .as_array()?
            .iter()
            .find(|contained| contained.get_str("id") == Some(id));
    }
    let entries = bundle?.get_property("entry")?.as_array()?;
    entries
        .iter()
        .find(|entry| {
            entry.get_str("fullUrl").is_some_and(|url| {
                url == reference || url.ends_with(&format!("/{reference}"))
            })
        })
        .or_else(|| {
            let (resource_type, id) = reference.rsplit_once('/')?;
            entries.iter().find(|entry| {
                entry.get_property("resource").is_some_and(|r| {
                    r.is_resource_type(resource_type.rsplit('/').next().unwrap_or(resource_type))
                        && r.get_str("id") == Some(id)
                })
            })
        })
        .and_then(|entry| entry.get_property("resource"))
}
