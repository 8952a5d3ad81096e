//! Functions backed by reference tables

use super::{Collection, single_string, string_param};
use crate::core::{JsonValueExt, Result, TranslationError, TranslationValue};
use crate::lookup::{
    FIPS_COUNTY_TABLE_NAME, LIVD_TABLE_NAME, LookupTables, ObservationDevice, ZIP_CODE_TABLE_NAME,
    fips_county_code, states_for_zip_code,
};
use crate::registry::function::CustomFunction;
use log::{debug, warn};
use serde_json::Value as JsonValue;

/// Look up a LIVD column for the device that produced an Observation.
///
/// The device id, equipment model id and device name are tried in turn, each
/// as the only device key of its query.
pub fn livd_table_lookup(
    function: CustomFunction,
    tables: &LookupTables,
    focus: &[TranslationValue],
    parameters: &[Collection],
    bundle: Option<&JsonValue>,
) -> Result<Collection> {
    let [value] = focus else {
        return Err(TranslationError::invalid_invocation(
            function.name(),
            "Must call the livdTableLookup function on a single observation",
        ));
    };
    let observation = value
        .as_resource()
        .filter(|resource| resource.is_resource_type("Observation"))
        .ok_or_else(|| {
            TranslationError::invalid_invocation(
                function.name(),
                "Must call the livdTableLookup function on an observation",
            )
        })?;
    let column = string_param(function, parameters, 0)?.ok_or_else(|| {
        TranslationError::invalid_invocation(function.name(), "Must pass the LIVD column to return")
    })?;
    let Some(table) = tables.get(LIVD_TABLE_NAME) else {
        warn!("no {LIVD_TABLE_NAME} table loaded for livdTableLookup");
        return Ok(Vec::new());
    };

    let device = ObservationDevice::from_observation(observation, bundle);
    let result = device
        .queries()
        .iter()
        .find_map(|query| query.find(table.as_ref(), &column))
        .filter(|value| !value.trim().is_empty());
    debug!("livdTableLookup({column}) for {device:?}: {result:?}");
    Ok(result.map(TranslationValue::String).into_iter().collect())
}

/// FIPS code for `(county, state)`
pub fn fips_county_lookup(
    function: CustomFunction,
    tables: &LookupTables,
    parameters: &[Collection],
) -> Result<Collection> {
    let Some(county) = string_param(function, parameters, 0)? else {
        return Ok(vec![TranslationValue::string("")]);
    };
    let state = string_param(function, parameters, 1)?.unwrap_or_default();
    let code = match tables.get(FIPS_COUNTY_TABLE_NAME) {
        Some(table) => fips_county_code(table.as_ref(), &county, &state),
        None => {
            warn!("no {FIPS_COUNTY_TABLE_NAME} table loaded for fipsCountyLookup");
            county
        }
    };
    Ok(vec![TranslationValue::String(code)])
}

pub fn get_state_from_zip_code(
    function: CustomFunction,
    tables: &LookupTables,
    focus: &[TranslationValue],
) -> Result<Collection> {
    let Some(zip_code) = single_string(function, focus)? else {
        return Ok(Vec::new());
    };
    let states = match tables.get(ZIP_CODE_TABLE_NAME) {
        Some(table) => states_for_zip_code(table.as_ref(), zip_code),
        None => {
            warn!("no {ZIP_CODE_TABLE_NAME} table loaded for getStateFromZipCode");
            String::new()
        }
    };
    Ok(vec![TranslationValue::String(states)])
}
