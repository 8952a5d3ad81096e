//! The closed set of custom functions and their dispatch

use super::functions::{Collection, identifier, lookup, phone, timezone};
use super::signature::{FunctionSignature, ValueType};
use crate::core::{Result, TranslationError, TranslationValue};
use crate::lookup::LookupTables;
use crate::phone::PhonePart;
use log::trace;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Custom functions callable from path expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomFunction {
    LivdTableLookup,
    GetPhoneNumberCountryCode,
    GetPhoneNumberAreaCode,
    GetPhoneNumberLocalNumber,
    GetPhoneNumberExtension,
    HasPhoneNumberExtension,
    GetCodingSystemMapping,
    Split,
    GetId,
    GetIdType,
    ChangeTimezone,
    FipsCountyLookup,
    GetStateFromZipCode,
}

impl CustomFunction {
    pub const ALL: [Self; 13] = [
        Self::LivdTableLookup,
        Self::GetPhoneNumberCountryCode,
        Self::GetPhoneNumberAreaCode,
        Self::GetPhoneNumberLocalNumber,
        Self::GetPhoneNumberExtension,
        Self::HasPhoneNumberExtension,
        Self::GetCodingSystemMapping,
        Self::Split,
        Self::GetId,
        Self::GetIdType,
        Self::ChangeTimezone,
        Self::FipsCountyLookup,
        Self::GetStateFromZipCode,
    ];

    /// Match a function name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        self.signature().name
    }

    pub const fn signature(&self) -> FunctionSignature {
        match self {
            Self::LivdTableLookup => FunctionSignature::new(
                "livdTableLookup",
                1,
                1,
                ValueType::String,
                "looks up data in the LIVD table that match the information provided",
            ),
            Self::GetPhoneNumberCountryCode => FunctionSignature::new(
                "getPhoneNumberCountryCode",
                0,
                0,
                ValueType::Integer,
                "extract country code from FHIR phone number",
            ),
            Self::GetPhoneNumberAreaCode => FunctionSignature::new(
                "getPhoneNumberAreaCode",
                0,
                0,
                ValueType::Integer,
                "extract area code from FHIR phone number",
            ),
            Self::GetPhoneNumberLocalNumber => FunctionSignature::new(
                "getPhoneNumberLocalNumber",
                0,
                0,
                ValueType::Integer,
                "extract local number from FHIR phone number",
            ),
            Self::GetPhoneNumberExtension => FunctionSignature::new(
                "getPhoneNumberExtension",
                0,
                0,
                ValueType::Integer,
                "extract extension from FHIR phone number",
            ),
            Self::HasPhoneNumberExtension => FunctionSignature::new(
                "hasPhoneNumberExtension",
                0,
                0,
                ValueType::Boolean,
                "see if extension exists in FHIR phone number",
            ),
            Self::GetCodingSystemMapping => FunctionSignature::new(
                "getCodingSystemMapping",
                0,
                0,
                ValueType::String,
                "convert FHIR coding system url to HL7 ID",
            ),
            Self::Split => FunctionSignature::new(
                "split",
                1,
                1,
                ValueType::String,
                "splits a string by provided delimiter",
            ),
            Self::GetId => FunctionSignature::new(
                "getId",
                0,
                0,
                ValueType::String,
                "extracts an ID from a resource property",
            ),
            Self::GetIdType => FunctionSignature::new(
                "getIdType",
                0,
                0,
                ValueType::String,
                "determines the ID type from a resource property",
            ),
            Self::ChangeTimezone => FunctionSignature::new(
                "changeTimezone",
                1,
                4,
                ValueType::DateTime,
                "changes the timezone of a dateTime, instant, or date to the timezone passed in",
            ),
            Self::FipsCountyLookup => FunctionSignature::new(
                "fipsCountyLookup",
                2,
                2,
                ValueType::String,
                "looks up the FIPS code of a county and state",
            ),
            Self::GetStateFromZipCode => FunctionSignature::new(
                "getStateFromZipCode",
                0,
                0,
                ValueType::String,
                "looks up the states a zip code belongs to",
            ),
        }
    }
}

impl fmt::Display for CustomFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves and executes custom functions for the expression engine
///
/// Unknown names resolve to `None` so the engine can try its own functions.
#[derive(Debug, Clone, Default)]
pub struct CustomFunctionRegistry {
    tables: Arc<LookupTables>,
}

impl CustomFunctionRegistry {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn resolve(&self, name: &str) -> Option<FunctionSignature> {
        CustomFunction::from_name(name).map(|function| function.signature())
    }

    pub fn execute(
        &self,
        focus: &[TranslationValue],
        name: &str,
        parameters: &[Collection],
    ) -> Result<Collection> {
        self.execute_in_bundle(focus, name, parameters, None)
    }

    /// Execute with the bundle the focus came from, for resolving references
    pub fn execute_in_bundle(
        &self,
        focus: &[TranslationValue],
        name: &str,
        parameters: &[Collection],
        bundle: Option<&JsonValue>,
    ) -> Result<Collection> {
        let function =
            CustomFunction::from_name(name).ok_or_else(|| TranslationError::unknown_function(name))?;
        self.invoke(function, focus, parameters, bundle)
    }

    /// Execute a function resolved ahead of time
    pub fn invoke(
        &self,
        function: CustomFunction,
        focus: &[TranslationValue],
        parameters: &[Collection],
        bundle: Option<&JsonValue>,
    ) -> Result<Collection> {
        let signature = function.signature();
        if !signature.accepts_param_count(parameters.len()) {
            return Err(TranslationError::invalid_invocation(
                function.name(),
                format!(
                    "Expected {}..={} parameters, got {}",
                    signature.min_params,
                    signature.max_params,
                    parameters.len()
                ),
            ));
        }
        trace!("invoking {function} on {} items", focus.len());

        use CustomFunction::*;
        match function {
            LivdTableLookup => {
                lookup::livd_table_lookup(function, &self.tables, focus, parameters, bundle)
            }
            GetPhoneNumberCountryCode => phone::phone_number_part(function, focus, PhonePart::Country),
            GetPhoneNumberAreaCode => phone::phone_number_part(function, focus, PhonePart::AreaCode),
            GetPhoneNumberLocalNumber => phone::phone_number_part(function, focus, PhonePart::Local),
            GetPhoneNumberExtension => phone::phone_number_part(function, focus, PhonePart::Extension),
            HasPhoneNumberExtension => phone::has_phone_number_extension(function, focus),
            GetCodingSystemMapping => identifier::get_coding_system_mapping(function, focus),
            Split => identifier::split(function, focus, parameters),
            GetId => Ok(identifier::get_id(focus)),
            GetIdType => Ok(identifier::get_id_type(focus)),
            ChangeTimezone => timezone::change_timezone(function, focus, parameters),
            FipsCountyLookup => lookup::fips_county_lookup(function, &self.tables, parameters),
            GetStateFromZipCode => lookup::get_state_from_zip_code(function, &self.tables, focus),
        }
    }
}
