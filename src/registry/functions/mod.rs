//! Implementations of the custom functions
//!
//! Each function takes the focus collection and the evaluated parameter
//! collections and returns a collection. String functions propagate an empty
//! focus as an empty result.

pub mod identifier;
pub mod lookup;
pub mod phone;
pub mod timezone;

use super::function::CustomFunction;
use crate::core::{Result, TranslationError, TranslationValue};

/// A path-expression collection
pub type Collection = Vec<TranslationValue>;

/// The single string a string function operates on
pub(crate) fn single_string(
    function: CustomFunction,
    focus: &[TranslationValue],
) -> Result<Option<&str>> {
    match focus {
        [] => Ok(None),
        [value] => value.as_str().map(Some).ok_or_else(|| {
            TranslationError::invalid_invocation(
                function.name(),
                format!("Must be called on a string, not a {}", value.type_name()),
            )
        }),
        _ => Err(TranslationError::invalid_invocation(
            function.name(),
            format!("Must be called on a single element, not {}", focus.len()),
        )),
    }
}

/// The focus when it is exactly one string; anything else yields nothing
pub(crate) fn sole_string(focus: &[TranslationValue]) -> Option<&str> {
    match focus {
        [value] => value.as_str(),
        _ => None,
    }
}

/// First item of parameter `index` rendered as text
pub(crate) fn string_param(
    function: CustomFunction,
    parameters: &[Collection],
    index: usize,
) -> Result<Option<String>> {
    let Some(value) = parameters.get(index).and_then(|param| param.first()) else {
        return Ok(None);
    };
    match value {
        TranslationValue::String(s) => Ok(Some(s.clone())),
        TranslationValue::Integer(i) => Ok(Some(i.to_string())),
        TranslationValue::Boolean(b) => Ok(Some(b.to_string())),
        TranslationValue::DateTime(dt) => Ok(Some(dt.to_string())),
        TranslationValue::Resource(_) => value.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
            TranslationError::invalid_invocation(
                function.name(),
                format!("Parameter {} must be a primitive value", index + 1),
            )
        }),
    }
}

/// Boolean parameter; `true` in any case counts as set
pub(crate) fn bool_param(
    function: CustomFunction,
    parameters: &[Collection],
    index: usize,
) -> Result<bool> {
    if let Some(TranslationValue::Boolean(b)) = parameters.get(index).and_then(|p| p.first()) {
        return Ok(*b);
    }
    Ok(string_param(function, parameters, index)?.is_some_and(|s| s.trim().eq_ignore_ascii_case("true")))
}
