//! Phone number part extraction

use super::{Collection, single_string};
use crate::core::{Result, TranslationValue};
use crate::phone::{PhoneNumberParts, PhonePart};
use crate::registry::function::CustomFunction;

/// The requested part as an integer, or an empty collection
pub fn phone_number_part(
    function: CustomFunction,
    focus: &[TranslationValue],
    part: PhonePart,
) -> Result<Collection> {
    let value = single_string(function, focus)?
        .and_then(PhoneNumberParts::parse)
        .and_then(|parts| parts.part(part).and_then(|p| p.parse::<i64>().ok()));
    Ok(value.map(TranslationValue::Integer).into_iter().collect())
}

pub fn has_phone_number_extension(
    function: CustomFunction,
    focus: &[TranslationValue],
) -> Result<Collection> {
    let has_extension = single_string(function, focus)?
        .and_then(PhoneNumberParts::parse)
        .is_some_and(|parts| parts.has_extension());
    Ok(vec![TranslationValue::Boolean(has_extension)])
}
