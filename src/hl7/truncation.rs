//! Shortening of values written into fixed-width HL7 fields

use super::field_lengths::{FieldLengthTable, HD_NAMESPACE_MAX_LENGTH, normalize_field_path};
use crate::config::TruncationConfig;
use log::{debug, trace};
use std::borrow::Cow;

/// HL7 delimiters that are written as three-character escapes
const ESCAPED_DELIMITERS: [char; 4] = ['&', '^', '~', '|'];

/// Decides whether a value fits its HL7 field
pub trait TruncationPolicy {
    /// Return `value`, shortened when the policy says so.
    ///
    /// Never truncates by default.
    fn maybe_truncate<'a>(
        &self,
        value: &'a str,
        _field_path: &str,
        _config: &TruncationConfig,
    ) -> Cow<'a, str> {
        Cow::Borrowed(value)
    }
}

/// Policy for receivers that take values as they are
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTruncation;

impl TruncationPolicy for NoopTruncation {}

/// Truncation by HL7 2.5.1 field and component lengths
#[derive(Debug, Clone, Copy, Default)]
pub struct Hl7Truncator;

impl Hl7Truncator {
    pub fn new() -> Self {
        Self
    }

    /// Maximum length for `value` at `field_path`, if it is to be truncated.
    ///
    /// HD namespace ids are governed by `truncate_hd_namespace_ids` alone.
    /// Other fields must be listed in `truncate_fields` and known to the
    /// length tables; a custom length replaces the table length.
    pub fn max_length(&self, value: &str, field_path: &str, config: &TruncationConfig) -> Option<usize> {
        let field = normalize_field_path(field_path);
        if FieldLengthTable::is_hd_namespace_field(&field) {
            return config
                .truncate_hd_namespace_ids
                .then(|| limit_with_encoding(value, HD_NAMESPACE_MAX_LENGTH));
        }
        if !config.is_truncated(&field) {
            return None;
        }
        let table_length = FieldLengthTable::max_length(&field)?;
        let length = match custom_length(config, &field) {
            Some(custom) => {
                debug!("custom length {custom} for {field} replaces {table_length}");
                custom
            }
            None => table_length,
        };
        Some(limit_with_encoding(value, length))
    }
}

impl TruncationPolicy for Hl7Truncator {
    fn maybe_truncate<'a>(
        &self,
        value: &'a str,
        field_path: &str,
        config: &TruncationConfig,
    ) -> Cow<'a, str> {
        let Some(limit) = self.max_length(value, field_path, config) else {
            return Cow::Borrowed(value);
        };
        match value.char_indices().nth(limit) {
            Some((end, _)) => {
                trace!("truncating {field_path} to {limit} characters");
                Cow::Owned(value[..end].to_string())
            }
            None => Cow::Borrowed(value),
        }
    }
}

fn custom_length(config: &TruncationConfig, field: &str) -> Option<usize> {
    config
        .custom_lengths
        .iter()
        .find(|(f, _)| normalize_field_path(f).eq_ignore_ascii_case(field))
        .map(|(_, length)| *length)
}

/// Shrink `limit` by two for every delimiter within the first `limit`
/// characters, since each is written as a three-character escape
pub fn limit_with_encoding(value: &str, limit: usize) -> usize {
    let delimiters = value
        .chars()
        .take(limit)
        .filter(|c| ESCAPED_DELIMITERS.contains(c))
        .count();
    limit.saturating_sub(delimiters * 2)
}
