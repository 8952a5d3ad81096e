//! Receiver configuration consumed by the translation primitives

use crate::core::{Result, TranslationError};
use crate::hl7::normalize_field_path;
use crate::temporal::{DateTimeFormat, Zone};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Deployment environment of the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    Test,
    #[default]
    Local,
}

impl Environment {
    /// HL7 processing id (MSH-11): `P` in production, `T` everywhere else
    pub fn processing_id(&self) -> &'static str {
        match self {
            Environment::Production => "P",
            _ => "T",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "prod"),
            Environment::Staging => write!(f, "staging"),
            Environment::Test => write!(f, "test"),
            Environment::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "test" => Ok(Environment::Test),
            "local" => Ok(Environment::Local),
            _ => Err(TranslationError::configuration_error(format!(
                "Invalid environment: {s}"
            ))),
        }
    }
}

/// Which HL7 fields may be shortened, and to what length
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TruncationConfig {
    /// Truncate HD namespace ids (e.g. MSH-4-1) to 20 characters
    #[serde(rename = "truncateHDNamespaceIds")]
    pub truncate_hd_namespace_ids: bool,
    /// Field specs such as `MSH-4-1` eligible for truncation
    #[serde(rename = "truncateHl7Fields")]
    pub truncate_fields: IndexSet<String>,
    /// Per-field lengths replacing the HL7 table length
    pub custom_lengths: IndexMap<String, usize>,
}

impl TruncationConfig {
    /// Build from the comma separated receiver setting, e.g. `"MSH-4-1, ORC-12-1"`
    pub fn from_field_list(fields: &str) -> Self {
        Self {
            truncate_fields: fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_hd_namespace_truncation(mut self, enabled: bool) -> Self {
        self.truncate_hd_namespace_ids = enabled;
        self
    }

    pub fn with_custom_length(mut self, field: impl Into<String>, length: usize) -> Self {
        self.custom_lengths.insert(field.into(), length);
        self
    }

    /// Whether `field` is listed, compared as normalized field specs
    pub fn is_truncated(&self, field: &str) -> bool {
        let field = normalize_field_path(field);
        self.truncate_fields
            .iter()
            .any(|listed| normalize_field_path(listed).eq_ignore_ascii_case(&field))
    }
}

/// How date/times are rendered for a receiver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiverDateTimeSettings {
    /// Receiver's local zone
    pub time_zone: Option<Zone>,
    /// Explicit output format, overriding the header-format switch
    pub format: Option<DateTimeFormat>,
    /// Re-zone timestamps into the receiver's zone
    pub convert_to_receiver_local_time: bool,
    pub use_high_precision_header_format: bool,
    /// Write a zero offset as `-0000`
    pub convert_positive_offset_to_negative: bool,
    /// Fields (e.g. `MSH-7`) rendered as local date/times without offset
    pub convert_timestamp_to_date_time: Vec<String>,
}

impl ReceiverDateTimeSettings {
    pub fn with_time_zone(mut self, zone: Zone) -> Self {
        self.time_zone = Some(zone);
        self
    }

    pub fn with_format(mut self, format: DateTimeFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_receiver_local_time(mut self, enabled: bool) -> Self {
        self.convert_to_receiver_local_time = enabled;
        self
    }

    pub fn with_high_precision_header_format(mut self, enabled: bool) -> Self {
        self.use_high_precision_header_format = enabled;
        self
    }

    pub fn with_negative_zero_offset(mut self, enabled: bool) -> Self {
        self.convert_positive_offset_to_negative = enabled;
        self
    }

    /// Set the comma separated list of fields rendered without offset
    pub fn with_timestamp_to_date_time(mut self, fields: &str) -> Self {
        self.convert_timestamp_to_date_time = fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Output format for a value, header-format switch applied
    pub fn output_format(&self) -> DateTimeFormat {
        match self.format.unwrap_or_default() {
            DateTimeFormat::Offset if self.use_high_precision_header_format => {
                DateTimeFormat::HighPrecisionOffset
            }
            format => format,
        }
    }
}

/// Everything a translation run needs to know about its receiver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationConfig {
    pub truncation: TruncationConfig,
    pub date_time: ReceiverDateTimeSettings,
    pub environment: Environment,
}

impl TranslationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_truncation(mut self, truncation: TruncationConfig) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn with_date_time(mut self, date_time: ReceiverDateTimeSettings) -> Self {
        self.date_time = date_time;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}
