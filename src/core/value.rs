//! Values exchanged with the path-expression engine
//!
//! Resources are carried as `serde_json::Value`; the `JsonValueExt` trait adds
//! the FHIR-aware accessors the custom functions need.

use crate::core::temporal::TemporalValue;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// A single item of a path-expression collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TranslationValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    DateTime(TemporalValue),
    Resource(JsonValue),
}

impl TranslationValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// String content of primitive values; FHIR primitives wrapped in JSON count too
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Resource(JsonValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&JsonValue> {
        match self {
            Self::Resource(value) => Some(value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "dateTime",
            Self::Resource(value) => value.resource_type().map_or("element", |_| "resource"),
        }
    }
}

impl fmt::Display for TranslationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Resource(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for TranslationValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TranslationValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for TranslationValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for TranslationValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<JsonValue> for TranslationValue {
    fn from(value: JsonValue) -> Self {
        Self::Resource(value)
    }
}

/// FHIR-aware accessors over JSON resources
pub trait JsonValueExt {
    /// Get a property from an object
    fn get_property(&self, key: &str) -> Option<&JsonValue>;

    /// Get a string property from an object
    fn get_str(&self, key: &str) -> Option<&str>;

    /// Resource type, if this is a FHIR resource
    fn resource_type(&self) -> Option<&str>;

    fn is_resource_type(&self, resource_type: &str) -> bool {
        self.resource_type() == Some(resource_type)
    }
}

impl JsonValueExt for JsonValue {
    fn get_property(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get_property(key).and_then(|v| v.as_str())
    }

    fn resource_type(&self) -> Option<&str> {
        self.get_str("resourceType")
    }
}
