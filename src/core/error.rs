//! Translation error types with error codes

use thiserror::Error;

pub use super::error_code::*;

/// Failure raised by a translation primitive
///
/// None of these are retryable: every operation is a deterministic function of its
/// inputs. The schema-evaluation layer decides whether a failure aborts a report or
/// becomes a field-level warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    /// No accepted grammar matched a date/time string
    #[error("{error_code}: {message}")]
    UnparseableTemporal {
        error_code: ErrorCode,
        message: String,
        input: String,
    },

    /// A zone-dependent conversion was attempted without a zone
    #[error("{error_code}: {message}")]
    MissingZone { error_code: ErrorCode, message: String },

    /// A zone identifier could not be resolved
    #[error("{error_code}: {message}")]
    InvalidZone {
        error_code: ErrorCode,
        message: String,
        zone: String,
    },

    /// A substitution token referenced an unbound constant
    #[error("{error_code}: {message}")]
    UnresolvedConstant {
        error_code: ErrorCode,
        message: String,
        name: String,
    },

    /// A reserved name was bound as a constant
    #[error("{error_code}: {message}")]
    ReservedConstantName {
        error_code: ErrorCode,
        message: String,
        name: String,
    },

    /// A custom function was called on the wrong focus or with bad parameters
    #[error("{error_code}: {message}")]
    InvalidFunctionInvocation {
        error_code: ErrorCode,
        message: String,
        function_name: Option<String>,
    },

    /// A precision the HL7 converter cannot render
    #[error("{error_code}: {message}")]
    UnsupportedPrecision {
        error_code: ErrorCode,
        message: String,
        precision: String,
    },

    /// Configuration could not be loaded
    #[error("{error_code}: {message}")]
    ConfigurationError { error_code: ErrorCode, message: String },
}

impl TranslationError {
    pub fn unparseable_temporal(input: impl Into<String>) -> Self {
        let input = input.into();
        Self::UnparseableTemporal {
            error_code: TR0001,
            message: format!("Invalid date: '{input}' does not match any accepted format"),
            input,
        }
    }

    pub fn missing_zone(message: impl Into<String>) -> Self {
        Self::MissingZone {
            error_code: TR0002,
            message: message.into(),
        }
    }

    pub fn invalid_zone(zone: impl Into<String>) -> Self {
        let zone = zone.into();
        Self::InvalidZone {
            error_code: TR0003,
            message: format!("Unknown time zone '{zone}'"),
            zone,
        }
    }

    pub fn unresolved_constant(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::UnresolvedConstant {
            error_code: TR0051,
            message: format!("Constant '{name}' is not bound in the current context"),
            name,
        }
    }

    pub fn no_constant_context(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::UnresolvedConstant {
            error_code: TR0051,
            message: format!("No context available to resolve constant '{name}'"),
            name,
        }
    }

    /// A constant whose value refers back to itself through `chain`
    pub fn cyclic_constant(name: impl Into<String>, chain: &[String]) -> Self {
        let name = name.into();
        Self::UnresolvedConstant {
            error_code: TR0051,
            message: format!("Constant '{name}' refers to itself through {}", chain.join(" -> ")),
            name,
        }
    }

    pub fn reserved_constant_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::ReservedConstantName {
            error_code: TR0052,
            message: format!("Constant name '{name}' is reserved"),
            name,
        }
    }

    /// Create an invalid invocation error for a named function
    pub fn invalid_invocation(function_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFunctionInvocation {
            error_code: TR0101,
            message: message.into(),
            function_name: Some(function_name.into()),
        }
    }

    pub fn unknown_function(function_name: impl Into<String>) -> Self {
        let function_name = function_name.into();
        Self::InvalidFunctionInvocation {
            error_code: TR0102,
            message: format!("'{function_name}' is not a custom function"),
            function_name: Some(function_name),
        }
    }

    pub fn unsupported_precision(precision: impl Into<String>) -> Self {
        let precision = precision.into();
        Self::UnsupportedPrecision {
            error_code: TR0004,
            message: format!("Unsupported temporal precision '{precision}'"),
            precision,
        }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            error_code: TR0151,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &ErrorCode {
        match self {
            Self::UnparseableTemporal { error_code, .. } => error_code,
            Self::MissingZone { error_code, .. } => error_code,
            Self::InvalidZone { error_code, .. } => error_code,
            Self::UnresolvedConstant { error_code, .. } => error_code,
            Self::ReservedConstantName { error_code, .. } => error_code,
            Self::InvalidFunctionInvocation { error_code, .. } => error_code,
            Self::UnsupportedPrecision { error_code, .. } => error_code,
            Self::ConfigurationError { error_code, .. } => error_code,
        }
    }

    /// Get error information with help text
    pub fn error_info(&self) -> &'static ErrorInfo {
        self.error_code().info()
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(err: serde_json::Error) -> Self {
        Self::configuration_error(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
