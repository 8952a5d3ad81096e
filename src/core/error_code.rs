//! Error code system for translation failures (TR0001, TR0002, etc.)
//!
//! Codes are grouped in blocks of fifty per component family so that a code
//! seen in a log line identifies the failing layer without the message text.

use std::fmt;

/// Error categories for organizing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Date/time parsing and formatting errors (TR0001-TR0050)
    Temporal,
    /// Constant substitution and resolution errors (TR0051-TR0100)
    Constants,
    /// Custom function errors (TR0101-TR0150)
    Functions,
    /// Configuration errors (TR0151-TR0200)
    Configuration,
}

/// Error code following the compiler pattern (TR0001, TR0002, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    pub code: u16,
}

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self { code }
    }

    /// Full code string, e.g. "TR0001"
    pub fn code_str(&self) -> String {
        format!("TR{:04}", self.code)
    }

    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_REGISTRY.get_error_info(self)
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code {
            1..=50 => ErrorCategory::Temporal,
            51..=100 => ErrorCategory::Constants,
            101..=150 => ErrorCategory::Functions,
            _ => ErrorCategory::Configuration,
        }
    }

    pub fn description(&self) -> &'static str {
        self.info().title
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TR{:04}", self.code)
    }
}

/// Documentation attached to an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub code: u16,
    pub title: &'static str,
    pub description: &'static str,
    pub help: &'static str,
}

impl ErrorInfo {
    pub const fn new(
        code: u16,
        title: &'static str,
        description: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            code,
            title,
            description,
            help,
        }
    }
}

/// Central registry of all error definitions
pub struct ErrorRegistry;

impl ErrorRegistry {
    pub fn get_error_info(&self, error_code: &ErrorCode) -> &'static ErrorInfo {
        match error_code.code {
            1 => &TR0001_INFO,
            2 => &TR0002_INFO,
            3 => &TR0003_INFO,
            4 => &TR0004_INFO,
            51 => &TR0051_INFO,
            52 => &TR0052_INFO,
            101 => &TR0101_INFO,
            102 => &TR0102_INFO,
            151 => &TR0151_INFO,
            _ => &UNKNOWN_ERROR_INFO,
        }
    }
}

pub static ERROR_REGISTRY: ErrorRegistry = ErrorRegistry;

// Temporal (TR0001-TR0050)
pub const TR0001: ErrorCode = ErrorCode::new(1); // Unparseable date/time
pub const TR0002: ErrorCode = ErrorCode::new(2); // Missing zone
pub const TR0003: ErrorCode = ErrorCode::new(3); // Invalid zone identifier
pub const TR0004: ErrorCode = ErrorCode::new(4); // Unsupported precision

// Constants (TR0051-TR0100)
pub const TR0051: ErrorCode = ErrorCode::new(51); // Unresolved constant
pub const TR0052: ErrorCode = ErrorCode::new(52); // Reserved constant name

// Functions (TR0101-TR0150)
pub const TR0101: ErrorCode = ErrorCode::new(101); // Invalid function invocation
pub const TR0102: ErrorCode = ErrorCode::new(102); // Unknown custom function

// Configuration (TR0151-TR0200)
pub const TR0151: ErrorCode = ErrorCode::new(151); // Invalid configuration

static TR0001_INFO: ErrorInfo = ErrorInfo::new(
    1,
    "Unparseable date/time",
    "The value is blank or does not match any accepted date/time grammar.",
    "Check the sender's date format against the accepted grammars, e.g. 20220101, 2022-01-01T10:00:00Z or 1/2/2022 8:00.",
);

static TR0002_INFO: ErrorInfo = ErrorInfo::new(
    2,
    "Missing zone",
    "A local date/time without offset was formatted without a target zone.",
    "Configure a receiver time zone or supply a zone to the formatting call.",
);

static TR0003_INFO: ErrorInfo = ErrorInfo::new(
    3,
    "Invalid zone",
    "The zone identifier is not a known IANA zone name or a fixed offset.",
    "Use an IANA name such as America/New_York, UTC, or an offset such as -05:00.",
);

static TR0004_INFO: ErrorInfo = ErrorInfo::new(
    4,
    "Unsupported precision",
    "A temporal precision reached the HL7 date/time converter that it has no rendering for.",
    "Supported precisions are YEAR, MONTH, DAY, MINUTE, SECOND and MILLI.",
);

static TR0051_INFO: ErrorInfo = ErrorInfo::new(
    51,
    "Unresolved constant",
    "A %{name} token referenced a constant that is not bound in the current context.",
    "Declare the constant in the schema, or in an enclosing element's constants.",
);

static TR0052_INFO: ErrorInfo = ErrorInfo::new(
    52,
    "Reserved constant name",
    "A schema tried to bind a constant whose name is reserved by the path engine.",
    "Rename the constant; loinc, ucum, resource, rootResource, context and us-zip are reserved.",
);

static TR0101_INFO: ErrorInfo = ErrorInfo::new(
    101,
    "Invalid function invocation",
    "A custom function was called on an unexpected focus or with malformed parameters.",
    "Check the function's focus type and parameter count.",
);

static TR0102_INFO: ErrorInfo = ErrorInfo::new(
    102,
    "Unknown custom function",
    "The function name is not part of the custom function set.",
    "Resolve the function first and fall back to the engine's built-in functions.",
);

static TR0151_INFO: ErrorInfo = ErrorInfo::new(
    151,
    "Invalid configuration",
    "The translation configuration could not be read.",
    "Validate the configuration JSON against the TranslationConfig structure.",
);

static UNKNOWN_ERROR_INFO: ErrorInfo = ErrorInfo::new(
    0,
    "Unknown error",
    "No information is registered for this error code.",
    "",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(TR0001.to_string(), "TR0001");
        assert_eq!(TR0151.code_str(), "TR0151");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(TR0004.category(), ErrorCategory::Temporal);
        assert_eq!(TR0052.category(), ErrorCategory::Constants);
        assert_eq!(TR0101.category(), ErrorCategory::Functions);
        assert_eq!(TR0151.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(TR0051.description(), "Unresolved constant");
        assert_eq!(ErrorCode::new(999).info().code, 0);
    }
}
