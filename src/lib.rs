//! HL7 v2 / FHIR translation primitives
//!
//! The building blocks a schema-driven HL7 ⟷ FHIR mapper calls into while it
//! evaluates path expressions: constant resolution, custom functions, date/time
//! parsing and formatting, HL7 field truncation, DTM conversion and ACK
//! generation.

pub mod config;
pub mod constants;
pub mod core;
pub mod hl7;
pub mod lookup;
pub mod phone;
pub mod registry;
pub mod temporal;

// Re-export main types
pub use config::{Environment, ReceiverDateTimeSettings, TranslationConfig, TruncationConfig};
pub use constants::{ConstantContext, ConstantResolver, ConstantSubstitutor, PathConstantResolver};
pub use crate::core::{
    ErrorCode, JsonValueExt, Result, TemporalPrecision, TemporalValue, TranslationError,
    TranslationValue,
};
pub use hl7::{
    AckGenerator, AckMessage, FhirTemporal, FieldLengthTable, Hl7DateTimeConverter, Hl7Truncator,
    NoopTruncation, TruncationPolicy,
};
pub use lookup::{InMemoryLookupTable, LivdQuery, LookupTable, LookupTables};
pub use phone::PhoneNumberParts;
pub use registry::{CustomFunction, CustomFunctionRegistry, FunctionSignature};
pub use temporal::{DateTimeFormat, TemporalFormatter, TemporalParser, Zone};
