//! HL7 v2 output rules: field lengths, truncation, DTM values and ACKs

pub mod ack;
pub mod datetime;
pub mod field_lengths;
pub mod truncation;

pub use ack::{AckGenerator, AckMessage, MessageHeader};
pub use datetime::{FhirTemporal, Hl7DateTimeConverter};
pub use field_lengths::{FieldLengthTable, FieldPath, normalize_field_path};
pub use truncation::{Hl7Truncator, NoopTruncation, TruncationPolicy};
