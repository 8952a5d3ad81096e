//! Date/time parsing and receiver-specific formatting
//!
//! Senders supply dates in dozens of shapes (`20220101`, `1/2/2022 8:00`,
//! `2022-01-01T10:00:00.123Z`, ...). [`TemporalParser`] turns them into a
//! [`TemporalValue`](crate::core::TemporalValue) whose variant records the
//! precision that was present, and [`TemporalFormatter`] writes them back out in
//! the receiver's zone and format.

pub mod formatter;
pub mod parser;
pub mod pattern;
pub mod zone;

pub use formatter::{DateTimeFormat, TemporalFormatter};
pub use parser::{FALLBACK_DATE_TIME_PATTERNS, TemporalParser, VARIABLE_DATE_TIME_PATTERN};
pub use pattern::DateTimePattern;
pub use zone::Zone;
