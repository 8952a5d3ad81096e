//! Core types shared by every translation component

pub mod error;
pub mod error_code;
pub mod temporal;
pub mod value;

pub use error::{Result, TranslationError};
pub use error_code::{ErrorCategory, ErrorCode, ErrorInfo};
pub use temporal::{TemporalPrecision, TemporalValue};
pub use value::{JsonValueExt, TranslationValue};
