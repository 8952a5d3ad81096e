//! Constants available to schema expressions
//!
//! A [`ConstantContext`] is created per mapping scope and extended by copying
//! when a nested rule declares more constants. [`ConstantSubstitutor`] expands
//! `%{name}` tokens in schema text, and [`PathConstantResolver`] answers the path
//! engine's `%name` lookups.

pub mod context;
pub mod resolver;
pub mod substitutor;

pub use context::{APPEND_TO_INDEX_KEY, ConstantContext};
pub use resolver::{ConstantResolver, PathConstantResolver};
pub use substitutor::ConstantSubstitutor;
