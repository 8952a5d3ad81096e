//! Custom functions extending the path-expression engine
//!
//! The engine asks [`CustomFunctionRegistry::resolve`] for the signature of a
//! function it does not know, then calls [`CustomFunctionRegistry::execute`]
//! with the evaluated focus and parameter collections.

pub mod function;
pub mod functions;
pub mod signature;

pub use function::{CustomFunction, CustomFunctionRegistry};
pub use functions::Collection;
pub use functions::identifier::{coding_system_id, identifier_type, identifier_value};
pub use signature::{FunctionSignature, ValueType};
