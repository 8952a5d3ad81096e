//! Function signatures reported to the expression engine

use serde::Serialize;
use std::fmt;

/// Type of the items a custom function returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    String,
    Integer,
    Boolean,
    DateTime,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
        };
        f.write_str(name)
    }
}

/// Name, arity and result type of a custom function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub min_params: usize,
    pub max_params: usize,
    pub return_type: ValueType,
    pub description: &'static str,
}

impl FunctionSignature {
    pub const fn new(
        name: &'static str,
        min_params: usize,
        max_params: usize,
        return_type: ValueType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            min_params,
            max_params,
            return_type,
            description,
        }
    }

    pub fn accepts_param_count(&self, count: usize) -> bool {
        (self.min_params..=self.max_params).contains(&count)
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        match (self.min_params, self.max_params) {
            (0, 0) => {}
            (min, max) if min == max => write!(f, "{min} params")?,
            (min, max) => write!(f, "{min}..{max} params")?,
        }
        write!(f, ") -> {}", self.return_type)
    }
}
