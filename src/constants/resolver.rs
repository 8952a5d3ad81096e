//! Constant lookup hook for the path-expression engine

use super::context::ConstantContext;
use crate::core::TranslationValue;
use log::trace;

/// Resolves `%name` constants during expression evaluation
///
/// `None` means "not a constant": the engine falls back to its own variables.
pub trait ConstantResolver {
    fn resolve_constant(&self, context: &ConstantContext, name: &str) -> Option<TranslationValue>;
}

/// Resolver backed by the constants of a [`ConstantContext`]
///
/// Supports three name forms:
///
/// - `` `root-suffix` ``: the value of `root` followed by `suffix`, used to build
///   URLs and extension ids from a shared root
/// - `` `name` ``: the value of `name`, quoted to separate it from other text
/// - `name`: the value of `name`
///
/// Values written as path string literals (`'value'`) are unquoted. All-digit
/// values that fit in an `i64` resolve to integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConstantResolver;

impl PathConstantResolver {
    pub fn new() -> Self {
        Self
    }

    fn raw_value(context: &ConstantContext, name: &str) -> Option<String> {
        let Some(quoted) = name.strip_prefix('`') else {
            return context.get(name).map(unquote);
        };
        match quoted.split_once('-') {
            Some((root, suffix)) => context
                .get(root)
                .map(|value| format!("{}{}", unquote(value), suffix.strip_suffix('`').unwrap_or(suffix))),
            None => context.get(quoted.strip_suffix('`').unwrap_or(quoted)).map(unquote),
        }
    }
}

impl ConstantResolver for PathConstantResolver {
    fn resolve_constant(&self, context: &ConstantContext, name: &str) -> Option<TranslationValue> {
        let value = Self::raw_value(context, name).filter(|v| !v.trim().is_empty())?;
        trace!("resolved constant {name} to '{value}'");
        Some(typed(value))
    }
}

/// Strip single quotes from a path string literal, unescaping `\'` and `\\`
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .filter(|_| value.len() >= 2)
    else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('\'' | '\\' | '"' | '`')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            c => out.push(c),
        }
    }
    out
}

fn typed(value: String) -> TranslationValue {
    if value.bytes().all(|b| b.is_ascii_digit())
        && let Ok(number) = value.parse::<i64>()
    {
        return TranslationValue::Integer(number);
    }
    TranslationValue::String(value)
}
