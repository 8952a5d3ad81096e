//! `%{name}` interpolation of constants into schema strings

use super::context::ConstantContext;
use crate::core::{Result, TranslationError};
use log::trace;

const PREFIX: &str = "%{";
const SUFFIX: char = '}';
const ESCAPE: char = '%';

/// Replaces `%{name}` tokens with constant values
///
/// `%%{name}` is an escaped token and is written out as `%{name}`. Substituted
/// values are themselves substituted, so a constant may refer to others.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSubstitutor;

impl ConstantSubstitutor {
    pub fn new() -> Self {
        Self
    }

    /// Replace every token in `text`.
    ///
    /// Fails with `UnresolvedConstant` when no context is supplied for a text
    /// containing tokens, when a name is not bound, or when constants refer to
    /// each other in a cycle.
    pub fn replace(&self, text: &str, context: Option<&ConstantContext>) -> Result<String> {
        let mut active = Vec::new();
        let replaced = substitute(text, context, &mut active)?;
        if replaced != text {
            trace!("substituted constants in '{text}'");
        }
        Ok(replaced)
    }
}

fn substitute(
    text: &str,
    context: Option<&ConstantContext>,
    active: &mut Vec<String>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(PREFIX) {
        let escaped = rest[..start].ends_with(ESCAPE);
        let after = &rest[start + PREFIX.len()..];
        let Some(end) = after.find(SUFFIX) else {
            break;
        };

        if escaped {
            out.push_str(&rest[..start - ESCAPE.len_utf8()]);
            out.push_str(&rest[start..start + PREFIX.len() + end + 1]);
            rest = &after[end + 1..];
            continue;
        }

        out.push_str(&rest[..start]);
        let name = &after[..end];
        out.push_str(&lookup(name, context, active)?);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup(name: &str, context: Option<&ConstantContext>, active: &mut Vec<String>) -> Result<String> {
    if name.trim().is_empty() {
        return Err(TranslationError::unresolved_constant(name));
    }
    let Some(context) = context else {
        return Err(TranslationError::no_constant_context(name));
    };
    let value = context
        .get(name)
        .ok_or_else(|| TranslationError::unresolved_constant(name))?;

    if active.iter().any(|n| n == name) {
        return Err(TranslationError::cyclic_constant(name, active));
    }
    active.push(name.to_string());
    let resolved = substitute(value, Some(context), active);
    active.pop();
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> ConstantContext {
        [("const1", "value1"), ("funny-name.x", "value2"), ("nested", "<%{const1}>")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_replace_tokens() {
        let result = ConstantSubstitutor::new()
            .replace("Bundle.entry.resource.ofType(%{const1}).%{funny-name.x}", Some(&context()))
            .unwrap();
        assert_eq!(result, "Bundle.entry.resource.ofType(value1).value2");
    }

    #[test]
    fn test_plain_percent_is_untouched() {
        let text = "%resource.id = '100%'";
        assert_eq!(ConstantSubstitutor::new().replace(text, None).unwrap(), text);
    }

    #[test]
    fn test_escaped_token_is_literal() {
        let result = ConstantSubstitutor::new()
            .replace("%%{const1} and %{const1}", Some(&context()))
            .unwrap();
        assert_eq!(result, "%{const1} and value1");
    }

    #[test]
    fn test_values_are_substituted_recursively() {
        let result = ConstantSubstitutor::new().replace("%{nested}", Some(&context())).unwrap();
        assert_eq!(result, "<value1>");
    }

    #[test]
    fn test_unterminated_token_left_alone() {
        let result = ConstantSubstitutor::new().replace("abc %{const1", Some(&context())).unwrap();
        assert_eq!(result, "abc %{const1");
    }

    #[test]
    fn test_missing_constant_or_context_fails() {
        let substitutor = ConstantSubstitutor::new();
        assert!(matches!(
            substitutor.replace("%{unknown}", Some(&context())),
            Err(TranslationError::UnresolvedConstant { .. })
        ));
        assert!(substitutor.replace("%{const1}", None).is_err());
        assert!(substitutor.replace("%{}", Some(&context())).is_err());
    }

    #[test]
    fn test_cycle_fails() {
        let cyclic: ConstantContext = [("a", "%{b}"), ("b", "%{a}")].into_iter().collect();
        let err = ConstantSubstitutor::new().replace("%{a}", Some(&cyclic)).unwrap_err();
        assert!(err.to_string().contains("refers to itself"));
    }
}
