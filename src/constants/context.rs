//! Scoped constants threaded through expression evaluation

use crate::config::TranslationConfig;
use crate::core::{Result, TranslationError};
use indexmap::IndexMap;
use std::sync::Arc;

/// Key under which the append index is stored
pub const APPEND_TO_INDEX_KEY: &str = "appendToIndex";

const RESERVED_NAMES: [&str; 7] = [
    "loinc",
    "ucum",
    "resource",
    "rootResource",
    "context",
    "us-zip",
    APPEND_TO_INDEX_KEY,
];

const RESERVED_PREFIXES: [&str; 3] = ["`vs-", "`cs-", "`ext"];

/// Immutable mapping of constant names to values
///
/// Extending a context never changes it: [`add_constants`](Self::add_constants)
/// returns a new context holding a copy of the constants plus the additions, so
/// sibling scopes never observe each other's constants. Cloning is cheap; the map
/// and receiver configuration are shared until extended.
#[derive(Debug, Clone, Default)]
pub struct ConstantContext {
    constants: Arc<IndexMap<String, String>>,
    config: Option<Arc<TranslationConfig>>,
}

impl ConstantContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty context carrying a receiver configuration
    pub fn with_config(config: impl Into<Arc<TranslationConfig>>) -> Self {
        Self {
            constants: Arc::default(),
            config: Some(config.into()),
        }
    }

    pub fn config(&self) -> Option<&TranslationConfig> {
        self.config.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when both contexts share the same constant storage
    pub fn shares_constants_with(&self, other: &ConstantContext) -> bool {
        Arc::ptr_eq(&self.constants, &other.constants)
    }

    pub fn is_reserved_name(name: &str) -> bool {
        RESERVED_NAMES.contains(&name) || RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
    }

    /// New context with `constants` added, later values replacing earlier ones.
    ///
    /// Returns this context unchanged when nothing is added. Fails without
    /// creating a context if any name is reserved.
    pub fn add_constants<I, K, V>(&self, constants: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let additions: Vec<(String, String)> = constants
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if let Some((name, _)) = additions.iter().find(|(k, _)| Self::is_reserved_name(k)) {
            return Err(TranslationError::reserved_constant_name(name.clone()));
        }
        Ok(self.extend(additions))
    }

    pub fn add_constant(&self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.add_constants([(name.into(), value.into())])
    }

    /// New context recording the index new repetitions are appended at
    pub fn with_append_to_index(&self, index: usize) -> Self {
        self.extend(vec![(APPEND_TO_INDEX_KEY.to_string(), index.to_string())])
    }

    pub fn append_to_index(&self) -> Option<usize> {
        self.get(APPEND_TO_INDEX_KEY).and_then(|v| v.parse().ok())
    }

    fn extend(&self, additions: Vec<(String, String)>) -> Self {
        if additions.is_empty() {
            return self.clone();
        }
        let mut constants = (*self.constants).clone();
        constants.extend(additions);
        Self {
            constants: Arc::new(constants),
            config: self.config.clone(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConstantContext {
    /// Collect into a root context; reserved names are not checked
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::default().extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_add_constants_copies() {
        let root = ConstantContext::new().add_constant("const1", "'value1'").unwrap();
        let child = root.add_constant("const2", "'value2'").unwrap();

        assert_eq!(root.len(), 1);
        assert!(!root.contains("const2"));
        assert_eq!(child.get("const1"), Some("'value1'"));
        assert_eq!(child.get("const2"), Some("'value2'"));
        assert!(!child.shares_constants_with(&root));
    }

    #[test]
    fn test_add_no_constants_returns_same_context() {
        let root = ConstantContext::new().add_constant("const1", "'value1'").unwrap();
        let same = root.add_constants(BTreeMap::<String, String>::new()).unwrap();
        assert!(same.shares_constants_with(&root));
    }

    #[test]
    fn test_reserved_names_rejected() {
        for name in ["loinc", "resource", "us-zip", "`vs-covid", "appendToIndex"] {
            let err = ConstantContext::new().add_constant(name, "x").unwrap_err();
            assert!(matches!(err, TranslationError::ReservedConstantName { .. }), "{name}");
        }
        assert!(ConstantContext::new().add_constant("rsext", "x").is_ok());
    }

    #[test]
    fn test_append_to_index_bypasses_reserved_check() {
        let context = ConstantContext::new().with_append_to_index(3);
        assert_eq!(context.append_to_index(), Some(3));
        assert_eq!(ConstantContext::new().append_to_index(), None);
    }

    #[test]
    fn test_config_is_inherited() {
        let config = TranslationConfig::default();
        let root = ConstantContext::with_config(config.clone());
        let child = root.add_constant("a", "b").unwrap();
        assert_eq!(child.config(), Some(&config));
    }
}
