//! Parameter bundles for parametric filters.
//!
//! The pipeline machinery treats a bundle as opaque; only the filter that
//! receives it interprets the keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-filter settings keyed by filter name.
pub type FilterSettings = IndexMap<String, ParamBundle>;

/// Named parameter values for one filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBundle {
    values: IndexMap<String, Value>,
}

impl ParamBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value for a key.
    ///
    /// Returns an error if the key is present but holds something else.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, String> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(format!("'{}' must be a string, got {}", key, other)),
        }
    }

    /// List of words for a key.
    ///
    /// Accepts either an array of strings or a single comma separated string,
    /// which is how word lists are usually typed into question settings.
    /// Blank entries are dropped.
    pub fn get_words(&self, key: &str) -> Result<Vec<String>, String> {
        let words: Vec<String> = match self.values.get(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::String(s)) => s.split(',').map(|w| w.trim().to_string()).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.trim().to_string()),
                    other => Err(format!("'{}' must only contain strings, got {}", key, other)),
                })
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(format!(
                    "'{}' must be a list or comma separated string, got {}",
                    key, other
                ))
            }
        };
        Ok(words.into_iter().filter(|w| !w.is_empty()).collect())
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParamBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = ParamBundle::new();
        for (key, value) in iter {
            bundle.insert(key, value);
        }
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_str() {
        let bundle = ParamBundle::new().with("security", "t").with("level", 3);
        assert_eq!(bundle.get_str("security"), Ok(Some("t")));
        assert_eq!(bundle.get_str("missing"), Ok(None));
        assert!(bundle.get_str("level").is_err());
    }

    #[test]
    fn test_get_words_accepts_both_forms() {
        let listed = ParamBundle::new().with("allowwords", json!(["foo", " bar "]));
        assert_eq!(listed.get_words("allowwords").unwrap(), vec!["foo", "bar"]);

        let typed = ParamBundle::new().with("allowwords", "foo, bar,,baz");
        assert_eq!(typed.get_words("allowwords").unwrap(), vec!["foo", "bar", "baz"]);

        assert!(typed.get_words("absent").unwrap().is_empty());

        let bad = ParamBundle::new().with("allowwords", json!([1, 2]));
        assert!(bad.get_words("allowwords").is_err());
    }

    #[test]
    fn test_transparent_serde() {
        let bundle: ParamBundle = [("security", "s")].into_iter().collect();
        assert_eq!(serde_json::to_value(&bundle).unwrap(), json!({"security": "s"}));
        assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["security"]);
    }
}
