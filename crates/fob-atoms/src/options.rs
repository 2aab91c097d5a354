//! Loose option maps forwarded to loaders and plugins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// String-keyed option map handed to an external loader or plugin.
///
/// Factories layer caller options over their built-in defaults with
/// [`Options::layered_over`]; the caller's value wins on every key collision.
/// Merges are shallow and always produce a fresh map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a dynamic value as options.
    ///
    /// `null` is treated as "no options"; anything other than an object is a
    /// [`Error::MisconfiguredOptions`] attributed to `factory`.
    pub fn from_value(factory: &'static str, value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::misconfigured(factory, &other)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Shallow merge of `self` over `defaults`; keys in `self` win.
    pub fn layered_over(self, defaults: Options) -> Options {
        let mut merged = defaults.0;
        merged.extend(self.0);
        Options(merged)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        options.into_value()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn caller_wins_on_collision() {
        let defaults = Options::new().with("limit", 10_000).with("name", "[name]");
        let merged = Options::new().with("limit", 1).layered_over(defaults);
        assert_eq!(merged.get("limit"), Some(&json!(1)));
        assert_eq!(merged.get("name"), Some(&json!("[name]")));
    }

    #[test]
    fn null_is_empty() {
        assert!(Options::from_value("css", Value::Null).unwrap().is_empty());
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = Options::from_value("css", json!("modules")).unwrap_err();
        assert!(matches!(
            err,
            Error::MisconfiguredOptions { factory: "css", found: "a string" }
        ));
    }
}
