//! Nested settings mappings attached to pages and layouts.
//!
//! Settings are string-keyed trees (`components.session.security`). Lookups
//! treat missing keys, `null`, and empty values as absent rather than as
//! malformed input.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while parsing a settings blob.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("settings root must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

/// A page or layout settings tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Value);

impl Settings {
    /// Wrap an existing JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Settings with no keys.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    /// Parse settings from a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_root(value)
    }

    /// Parse settings from a YAML document.
    pub fn from_yaml_str(input: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_yml::from_str(input)?;
        Self::from_root(value)
    }

    fn from_root(value: Value) -> Result<Self, SettingsError> {
        match value {
            Value::Object(_) => Ok(Self(value)),
            Value::Null => Ok(Self::empty()),
            other => Err(SettingsError::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a dot-separated path.
    ///
    /// Returns `None` when any segment is missing or an intermediate value is
    /// not a mapping.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.0, |current, key| current.as_object()?.get(key))
    }

    /// A string value that is present and not empty.
    pub fn non_empty_str(&self, path: &str) -> Option<&str> {
        match self.get_path(path)? {
            Value::String(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// A set of codes, absent when the value is missing or empty.
    ///
    /// Any non-empty array counts as present, whatever its elements hold;
    /// each element becomes a code by its string form (`null` and `false`
    /// become `""`, `true` becomes `"1"`). A bare string is treated as a
    /// one-element set.
    pub fn non_empty_set(&self, path: &str) -> Option<BTreeSet<String>> {
        match self.get_path(path)? {
            Value::Array(values) if !values.is_empty() => {
                Some(values.iter().map(element_code).collect())
            }
            Value::String(s) if !s.is_empty() => Some(BTreeSet::from([s.clone()])),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Settings {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn element_code(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
