//! Values produced by parameter binding and the maps handed to actions.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// A converted parameter value.
///
/// Built-in parameter kinds produce `String`, `Number` and `Boolean`; rest
/// parameters produce a `List`. Custom converters may return any variant,
/// `Json` included, when they need a structured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    /// Unparsable numeric input binds as `NaN`.
    Number(f64),
    Boolean(bool),
    List(Vec<Value>),
    Json(serde_json::Value),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

/// Bound parameters, keyed by parameter label.
///
/// Optional parameters the user did not supply are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.0.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn str(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(Value::as_str)
    }

    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).and_then(Value::as_number)
    }

    pub fn boolean(&self, label: &str) -> Option<bool> {
        self.get(label).and_then(Value::as_bool)
    }

    pub fn list(&self, label: &str) -> Option<&[Value]> {
        self.get(label).and_then(Value::as_list)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// JSON view of the bound values, used for debug logging.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Flag truth values for one invocation.
///
/// Every option the command declares is present; asserted ones are `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Flags(BTreeMap<String, bool>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `labels`, all initially unset.
    pub fn declared<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(|l| (l.into(), false)).collect())
    }

    /// Set a declared flag. Returns false when `label` was never declared.
    pub fn assert(&mut self, label: &str) -> bool {
        match self.0.get_mut(label) {
            Some(slot) => {
                *slot = true;
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, value: bool) {
        self.0.insert(label.into(), value);
    }

    /// Whether `label` was asserted. Undeclared labels read as unset.
    pub fn is_set(&self, label: &str) -> bool {
        self.0.get(label).copied().unwrap_or(false)
    }

    pub fn get(&self, label: &str) -> Option<bool> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, bool> {
        self.0.iter()
    }
}
