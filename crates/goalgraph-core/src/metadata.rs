//! Schema-less metadata attached to every node.
//!
//! A [`Metadata`] bag maps string keys to [`MetaValue`]s. Values form a small
//! closed set (null, bool, integer, float, text, list, nested map) that
//! serializes untagged, so a bag is byte-compatible with a plain JSON object.
//! Keys keep insertion order via [`IndexMap`].
//!
//! Consumers must treat missing keys as absent, never as errors: every typed
//! accessor returns `Option` or a caller-supplied default.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Well-known metadata keys read by the resolver, the store, and renderers.
pub mod keys {
    /// Domain flag: the node has already been achieved. Drives NOT blocking.
    pub const VISITED: &str = "visited";
    /// Domain flag: the node failed and is eligible for pruning.
    pub const FAILED: &str = "failed";
    /// Estimated probability that the step succeeds.
    pub const CONFIDENCE: &str = "confidence";
    /// Observed success rate of the step.
    pub const SUCCESS_RATE: &str = "success_rate";
}

/// A loosely-typed metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<MetaValue>),
    Map(IndexMap<String, MetaValue>),
}

impl MetaValue {
    /// Returns the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns integers and floats widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Int(i) => Some(*i as f64),
            MetaValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` only for `Bool(true)`. No truthiness coercion.
    pub fn is_true(&self) -> bool {
        matches!(self, MetaValue::Bool(true))
    }

    /// Loose truthiness: null, `false`, zero, and empty text, lists or maps
    /// are falsy. Everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            MetaValue::Null => false,
            MetaValue::Bool(b) => *b,
            MetaValue::Int(i) => *i != 0,
            MetaValue::Float(f) => *f != 0.0,
            MetaValue::Text(s) => !s.is_empty(),
            MetaValue::List(items) => !items.is_empty(),
            MetaValue::Map(map) => !map.is_empty(),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json: serde_json::Value = self.clone().into();
        write!(f, "{}", json)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<i32> for MetaValue {
    fn from(i: i32) -> Self {
        MetaValue::Int(i64::from(i))
    }
}

impl From<f64> for MetaValue {
    fn from(f: f64) -> Self {
        MetaValue::Float(f)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<serde_json::Value> for MetaValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(MetaValue::Int)
                .or_else(|| n.as_f64().map(MetaValue::Float))
                .unwrap_or(MetaValue::Null),
            Value::String(s) => MetaValue::Text(s),
            Value::Array(items) => MetaValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                MetaValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<MetaValue> for serde_json::Value {
    fn from(value: MetaValue) -> Self {
        use serde_json::Value;
        match value {
            MetaValue::Null => Value::Null,
            MetaValue::Bool(b) => Value::Bool(b),
            MetaValue::Int(i) => Value::from(i),
            // Non-finite floats have no JSON form and become null.
            MetaValue::Float(f) => Value::from(f),
            MetaValue::Text(s) => Value::String(s),
            MetaValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            MetaValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// The metadata bag of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, MetaValue>);

impl Metadata {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for literal construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or overwrites a key, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetaValue>,
    ) -> Option<MetaValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` only when the key holds exactly `Bool(true)`.
    ///
    /// Missing keys, `false`, and non-boolean values (including `1` or
    /// `"true"`) all read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(MetaValue::is_true)
    }

    /// Returns `true` when the key holds a truthy value (see
    /// [`MetaValue::is_truthy`]). Missing keys read as `false`.
    pub fn truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(MetaValue::is_truthy)
    }

    /// Returns a numeric value (integer or float) as `f64`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetaValue::as_f64)
    }

    /// Returns a numeric value, or `default` when missing or non-numeric.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    /// Returns a text value.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    /// Merges `other` into this bag key-by-key.
    ///
    /// New keys are appended, existing keys are overwritten in place, and
    /// keys absent from `other` are retained.
    pub fn merge(&mut self, other: Metadata) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Metadata(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Metadata {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}
