#![forbid(unsafe_code)]

//! Open key/value payload attached to each annotation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const POINTS: &str = "points";
const COMMENT: &str = "comment";

/// Free-form data carried by an annotation.
///
/// The map is open: hosts store whatever they like. Two keys have typed
/// accessors because the overlays read them: `comment` (a string) and
/// `points` (a number, `0` by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationData(Map<String, Value>);

impl Default for AnnotationData {
    fn default() -> Self {
        let mut map = Map::new();
        map.insert(POINTS.to_string(), Value::from(0));
        Self(map)
    }
}

impl AnnotationData {
    /// An empty map, without the default `points` entry.
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Look up an arbitrary key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set an arbitrary key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Points awarded to the annotated range. Missing or non-numeric is `0`.
    pub fn points(&self) -> f64 {
        self.0.get(POINTS).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn set_points(&mut self, points: impl Into<Value>) {
        self.0.insert(POINTS.to_string(), points.into());
    }

    /// The free-text comment, if one is set and is a string.
    pub fn comment(&self) -> Option<&str> {
        self.0.get(COMMENT).and_then(Value::as_str)
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.0.insert(COMMENT.to_string(), Value::String(comment.into()));
    }

    /// Whether a tooltip would have anything to show: a truthy comment or
    /// points value. Zero, NaN, `""`, `false` and `null` are falsy; so is a
    /// missing key.
    pub fn has_tooltip_content(&self) -> bool {
        self.0.get(COMMENT).is_some_and(is_truthy) || self.0.get(POINTS).is_some_and(is_truthy)
    }

    /// Borrow the underlying JSON map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<Map<String, Value>> for AnnotationData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
