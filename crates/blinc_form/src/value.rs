//! Form values
//!
//! A [`ValueTree`] is the data a form submits: an insertion-ordered mapping
//! from field name to a [`FormValue`]. Values collected from inputs are always
//! [`FormValue::Text`]; programmatic submissions can carry any shape.
//!
//! # Example
//!
//! ```rust
//! use blinc_form::{FormValue, ValueTree};
//!
//! let data = ValueTree::from_json(serde_json::json!({
//!     "userinfo": { "name": "John" },
//!     "age": 42,
//! }));
//!
//! assert_eq!(data.get_path("userinfo.name"), Some(&FormValue::text("John")));
//! assert!(data.get("age").is_some_and(FormValue::is_truthy));
//! ```

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::FieldPath;

/// A single value in a [`ValueTree`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// Explicit absence of a value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value (everything an input produces)
    Text(String),
    /// Ordered list of values
    List(Vec<FormValue>),
    /// Nested group of named values
    Map(ValueTree),
}

impl FormValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        FormValue::Text(value.into())
    }

    /// Whether the value counts as present for a `required` check.
    ///
    /// Empty text, `Null`, `false`, `0` and `NaN` are falsy. Lists and maps
    /// are truthy even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormValue::Null => false,
            FormValue::Bool(b) => *b,
            FormValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FormValue::Text(s) => !s.is_empty(),
            FormValue::List(_) | FormValue::Map(_) => true,
        }
    }

    /// Length used by `min_length`/`max_length` checks.
    ///
    /// Text is measured in characters, lists in elements. Other values have no
    /// length and always pass length checks.
    pub fn length(&self) -> Option<usize> {
        match self {
            FormValue::Text(s) => Some(s.chars().count()),
            FormValue::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Text form a `pattern` rule is matched against
    pub fn match_text(&self) -> Cow<'_, str> {
        match self {
            FormValue::Text(s) => Cow::Borrowed(s.as_str()),
            FormValue::Null | FormValue::Map(_) => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Borrow the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the nested tree if this is a map
    pub fn as_map(&self) -> Option<&ValueTree> {
        match self {
            FormValue::Map(tree) => Some(tree),
            _ => None,
        }
    }

    /// Whether this value is a nested map
    pub fn is_map(&self) -> bool {
        matches!(self, FormValue::Map(_))
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Null => Ok(()),
            FormValue::Bool(b) => write!(f, "{}", b),
            FormValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            FormValue::Text(s) => f.write_str(s),
            FormValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            FormValue::Map(_) => f.write_str("[object]"),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Number(value as f64)
    }
}

impl From<ValueTree> for FormValue {
    fn from(value: ValueTree) -> Self {
        FormValue::Map(value)
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(b) => FormValue::Bool(b),
            Value::Number(n) => FormValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => FormValue::Text(s),
            Value::Array(items) => FormValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => FormValue::Map(ValueTree(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            )),
        }
    }
}

/// Nested mapping from field name to [`FormValue`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTree(pub(crate) IndexMap<String, FormValue>);

impl ValueTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a JSON object. Non-object JSON yields an empty tree.
    pub fn from_json(value: serde_json::Value) -> Self {
        match FormValue::from(value) {
            FormValue::Map(tree) => tree,
            _ => ValueTree::new(),
        }
    }

    /// Serialize to a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Get a direct child
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.0.get(key)
    }

    /// Get a value by dotted path (`"userinfo.name"`)
    pub fn get_path(&self, path: &str) -> Option<&FormValue> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_map()?.0.get(segment)?;
        }
        Some(current)
    }

    /// Get a value by parsed [`FieldPath`]
    pub fn get_field(&self, path: &FieldPath) -> Option<&FormValue> {
        let mut segments = path.segments().iter();
        let mut current = self.0.get(segments.next()?.as_str())?;
        for segment in segments {
            current = current.as_map()?.0.get(segment.as_str())?;
        }
        Some(current)
    }

    /// Insert a direct child, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate direct children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FormValue)> for ValueTree {
    fn from_iter<I: IntoIterator<Item = (String, FormValue)>>(iter: I) -> Self {
        ValueTree(iter.into_iter().collect())
    }
}
