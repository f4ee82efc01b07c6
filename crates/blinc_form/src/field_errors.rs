//! Validation results
//!
//! Validators produce a flat [`ErrorMap`] keyed by dotted path. The form
//! unflattens it into an [`ErrorTree`] that mirrors the submitted data, which
//! is what renderers and `on_error` callbacks see.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Why a single field failed validation.
///
/// The `Display` output is the default message shown when no custom message
/// is configured for the rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Must be no more than {max} characters")]
    TooLong { max: usize },

    #[error("Invalid format")]
    PatternMismatch,

    /// Reported by a schema, message passed through verbatim
    #[error("{0}")]
    SchemaIssue(String),
}

/// Flat mapping from dotted field path to error message
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `path`, replacing any previous one
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    /// Merge another map into this one; its entries win on conflicts
    pub fn merge(&mut self, other: ErrorMap) {
        self.0.extend(other.0);
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Nest the dotted keys into an [`ErrorTree`]
    pub fn unflatten(&self) -> ErrorTree {
        crate::codec::unflatten(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ErrorMap(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A node of an [`ErrorTree`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorNode {
    /// Error message for a leaf field
    Message(String),
    /// Errors of nested fields
    Nested(ErrorTree),
}

impl ErrorNode {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            ErrorNode::Message(message) => Some(message),
            ErrorNode::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ErrorTree> {
        match self {
            ErrorNode::Nested(tree) => Some(tree),
            ErrorNode::Message(_) => None,
        }
    }
}

/// Nested error structure mirroring the shape of the submitted data
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorTree(pub(crate) IndexMap<String, ErrorNode>);

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ErrorNode> {
        self.0.get(key)
    }

    /// Message at a dotted path, if that path holds a leaf error
    pub fn message(&self, path: &str) -> Option<&str> {
        let mut segments = path.split('.');
        let mut node = self.0.get(segments.next()?)?;
        for segment in segments {
            node = node.as_nested()?.0.get(segment)?;
        }
        node.as_message()
    }

    /// Whether any error exists at or below `path`
    pub fn has_error(&self, path: &str) -> bool {
        let mut segments = path.split('.');
        let Some(mut node) = segments.next().and_then(|first| self.0.get(first)) else {
            return false;
        };
        for segment in segments {
            match node.as_nested().and_then(|tree| tree.0.get(segment)) {
                Some(next) => node = next,
                None => return false,
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Collapse back into dotted keys
    pub fn flatten(&self) -> ErrorMap {
        crate::codec::flatten(self)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
