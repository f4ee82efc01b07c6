//! Declarative validation rules
//!
//! A [`RuleTree`] mirrors the shape of the data it validates. Leaves hold a
//! [`ValidationRule`]; branches hold nested trees. A parallel [`MessageTree`]
//! supplies per-rule message overrides.
//!
//! # Example
//!
//! ```rust
//! use blinc_form::{RuleTree, ValidationRule};
//!
//! let rules = RuleTree::new()
//!     .field("email", ValidationRule::new().required())
//!     .at("userinfo.name", ValidationRule::new().required().min_length(10))
//!     .unwrap();
//!
//! assert!(rules.get("userinfo").is_some());
//! ```

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{FormError, Result};
use crate::field_errors::FieldError;
use crate::path::FieldPath;
use crate::value::FormValue;

/// Checks applied to a single field, in priority order:
/// `required`, `min_length`, `max_length`, `pattern`.
#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    /// Fail when the value is falsy (missing, empty, `0`, `false`)
    pub required: bool,
    /// Fail when the value is shorter than this many characters
    pub min_length: Option<usize>,
    /// Fail when the value is longer than this many characters
    pub max_length: Option<usize>,
    /// Fail when the value does not match
    pub pattern: Option<Regex>,
}

impl ValidationRule {
    /// Create an empty rule (always passes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the minimum length
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum length
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the pattern
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Compile and set the pattern
    pub fn try_pattern(self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.pattern(regex))
    }

    /// Run the checks against a (possibly missing) value.
    ///
    /// Returns the first failure. Length thresholds of zero count as unset.
    pub fn check(&self, value: Option<&FormValue>) -> Option<FieldError> {
        if self.required && !value.is_some_and(FormValue::is_truthy) {
            return Some(FieldError::Required);
        }

        let length = value.and_then(FormValue::length);

        if let (Some(min), Some(len)) = (self.min_length.filter(|n| *n > 0), length) {
            if len < min {
                return Some(FieldError::TooShort { min });
            }
        }

        if let (Some(max), Some(len)) = (self.max_length.filter(|n| *n > 0), length) {
            if len > max {
                return Some(FieldError::TooLong { max });
            }
        }

        if let Some(pattern) = &self.pattern {
            let text = value.map(FormValue::match_text).unwrap_or_default();
            if !pattern.is_match(&text) {
                return Some(FieldError::PatternMismatch);
            }
        }

        None
    }
}

/// A node of a [`RuleTree`]
#[derive(Clone, Debug)]
pub enum RuleNode {
    Leaf(ValidationRule),
    Branch(RuleTree),
}

impl From<ValidationRule> for RuleNode {
    fn from(rule: ValidationRule) -> Self {
        RuleNode::Leaf(rule)
    }
}

impl From<RuleTree> for RuleNode {
    fn from(tree: RuleTree) -> Self {
        RuleNode::Branch(tree)
    }
}

/// Rules keyed by field name, nested to match the data
#[derive(Clone, Debug, Default)]
pub struct RuleTree(IndexMap<String, RuleNode>);

impl RuleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a leaf rule or nested tree under `name`
    pub fn field(mut self, name: impl Into<String>, node: impl Into<RuleNode>) -> Self {
        self.insert(name, node);
        self
    }

    /// Attach a rule at a dotted path, creating branches as needed
    pub fn at(mut self, path: &str, rule: ValidationRule) -> Result<Self> {
        let path = FieldPath::parse(path)?;
        self.insert_path(&path, RuleNode::Leaf(rule));
        Ok(self)
    }

    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<RuleNode>) {
        self.0.insert(name.into(), node.into());
    }

    /// Insert at a path. A leaf standing where a branch is needed is replaced.
    pub fn insert_path(&mut self, path: &FieldPath, node: RuleNode) {
        let (parents, last) = path.split_last();
        let mut tree = self;
        for segment in parents {
            let slot = tree
                .0
                .entry(segment.clone())
                .or_insert_with(|| RuleNode::Branch(RuleTree::new()));
            if let RuleNode::Leaf(_) = slot {
                *slot = RuleNode::Branch(RuleTree::new());
            }
            tree = match slot {
                RuleNode::Branch(nested) => nested,
                RuleNode::Leaf(_) => unreachable!("slot was just made a branch"),
            };
        }
        tree.0.insert(last.to_string(), node);
    }

    pub fn get(&self, name: &str) -> Option<&RuleNode> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Message overrides for the checks of one field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleMessages {
    pub required: Option<String>,
    pub min_length: Option<String>,
    pub max_length: Option<String>,
    pub pattern: Option<String>,
}

impl RuleMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn min_length(mut self, message: impl Into<String>) -> Self {
        self.min_length = Some(message.into());
        self
    }

    pub fn max_length(mut self, message: impl Into<String>) -> Self {
        self.max_length = Some(message.into());
        self
    }

    pub fn pattern(mut self, message: impl Into<String>) -> Self {
        self.pattern = Some(message.into());
        self
    }

    /// Override for `error`, ignoring empty overrides
    pub fn for_error(&self, error: &FieldError) -> Option<&str> {
        let message = match error {
            FieldError::Required => &self.required,
            FieldError::TooShort { .. } => &self.min_length,
            FieldError::TooLong { .. } => &self.max_length,
            FieldError::PatternMismatch => &self.pattern,
            FieldError::SchemaIssue(_) => return None,
        };
        message.as_deref().filter(|m| !m.is_empty())
    }

    /// Final message for `error`: the override if set, else the default
    pub fn resolve(&self, error: &FieldError) -> String {
        self.for_error(error)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string())
    }
}

/// A node of a [`MessageTree`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageNode {
    Leaf(RuleMessages),
    Branch(MessageTree),
}

impl From<RuleMessages> for MessageNode {
    fn from(messages: RuleMessages) -> Self {
        MessageNode::Leaf(messages)
    }
}

impl From<MessageTree> for MessageNode {
    fn from(tree: MessageTree) -> Self {
        MessageNode::Branch(tree)
    }
}

/// Message overrides keyed by field name, parallel to a [`RuleTree`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageTree(IndexMap<String, MessageNode>);

impl MessageTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, node: impl Into<MessageNode>) -> Self {
        self.insert(name, node);
        self
    }

    pub fn at(mut self, path: &str, messages: RuleMessages) -> Result<Self> {
        let path = FieldPath::parse(path)?;
        self.insert_path(&path, MessageNode::Leaf(messages));
        Ok(self)
    }

    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<MessageNode>) {
        self.0.insert(name.into(), node.into());
    }

    pub fn insert_path(&mut self, path: &FieldPath, node: MessageNode) {
        let (parents, last) = path.split_last();
        let mut tree = self;
        for segment in parents {
            let slot = tree
                .0
                .entry(segment.clone())
                .or_insert_with(|| MessageNode::Branch(MessageTree::new()));
            if let MessageNode::Leaf(_) = slot {
                *slot = MessageNode::Branch(MessageTree::new());
            }
            tree = match slot {
                MessageNode::Branch(nested) => nested,
                MessageNode::Leaf(_) => unreachable!("slot was just made a branch"),
            };
        }
        tree.0.insert(last.to_string(), node);
    }

    pub fn get(&self, name: &str) -> Option<&MessageNode> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
