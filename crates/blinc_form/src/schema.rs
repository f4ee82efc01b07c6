//! Schema validation
//!
//! A [`Schema`] validates a whole [`ValueTree`] at once and reports a list of
//! [`SchemaIssue`]s. The form translates issues into the same flat
//! [`ErrorMap`] the rule validator produces.
//!
//! Closures implement the trait, so ad-hoc schemas need no extra types:
//!
//! ```rust
//! use blinc_form::schema::{Schema, SchemaIssue, SchemaIssues};
//! use blinc_form::ValueTree;
//!
//! let schema = |data: &ValueTree| -> Result<(), SchemaIssues> {
//!     match data.get_path("email").and_then(|v| v.as_text()) {
//!         Some(email) if email.contains('@') => Ok(()),
//!         _ => Err(vec![SchemaIssue::new(["email"], "Invalid email")].into()),
//!     }
//! };
//!
//! assert!(schema.safe_parse(&ValueTree::new().with("email", "a@b.co")).is_ok());
//! ```

use crate::field_errors::{ErrorMap, FieldError};
use crate::path::join_segments;
use crate::value::ValueTree;

/// One problem reported by a schema
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Location of the problem, one entry per nesting level
    pub path: Vec<String>,
    /// Message shown to the user, verbatim
    pub message: String,
}

impl SchemaIssue {
    pub fn new<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Dotted form of the issue path
    pub fn key(&self) -> String {
        join_segments(&self.path)
    }
}

/// The issues of a failed parse
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaIssues {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaIssues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: SchemaIssue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Convert to a flat [`ErrorMap`]. Later issues for the same path win.
    pub fn to_error_map(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for issue in &self.issues {
            let error = FieldError::SchemaIssue(issue.message.clone());
            errors.insert(issue.key(), error.to_string());
        }
        errors
    }
}

impl From<Vec<SchemaIssue>> for SchemaIssues {
    fn from(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }
}

/// The safe-parse contract: succeed, or describe every problem
pub trait Schema {
    fn safe_parse(&self, data: &ValueTree) -> Result<(), SchemaIssues>;
}

impl<F> Schema for F
where
    F: Fn(&ValueTree) -> Result<(), SchemaIssues>,
{
    fn safe_parse(&self, data: &ValueTree) -> Result<(), SchemaIssues> {
        self(data)
    }
}

/// Run `schema` against `data` and translate the outcome
pub fn validate_schema(schema: &dyn Schema, data: &ValueTree) -> ErrorMap {
    match schema.safe_parse(data) {
        Ok(()) => ErrorMap::new(),
        Err(issues) => {
            tracing::trace!(count = issues.issues.len(), "schema reported issues");
            issues.to_error_map()
        }
    }
}
