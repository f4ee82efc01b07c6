//! Blinc Form Schema
//!
//! Declarative object and string schemas for [`blinc_form`]. An
//! [`ObjectSchema`] implements [`blinc_form::Schema`], so it can be passed
//! straight to `FormConfig::validation_schema`.
//!
//! Every check runs and reports its own issue, the way zod does; the form
//! keeps the last issue reported for a path.
//!
//! # Example
//!
//! ```rust
//! use blinc_form::{Schema, ValueTree};
//! use blinc_form_schema::{ObjectSchema, StringSchema};
//!
//! let schema = ObjectSchema::new()
//!     .field("name", StringSchema::new().min(2).max(30))
//!     .field("email", StringSchema::new().email());
//!
//! let issues = schema
//!     .safe_parse(&ValueTree::new().with("name", "Ada").with("email", "bad"))
//!     .unwrap_err();
//!
//! assert_eq!(issues.issues.len(), 1);
//! assert_eq!(issues.issues[0].path, vec!["email"]);
//! assert_eq!(issues.issues[0].message, "Invalid email");
//! ```

use std::sync::LazyLock;

use blinc_form::{FormValue, Schema, SchemaIssue, SchemaIssues, ValueTree};
use indexmap::IndexMap;
use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap_or_else(|e| panic!("email regex must compile: {e}"))
});

const REQUIRED: &str = "Required";

/// Type name used in "Expected ..., received ..." messages
fn type_name(value: &FormValue) -> &'static str {
    match value {
        FormValue::Null => "null",
        FormValue::Bool(_) => "boolean",
        FormValue::Number(_) => "number",
        FormValue::Text(_) => "string",
        FormValue::List(_) => "array",
        FormValue::Map(_) => "object",
    }
}

// =============================================================================
// String schema
// =============================================================================

#[derive(Clone, Debug)]
enum StringCheck {
    Min(usize),
    Max(usize),
    Email,
    Pattern(Regex),
}

impl StringCheck {
    fn passes(&self, text: &str) -> bool {
        match self {
            StringCheck::Min(min) => text.chars().count() >= *min,
            StringCheck::Max(max) => text.chars().count() <= *max,
            StringCheck::Email => {
                !text.starts_with('.') && !text.contains("..") && EMAIL.is_match(text)
            }
            StringCheck::Pattern(regex) => regex.is_match(text),
        }
    }

    fn default_message(&self) -> String {
        match self {
            StringCheck::Min(min) => format!("String must contain at least {min} character(s)"),
            StringCheck::Max(max) => format!("String must contain at most {max} character(s)"),
            StringCheck::Email => "Invalid email".to_string(),
            StringCheck::Pattern(_) => "Invalid".to_string(),
        }
    }
}

/// Checks for a text value
#[derive(Clone, Debug, Default)]
pub struct StringSchema {
    checks: Vec<(StringCheck, Option<String>)>,
    optional: bool,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// At least `min` characters
    pub fn min(self, min: usize) -> Self {
        self.check(StringCheck::Min(min))
    }

    /// At most `max` characters
    pub fn max(self, max: usize) -> Self {
        self.check(StringCheck::Max(max))
    }

    /// A plausible email address
    pub fn email(self) -> Self {
        self.check(StringCheck::Email)
    }

    /// Must match `regex`
    pub fn regex(self, regex: Regex) -> Self {
        self.check(StringCheck::Pattern(regex))
    }

    /// Replace the message of the most recently added check
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some((_, slot)) = self.checks.last_mut() {
            *slot = Some(message.into());
        }
        self
    }

    /// Accept a missing or null value
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn check(mut self, check: StringCheck) -> Self {
        self.checks.push((check, None));
        self
    }

    fn parse_into(&self, value: Option<&FormValue>, path: &[String], issues: &mut SchemaIssues) {
        let text = match value {
            None | Some(FormValue::Null) if self.optional => return,
            None => {
                issues.push(SchemaIssue::new(path.to_vec(), REQUIRED));
                return;
            }
            Some(FormValue::Text(text)) => text,
            Some(other) => {
                let message = format!("Expected string, received {}", type_name(other));
                issues.push(SchemaIssue::new(path.to_vec(), message));
                return;
            }
        };

        for (check, message) in &self.checks {
            if !check.passes(text) {
                let message = message.clone().unwrap_or_else(|| check.default_message());
                issues.push(SchemaIssue::new(path.to_vec(), message));
            }
        }
    }
}

// =============================================================================
// Object schema
// =============================================================================

/// A field of an [`ObjectSchema`]
#[derive(Clone, Debug)]
pub enum FieldSchema {
    String(StringSchema),
    Object(ObjectSchema),
}

impl From<StringSchema> for FieldSchema {
    fn from(schema: StringSchema) -> Self {
        FieldSchema::String(schema)
    }
}

impl From<ObjectSchema> for FieldSchema {
    fn from(schema: ObjectSchema) -> Self {
        FieldSchema::Object(schema)
    }
}

impl FieldSchema {
    fn parse_into(&self, value: Option<&FormValue>, path: &[String], issues: &mut SchemaIssues) {
        match self {
            FieldSchema::String(schema) => schema.parse_into(value, path, issues),
            FieldSchema::Object(schema) => schema.parse_value(value, path, issues),
        }
    }
}

/// Named fields, each with its own schema
///
/// Keys of the data that no field names are ignored.
#[derive(Clone, Debug, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, FieldSchema>,
    optional: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, schema: impl Into<FieldSchema>) -> Self {
        self.fields.insert(name.into(), schema.into());
        self
    }

    /// Accept a missing or null value when nested
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn parse_value(&self, value: Option<&FormValue>, path: &[String], issues: &mut SchemaIssues) {
        match value {
            None | Some(FormValue::Null) if self.optional => {}
            None => issues.push(SchemaIssue::new(path.to_vec(), REQUIRED)),
            Some(FormValue::Map(tree)) => self.parse_fields(tree, path, issues),
            Some(other) => {
                let message = format!("Expected object, received {}", type_name(other));
                issues.push(SchemaIssue::new(path.to_vec(), message));
            }
        }
    }

    fn parse_fields(&self, tree: &ValueTree, path: &[String], issues: &mut SchemaIssues) {
        for (name, schema) in &self.fields {
            let mut child = path.to_vec();
            child.push(name.clone());
            schema.parse_into(tree.get(name), &child, issues);
        }
    }
}

impl Schema for ObjectSchema {
    fn safe_parse(&self, data: &ValueTree) -> Result<(), SchemaIssues> {
        let mut issues = SchemaIssues::new();
        self.parse_fields(data, &[], &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            tracing::trace!(count = issues.issues.len(), "object schema failed");
            Err(issues)
        }
    }
}
