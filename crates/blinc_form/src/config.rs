//! Form configuration
//!
//! [`FormConfig`] is built with chained setters and handed to
//! [`Form::new`](crate::Form::new). The declarative parts (rules, messages,
//! default values, enter-to-submit) can also be loaded from TOML or JSON
//! through [`FormSpec`]:
//!
//! ```toml
//! on_enter_submit = false
//!
//! [validation_rules.email]
//! required = true
//! pattern = "^[^@]+@[^@]+$"
//!
//! [validation_rules.userinfo.name]
//! required = true
//! min_length = 10
//!
//! [custom_error_messages.userinfo.name]
//! min_length = "Use your full name"
//!
//! [default_values.userinfo]
//! name = "John"
//! ```
//!
//! A table whose keys are all rule keywords (`required`, `min_length`,
//! `max_length`, `pattern`) is a field rule; any other table is a group of
//! nested fields.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;
use crate::events::SubmitTrigger;
use crate::field_errors::{ErrorMap, ErrorTree};
use crate::rules::{MessageNode, MessageTree, RuleMessages, RuleNode, RuleTree, ValidationRule};
use crate::schema::{validate_schema, Schema};
use crate::validate::validate_rules;
use crate::value::ValueTree;

/// Called with the submitted data after a successful validation
pub type SubmitCallback = Rc<dyn Fn(&ValueTree, SubmitTrigger)>;
/// Called with the nested errors after a failed validation
pub type ErrorCallback = Rc<dyn Fn(&ErrorTree)>;
/// Called with the name and value of the input that changed
pub type FieldChangeCallback = Rc<dyn Fn(&str, &str)>;
/// Called with a snapshot of the whole form after any input changed
pub type FormChangeCallback = Rc<dyn Fn(&ValueTree)>;

/// How submissions are validated, fixed at configuration time
#[derive(Clone)]
pub enum Validator {
    /// Declarative rule tree with optional message overrides
    Rules {
        rules: RuleTree,
        messages: MessageTree,
    },
    /// External schema; rule configuration is ignored
    Schema(Rc<dyn Schema>),
}

impl Default for Validator {
    fn default() -> Self {
        Validator::Rules {
            rules: RuleTree::new(),
            messages: MessageTree::new(),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Rules { rules, messages } => f
                .debug_struct("Rules")
                .field("rules", rules)
                .field("messages", messages)
                .finish(),
            Validator::Schema(_) => f.write_str("Schema(..)"),
        }
    }
}

impl Validator {
    /// Validate `data`, producing a flat error map (empty when valid)
    pub fn validate(&self, data: &ValueTree) -> ErrorMap {
        match self {
            Validator::Rules { rules, messages } => validate_rules(data, rules, messages),
            Validator::Schema(schema) => validate_schema(schema.as_ref(), data),
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Validator::Schema(_))
    }
}

/// Outbound callbacks of a form
#[derive(Clone, Default)]
pub struct FormCallbacks {
    pub on_submit: Option<SubmitCallback>,
    pub on_error: Option<ErrorCallback>,
    pub on_field_change: Option<FieldChangeCallback>,
    pub on_form_change: Option<FormChangeCallback>,
}

impl FormCallbacks {
    /// Whether any input-change callback is configured
    pub fn listens_to_input(&self) -> bool {
        self.on_field_change.is_some() || self.on_form_change.is_some()
    }
}

/// Form configuration
#[derive(Clone)]
pub struct FormConfig {
    /// Validation mode
    pub validator: Validator,
    /// Initial values for inputs and the render props
    pub default_values: ValueTree,
    /// Submit when Enter is pressed inside the form
    pub on_enter_submit: bool,
    /// Outbound callbacks
    pub callbacks: FormCallbacks,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            validator: Validator::default(),
            default_values: ValueTree::new(),
            on_enter_submit: true,
            callbacks: FormCallbacks::default(),
        }
    }
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("validator", &self.validator)
            .field("default_values", &self.default_values)
            .field("on_enter_submit", &self.on_enter_submit)
            .finish_non_exhaustive()
    }
}

impl FormConfig {
    /// Create a new form config
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a deserialized spec
    pub fn from_spec(spec: FormSpec) -> Result<Self> {
        let mut rules = RuleTree::new();
        for (name, node) in spec.validation_rules {
            rules.insert(name, node.into_node()?);
        }
        let mut messages = MessageTree::new();
        for (name, node) in spec.custom_error_messages {
            messages.insert(name, node.into_node());
        }

        Ok(Self::new()
            .validation_rules(rules)
            .custom_error_messages(messages)
            .default_values(spec.default_values)
            .on_enter_submit(spec.on_enter_submit))
    }

    /// Set the rule tree. Ignored when a schema is configured.
    pub fn validation_rules(mut self, rules: RuleTree) -> Self {
        match &mut self.validator {
            Validator::Rules { rules: current, .. } => *current = rules,
            Validator::Schema(_) => {
                tracing::warn!("validation_rules ignored: a validation schema is configured");
            }
        }
        self
    }

    /// Set message overrides. Ignored when a schema is configured.
    pub fn custom_error_messages(mut self, messages: MessageTree) -> Self {
        match &mut self.validator {
            Validator::Rules {
                messages: current, ..
            } => *current = messages,
            Validator::Schema(_) => {
                tracing::warn!("custom_error_messages ignored: a validation schema is configured");
            }
        }
        self
    }

    /// Validate with a schema instead of rules
    pub fn validation_schema(mut self, schema: impl Schema + 'static) -> Self {
        if let Validator::Rules { rules, messages } = &self.validator {
            if !rules.is_empty() || !messages.is_empty() {
                tracing::warn!("validation schema replaces the configured validation rules");
            }
        }
        self.validator = Validator::Schema(Rc::new(schema));
        self
    }

    /// Set default values
    pub fn default_values(mut self, values: ValueTree) -> Self {
        self.default_values = values;
        self
    }

    /// Set whether Enter submits the form
    pub fn on_enter_submit(mut self, enabled: bool) -> Self {
        self.on_enter_submit = enabled;
        self
    }

    /// Set the submit callback
    pub fn on_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValueTree) + 'static,
    {
        self.callbacks.on_submit =
            Some(Rc::new(move |data: &ValueTree, _: SubmitTrigger| f(data)));
        self
    }

    /// Set a submit callback that also learns what triggered the submission
    pub fn on_submit_with_trigger<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValueTree, SubmitTrigger) + 'static,
    {
        self.callbacks.on_submit = Some(Rc::new(f));
        self
    }

    /// Set the error callback
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorTree) + 'static,
    {
        self.callbacks.on_error = Some(Rc::new(f));
        self
    }

    /// Set the field change callback
    pub fn on_field_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) + 'static,
    {
        self.callbacks.on_field_change = Some(Rc::new(f));
        self
    }

    /// Set the form change callback
    pub fn on_form_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValueTree) + 'static,
    {
        self.callbacks.on_form_change = Some(Rc::new(f));
        self
    }
}

// =============================================================================
// DESERIALIZABLE FORM SPEC
// =============================================================================

/// Declarative part of a [`FormConfig`], loadable from TOML or JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormSpec {
    #[serde(alias = "validationRules", alias = "rules")]
    pub validation_rules: IndexMap<String, RuleSpec>,
    #[serde(alias = "customErrorMessages", alias = "messages")]
    pub custom_error_messages: IndexMap<String, MessageSpec>,
    #[serde(alias = "defaultValues")]
    pub default_values: ValueTree,
    #[serde(alias = "onEnterSubmit")]
    pub on_enter_submit: bool,
}

impl Default for FormSpec {
    fn default() -> Self {
        Self {
            validation_rules: IndexMap::new(),
            custom_error_messages: IndexMap::new(),
            default_values: ValueTree::new(),
            on_enter_submit: true,
        }
    }
}

impl FormSpec {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Rule checks of one field as written in a spec
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleLeafSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "minLength")]
    pub min_length: Option<usize>,
    #[serde(default, alias = "maxLength")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<String>,
}

/// A rule table: either one field's checks or a group of nested fields
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Leaf(RuleLeafSpec),
    Branch(IndexMap<String, RuleSpec>),
}

impl RuleSpec {
    fn into_node(self) -> Result<RuleNode> {
        match self {
            RuleSpec::Leaf(leaf) => {
                let mut rule = ValidationRule {
                    required: leaf.required,
                    min_length: leaf.min_length,
                    max_length: leaf.max_length,
                    pattern: None,
                };
                if let Some(pattern) = &leaf.pattern {
                    rule = rule.try_pattern(pattern)?;
                }
                Ok(RuleNode::Leaf(rule))
            }
            RuleSpec::Branch(children) => {
                let mut tree = RuleTree::new();
                for (name, child) in children {
                    tree.insert(name, child.into_node()?);
                }
                Ok(RuleNode::Branch(tree))
            }
        }
    }
}

/// Message overrides of one field as written in a spec
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageLeafSpec {
    #[serde(default)]
    pub required: Option<String>,
    #[serde(default, alias = "minLength")]
    pub min_length: Option<String>,
    #[serde(default, alias = "maxLength")]
    pub max_length: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

/// A message table: either one field's overrides or nested fields
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageSpec {
    Leaf(MessageLeafSpec),
    Branch(IndexMap<String, MessageSpec>),
}

impl MessageSpec {
    fn into_node(self) -> MessageNode {
        match self {
            MessageSpec::Leaf(leaf) => MessageNode::Leaf(RuleMessages {
                required: leaf.required,
                min_length: leaf.min_length,
                max_length: leaf.max_length,
                pattern: leaf.pattern,
            }),
            MessageSpec::Branch(children) => {
                let mut tree = MessageTree::new();
                for (name, child) in children {
                    tree.insert(name, child.into_node());
                }
                MessageNode::Branch(tree)
            }
        }
    }
}
