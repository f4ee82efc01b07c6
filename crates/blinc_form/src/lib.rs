//! Blinc Form
//!
//! A form component with client-side validation for Blinc applications:
//!
//! - **Declarative rules**: `required`, `min_length`, `max_length` and
//!   `pattern` checks arranged in a [`RuleTree`] that mirrors the data
//! - **Schema validation**: plug in any [`Schema`] (closures work) instead of
//!   rules
//! - **Nested errors**: dotted input names (`"userinfo.name"`) become nested
//!   data, and failures come back as an [`ErrorTree`] of the same shape
//! - **Imperative control**: a [`FormHandle`] resets or submits the form from
//!   outside the event flow
//!
//! # Example
//!
//! ```rust
//! use blinc_form::prelude::*;
//!
//! let form = Form::new(
//!     FormConfig::new()
//!         .validation_rules(
//!             RuleTree::new()
//!                 .at("userinfo.name", ValidationRule::new().required().min_length(10))
//!                 .unwrap(),
//!         )
//!         .on_submit(|data| println!("submitted {:?}", data))
//!         .on_error(|errors| println!("errors {:?}", errors)),
//! );
//! form.add_text_field("userinfo.name").unwrap();
//!
//! form.handle_event(FormEvent::input("userinfo.name", "John")).unwrap();
//! form.handle_event(FormEvent::Submit).unwrap();
//!
//! assert_eq!(
//!     form.errors().message("userinfo.name"),
//!     Some("Must be at least 10 characters")
//! );
//!
//! form.handle().reset_form();
//! assert!(form.errors().is_empty());
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod field_errors;
pub mod fields;
pub mod form;
pub mod handle;
pub mod path;
pub mod rules;
pub mod schema;
pub mod state;
pub mod validate;
pub mod value;

#[cfg(test)]
mod tests;

pub use codec::{build_nested, expand_entries, flatten, unflatten};
pub use config::{
    ErrorCallback, FieldChangeCallback, FormCallbacks, FormChangeCallback, FormConfig, FormSpec,
    MessageSpec, RuleSpec, SubmitCallback, Validator,
};
pub use error::{FormError, Result};
pub use events::{EventResponse, FormEvent, Key, SubmitSource, SubmitTrigger};
pub use field_errors::{ErrorMap, ErrorNode, ErrorTree, FieldError};
pub use fields::{Field, FieldKind, FormFields};
pub use form::{Form, RenderProps, SubmitOutcome, SubmitPhase};
pub use handle::FormHandle;
pub use path::FieldPath;
pub use rules::{MessageNode, MessageTree, RuleMessages, RuleNode, RuleTree, ValidationRule};
pub use schema::{Schema, SchemaIssue, SchemaIssues};
pub use state::{FormState, SubscriptionHandle};
pub use validate::validate_rules;
pub use value::{FormValue, ValueTree};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::FormConfig;
    pub use crate::events::{FormEvent, Key};
    pub use crate::field_errors::{ErrorMap, ErrorTree};
    pub use crate::fields::Field;
    pub use crate::form::{Form, SubmitOutcome};
    pub use crate::handle::FormHandle;
    pub use crate::rules::{MessageTree, RuleMessages, RuleTree, ValidationRule};
    pub use crate::schema::{Schema, SchemaIssue, SchemaIssues};
    pub use crate::value::{FormValue, ValueTree};
}
