//! Form component - submission controller
//!
//! A [`Form`] owns the registered inputs, the held error state and the
//! configuration. It turns [`FormEvent`]s into submissions:
//!
//! ```text
//! FormEvent::Submit / Enter / submit_data
//!     ↓ extract_form_data   (inputs → ValueTree, or data verbatim)
//!     ↓ validate            (rules or schema → ErrorMap)
//!     ├─ errors  → unflatten → held errors replaced → on_error(&ErrorTree)
//!     └─ valid   → held errors cleared (if any)     → on_submit(&ValueTree)
//! ```
//!
//! Everything runs synchronously on the UI thread. No internal borrow is held
//! while callbacks run, so callbacks may call back into the form.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::FormConfig;
use crate::error::Result;
use crate::events::{EventResponse, FormEvent, Key, SubmitSource, SubmitTrigger};
use crate::field_errors::{ErrorMap, ErrorTree};
use crate::fields::{Field, FormFields};
use crate::handle::FormHandle;
use crate::state::{FormState, SubscriptionHandle};
use crate::value::{FormValue, ValueTree};

/// Submission state machine
///
/// `Idle → Validating → Invalid | Valid → Idle`. Callbacks run while the form
/// is in `Invalid` or `Valid`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Invalid,
    Valid,
}

/// Result of one submission attempt
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Validation passed; `on_submit` received this data
    Valid(ValueTree),
    /// Validation failed; `on_error` received these errors
    Invalid(ErrorTree),
}

impl SubmitOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, SubmitOutcome::Valid(_))
    }
}

/// What the host renderer gets to draw the form
#[derive(Clone, Copy, Debug)]
pub struct RenderProps<'a> {
    /// Current nested errors
    pub errors: &'a ErrorTree,
    /// Configured default values
    pub default_values: &'a ValueTree,
}

pub(crate) struct FormShared {
    config: FormConfig,
    fields: RefCell<FormFields>,
    errors: FormState<ErrorTree>,
    phase: Cell<SubmitPhase>,
}

/// A mounted form
pub struct Form {
    pub(crate) shared: Rc<FormShared>,
}

impl Form {
    /// Create a form with no inputs
    pub fn new(config: FormConfig) -> Self {
        tracing::debug!(
            schema = config.validator.is_schema(),
            on_enter_submit = config.on_enter_submit,
            "form created"
        );
        Self {
            shared: Rc::new(FormShared {
                config,
                fields: RefCell::new(FormFields::new()),
                errors: FormState::new(ErrorTree::new()),
                phase: Cell::new(SubmitPhase::Idle),
            }),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.shared.config
    }

    /// Imperative handle for the owner of this form
    pub fn handle(&self) -> FormHandle {
        FormHandle::new(Rc::downgrade(&self.shared))
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Register an input after any existing ones
    pub fn add_field(&self, field: Field) {
        self.shared.fields.borrow_mut().add(field);
    }

    /// Register a text input whose initial value comes from the default values
    pub fn add_text_field(&self, name: &str) -> Result<()> {
        let initial = self
            .shared
            .config
            .default_values
            .get_path(name)
            .map(FormValue::to_string)
            .unwrap_or_default();
        self.add_field(Field::text(name, initial)?);
        Ok(())
    }

    /// Register a checkbox, checked if its default value is truthy
    pub fn add_checkbox(&self, name: &str) -> Result<()> {
        let checked = self
            .shared
            .config
            .default_values
            .get_path(name)
            .is_some_and(FormValue::is_truthy);
        self.add_field(Field::checkbox(name, checked)?);
        Ok(())
    }

    /// Register one option of a radio group, checked if it matches the
    /// group's default value
    pub fn add_radio(&self, name: &str, value: &str) -> Result<()> {
        let checked = self
            .shared
            .config
            .default_values
            .get_path(name)
            .is_some_and(|default| default.match_text() == value);
        self.add_field(Field::radio(name, value, checked)?);
        Ok(())
    }

    /// Current value of an input. With several inputs of the same name, the
    /// last one registered.
    pub fn field_value(&self, name: &str) -> Option<String> {
        self.shared
            .fields
            .borrow()
            .get(name)
            .map(|field| field.value().to_string())
    }

    /// Whether a checkbox is checked
    pub fn is_checked(&self, name: &str) -> Option<bool> {
        self.shared.fields.borrow().get(name).map(Field::is_checked)
    }

    /// Enable or disable an input
    pub fn set_disabled(&self, name: &str, disabled: bool) -> Result<()> {
        self.shared.fields.borrow_mut().set_disabled(name, disabled)
    }

    /// Current contents of the inputs
    pub fn values(&self) -> ValueTree {
        self.shared.fields.borrow().snapshot()
    }

    // =========================================================================
    // Errors & rendering
    // =========================================================================

    /// Current nested errors
    pub fn errors(&self) -> ErrorTree {
        self.shared.errors.get()
    }

    /// Subscribe to error state changes
    pub fn subscribe_errors<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&ErrorTree) + 'static,
    {
        self.shared.errors.subscribe(callback)
    }

    pub fn unsubscribe_errors(&self, handle: SubscriptionHandle) -> bool {
        self.shared.errors.unsubscribe(handle)
    }

    /// Hand the render props to a host render function
    pub fn render<R>(&self, f: impl FnOnce(RenderProps<'_>) -> R) -> R {
        let errors = self.errors();
        f(RenderProps {
            errors: &errors,
            default_values: &self.shared.config.default_values,
        })
    }

    pub fn phase(&self) -> SubmitPhase {
        self.shared.phase.get()
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Handle one event from the host
    pub fn handle_event(&self, event: FormEvent) -> Result<EventResponse> {
        match event {
            FormEvent::Input { name, value } => {
                let value = self
                    .shared
                    .fields
                    .borrow_mut()
                    .set_value(&name, value)?
                    .value()
                    .to_string();
                self.fire_change(&name, &value);
                Ok(EventResponse::Handled)
            }
            FormEvent::Check {
                name,
                value,
                checked,
            } => {
                let value = self
                    .shared
                    .fields
                    .borrow_mut()
                    .set_checked(&name, value.as_deref(), checked)?
                    .value()
                    .to_string();
                self.fire_change(&name, &value);
                Ok(EventResponse::Handled)
            }
            FormEvent::KeyDown { key: Key::Enter } if self.shared.config.on_enter_submit => {
                self.run_submit(SubmitSource::Fields, SubmitTrigger::EnterKey);
                Ok(EventResponse::PreventDefault)
            }
            FormEvent::KeyDown { .. } => Ok(EventResponse::Ignored),
            FormEvent::Submit => {
                self.run_submit(SubmitSource::Fields, SubmitTrigger::Event);
                Ok(EventResponse::PreventDefault)
            }
        }
    }

    /// Fire change callbacks for an input that changed
    fn fire_change(&self, name: &str, value: &str) {
        let callbacks = &self.shared.config.callbacks;
        if !callbacks.listens_to_input() {
            return;
        }
        if let Some(on_field_change) = &callbacks.on_field_change {
            on_field_change(name, value);
        }
        if let Some(on_form_change) = &callbacks.on_form_change {
            let snapshot = self.values();
            on_form_change(&snapshot);
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submit pre-built data, bypassing the inputs
    pub fn submit_data(&self, data: ValueTree) -> SubmitOutcome {
        self.run_submit(SubmitSource::Data(data), SubmitTrigger::Data)
    }

    /// Build the data for a submission
    pub fn extract_form_data(&self, source: SubmitSource) -> ValueTree {
        match source {
            SubmitSource::Fields => self.values(),
            SubmitSource::Data(data) => data,
        }
    }

    /// Validate data with the configured validator
    pub fn validate(&self, data: &ValueTree) -> ErrorMap {
        self.shared.config.validator.validate(data)
    }

    fn run_submit(&self, source: SubmitSource, trigger: SubmitTrigger) -> SubmitOutcome {
        let callbacks = &self.shared.config.callbacks;

        self.transition(SubmitPhase::Validating);
        let data = self.extract_form_data(source);
        let flat = self.validate(&data);

        if !flat.is_empty() {
            let errors = flat.unflatten();
            tracing::debug!(?trigger, count = flat.len(), "form submission invalid");

            self.transition(SubmitPhase::Invalid);
            self.shared.errors.set(errors.clone());
            if let Some(on_error) = &callbacks.on_error {
                on_error(&errors);
            }
            self.transition(SubmitPhase::Idle);
            return SubmitOutcome::Invalid(errors);
        }

        tracing::debug!(?trigger, "form submission valid");
        self.transition(SubmitPhase::Valid);
        self.clear_errors();
        if let Some(on_submit) = &callbacks.on_submit {
            on_submit(&data, trigger);
        }
        self.transition(SubmitPhase::Idle);
        SubmitOutcome::Valid(data)
    }

    /// Clear held errors, notifying subscribers only if there were any
    fn clear_errors(&self) -> bool {
        self.shared.errors.update_if(|errors| {
            if errors.is_empty() {
                return false;
            }
            *errors = ErrorTree::new();
            true
        })
    }

    fn transition(&self, to: SubmitPhase) {
        let from = self.shared.phase.replace(to);
        tracing::trace!(?from, ?to, "form phase");
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Clear errors and restore every input to its initial value
    ///
    /// Inputs are restored before error subscribers run.
    pub fn reset(&self) {
        self.shared.fields.borrow_mut().reset();
        let cleared = self.clear_errors();
        tracing::debug!(cleared_errors = cleared, "form reset");
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("config", &self.shared.config)
            .field("fields", &self.shared.fields.borrow().len())
            .field("errors", &self.shared.errors)
            .field("phase", &self.shared.phase.get())
            .finish()
    }
}
