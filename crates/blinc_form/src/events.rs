//! Form events
//!
//! The host delivers platform input to a form as [`FormEvent`]s, one at a
//! time, from the UI thread.

use crate::value::ValueTree;

/// Keys the form distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Backspace,
    Char(char),
}

/// An event targeted at a form
#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    /// A text input's value changed
    Input { name: String, value: String },
    /// A checkbox or radio was toggled. `value` picks one option when several
    /// share the name.
    Check {
        name: String,
        value: Option<String>,
        checked: bool,
    },
    /// A key was pressed while focus was inside the form
    KeyDown { key: Key },
    /// The form was submitted (submit button or programmatic dispatch)
    Submit,
}

impl FormEvent {
    pub fn input(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormEvent::Input {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn check(name: impl Into<String>, checked: bool) -> Self {
        FormEvent::Check {
            name: name.into(),
            value: None,
            checked,
        }
    }

    /// Toggle the option of `name` that submits `value`
    pub fn check_value(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        FormEvent::Check {
            name: name.into(),
            value: Some(value.into()),
            checked,
        }
    }

    pub fn key(key: Key) -> Self {
        FormEvent::KeyDown { key }
    }
}

/// What a form did with an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventResponse {
    /// The form did not act on the event
    Ignored,
    /// The form handled the event; the host may still run its default action
    Handled,
    /// The form handled the event and the host must not run its default action
    PreventDefault,
}

impl EventResponse {
    pub fn is_default_prevented(&self) -> bool {
        matches!(self, EventResponse::PreventDefault)
    }
}

/// What started a submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// A submit event, from the host or [`FormHandle::submit`](crate::FormHandle::submit)
    Event,
    /// Enter pressed inside the form
    EnterKey,
    /// [`Form::submit_data`](crate::Form::submit_data) with pre-built data
    Data,
}

/// Where a submission takes its data from
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitSource {
    /// Snapshot the registered inputs
    Fields,
    /// Use the given data verbatim, bypassing the inputs
    Data(ValueTree),
}
