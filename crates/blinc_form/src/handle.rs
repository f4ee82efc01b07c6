//! Imperative form handle
//!
//! The owner of a form gets a [`FormHandle`] to reset or submit it from
//! outside the event flow (a toolbar button, a keyboard shortcut, a test).
//! The handle does not keep the form alive: once the form is dropped, both
//! operations do nothing and return `false`.

use std::rc::Weak;

use crate::events::FormEvent;
use crate::form::{Form, FormShared};

/// Reset/submit access to a mounted [`Form`]
#[derive(Clone)]
pub struct FormHandle {
    shared: Weak<FormShared>,
}

impl FormHandle {
    pub(crate) fn new(shared: Weak<FormShared>) -> Self {
        Self { shared }
    }

    fn form(&self) -> Option<Form> {
        self.shared.upgrade().map(|shared| Form { shared })
    }

    /// Whether the form is still alive
    pub fn is_mounted(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Clear errors and restore the inputs to their initial values
    pub fn reset_form(&self) -> bool {
        match self.form() {
            Some(form) => {
                form.reset();
                true
            }
            None => false,
        }
    }

    /// Dispatch a submit event, exactly as if the user had submitted
    pub fn submit(&self) -> bool {
        match self.form() {
            Some(form) => form.handle_event(FormEvent::Submit).is_ok(),
            None => false,
        }
    }
}

impl std::fmt::Debug for FormHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormHandle")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
