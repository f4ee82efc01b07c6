//! Form state - held, subscribable state for a mounted form
//!
//! A [`FormState<T>`] is a cloneable handle to a single value plus the
//! subscribers that want to hear about changes to it. The form keeps its error
//! tree in one; renderers read it and subscribe to redraw when it changes.
//!
//! Unlike reactive `State<T>`, nothing here triggers a rebuild on its own:
//! subscribers decide what to do with the new value. Subscribers run after the
//! internal borrow is released, so they may read the state again.
//!
//! # Example
//!
//! ```rust
//! use blinc_form::state::FormState;
//!
//! let errors = FormState::new(0u32);
//! let sub = errors.subscribe(|count| println!("now {count}"));
//!
//! errors.set(3);
//! errors.update(|count| *count += 1);
//! assert_eq!(errors.get(), 4);
//!
//! errors.unsubscribe(sub);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct StateInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
    next_subscription: Cell<u64>,
}

/// A single-threaded state cell with change subscribers
pub struct FormState<T: Clone + 'static> {
    inner: Rc<StateInner<T>>,
}

impl<T: Clone + 'static> Clone for FormState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Default + 'static> Default for FormState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for FormState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> FormState<T> {
    /// Create a new state cell
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Update the value in place and notify subscribers
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Update the value only if `f` reports a change.
    ///
    /// Returns whether subscribers were notified.
    pub fn update_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        let changed = f(&mut self.inner.value.borrow_mut());
        if changed {
            self.notify();
        }
        changed
    }

    /// Subscribe to changes
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.next_subscription.get();
        self.inner.next_subscription.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        SubscriptionHandle { id }
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != handle.id);
        subscribers.len() != before
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot both so callbacks can read or subscribe re-entrantly
        let subscribers: Vec<Subscriber<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        if subscribers.is_empty() {
            return;
        }
        let value = self.get();
        for callback in subscribers {
            callback(&value);
        }
    }
}

/// Handle for unsubscribing from state updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle {
    id: u64,
}
