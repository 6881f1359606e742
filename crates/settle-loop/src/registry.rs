//! `CallbackRegistry`: ordered, identity-deduplicated callback list.

use std::cell::RefCell;

use crate::{Callback, DispatchError};

/// An append-only list of callbacks dispatched in insertion order.
///
/// # Invariants
///
/// - A callback (by identity, see [`Callback::same`]) appears at most once.
/// - "Non-callable" registrations (`None`) are dropped silently.
/// - There is no removal; entries live as long as the registry.
///
/// The registry takes `&self` everywhere so callbacks can register further
/// callbacks while a dispatch is running.  A dispatch walks a snapshot of the
/// entries taken when it starts; anything registered meanwhile runs from the
/// next dispatch on.
#[derive(Default)]
pub struct CallbackRegistry {
    entries: RefCell<Vec<Callback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` unless it is `None` or already present.
    ///
    /// Returns `true` if the callback was inserted.
    pub fn register(&self, callback: impl Into<Option<Callback>>) -> bool {
        let Some(callback) = callback.into() else {
            return false;
        };
        if self.contains(&callback) {
            return false;
        }
        self.entries.borrow_mut().push(callback);
        true
    }

    pub fn contains(&self, callback: &Callback) -> bool {
        self.entries.borrow().iter().any(|c| Callback::same(c, callback))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Invoke every callback in insertion order, stopping at the first
    /// failure.  Callbacks after the failing one do not run.
    pub fn dispatch_all(&self) -> Result<(), DispatchError> {
        for (index, callback) in self.snapshot().iter().enumerate() {
            callback
                .call()
                .map_err(|source| DispatchError { index, source })?;
        }
        Ok(())
    }

    /// Invoke every callback in insertion order, handing each failure to
    /// `on_failure` and carrying on.  Returns the number of failures.
    pub fn dispatch_each(&self, mut on_failure: impl FnMut(DispatchError)) -> usize {
        let mut failures = 0;
        for (index, callback) in self.snapshot().iter().enumerate() {
            if let Err(source) = callback.call() {
                failures += 1;
                on_failure(DispatchError { index, source });
            }
        }
        failures
    }

    fn snapshot(&self) -> Vec<Callback> {
        self.entries.borrow().clone()
    }
}
