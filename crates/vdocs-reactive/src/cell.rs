#![forbid(unsafe_code)]

//! Observable value cell with change notification and version tracking.
//!
//! # Design
//!
//! [`ObservableCell<T>`] keeps a value of type `T` in shared,
//! reference-counted storage. Every `set()` or `update()` replaces the value,
//! bumps the version and notifies all registered subscribers with a clone of
//! the new value, synchronously and in registration order, before returning.
//!
//! # Performance
//!
//! | Operation     | Complexity                         |
//! |---------------|------------------------------------|
//! | `get()`       | O(1) + clone of `T`                |
//! | `set()`       | O(S) where S = subscribers         |
//! | `subscribe()` | O(1) amortized                     |
//! | `unsubscribe()` | O(S)                             |
//!
//! # Failure Modes
//!
//! - **Mutation inside `with()`/`update()`**: the closure holds a borrow of
//!   the value; calling `set()` or `get()` from it panics (RefCell rules).
//! - **Re-entrant set from a subscriber**: allowed. The value changes at once
//!   and the notification is queued behind the current round.
//! - **Panicking subscriber**: see [`PanicPolicy`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::subscriber::{Notifier, PanicPolicy, SubscriberPanic, Subscription};

/// Configuration for an [`ObservableCell`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellConfig {
    /// How subscriber panics are surfaced.
    pub panic_policy: PanicPolicy,
}

impl CellConfig {
    /// Default configuration (`PanicPolicy::Propagate`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the panic policy.
    #[must_use]
    pub fn with_panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }
}

struct CellInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    notifier: Notifier<T>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `ObservableCell` creates a new handle to the **same** state:
/// both handles see the same value and share subscribers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 per `set()`/`update()`.
/// 2. Each mutation is delivered once to every subscriber registered at the
///    time of the mutation, in registration order.
/// 3. `get()`, `with()` and subscription management never notify.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use vdocs_reactive::ObservableCell;
///
/// let message = ObservableCell::new(String::from("Hello World!"));
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let _sub = message.subscribe(move |m: &String| sink.borrow_mut().push(m.clone()));
///
/// message.update(|m| *m = m.chars().rev().collect());
///
/// assert_eq!(message.get(), "!dlroW olleH");
/// assert_eq!(*seen.borrow(), vec!["!dlroW olleH".to_string()]);
/// ```
pub struct ObservableCell<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> Clone for ObservableCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ObservableCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCell")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .field("subscriber_count", &self.inner.notifier.subscriber_count())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for ObservableCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> ObservableCell<T> {
    /// Create a cell with the given initial value and default configuration.
    ///
    /// The initial version is 0 and no subscribers are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_config(value, CellConfig::default())
    }

    /// Create a cell with an explicit configuration.
    #[must_use]
    pub fn with_config(value: T, config: CellConfig) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                notifier: Notifier::new(config.panic_policy),
            }),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.borrow())
    }

    /// Replace the value and notify every subscriber.
    ///
    /// Setting a value equal to the current one still counts as a mutation;
    /// use [`set_if_changed`](Self::set_if_changed) to skip those.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.commit();
    }

    /// Modify the value in place. Always counts as one mutation.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut *self.inner.value.borrow_mut());
        self.commit();
    }

    /// Register a callback invoked with the new value after each mutation.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.notifier.subscribe(Box::new(callback))
    }

    /// Remove a subscription. Idempotent; handles issued by another
    /// observable are ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.inner.notifier.unsubscribe(subscription);
    }

    /// Number of mutations since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.notifier.subscriber_count()
    }

    /// Panic policy this cell was created with.
    #[must_use]
    pub fn panic_policy(&self) -> PanicPolicy {
        self.inner.notifier.policy()
    }

    /// Drain subscriber failures recorded under [`PanicPolicy::Log`].
    pub fn take_failures(&self) -> Vec<SubscriberPanic> {
        self.inner.notifier.take_failures()
    }

    fn commit(&self) {
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        let value = self.get();
        debug!(version, "cell updated");
        self.inner.notifier.notify(value);
    }
}

impl<T: Clone + PartialEq + 'static> ObservableCell<T> {
    /// Replace the value only if it differs from the current one.
    ///
    /// Returns whether a mutation (and notification) happened.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.inner.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }
}
