#![forbid(unsafe_code)]

//! Subscriber registry and notification delivery shared by
//! [`ObservableCell`](crate::ObservableCell) and
//! [`ObservableList`](crate::ObservableList).
//!
//! # Delivery model
//!
//! Every successful mutation enqueues exactly one *delivery*: the
//! post-mutation payload plus the set of subscribers registered at that
//! instant. The outermost `notify()` call drains the queue in FIFO order, so
//! a mutation issued from inside a subscriber callback is applied to the
//! state immediately but its notification waits until the current round has
//! reached every subscriber.
//!
//! ```text
//! set(a)            deliver a -> [s1, s2, s3]
//!   s2: set(b)        queue  b -> [s1, s2, s3]   (returns immediately)
//!                   deliver b -> [s1, s2, s3]
//! ```
//!
//! # Invariants
//!
//! 1. Subscribers are invoked in registration order.
//! 2. Each delivery reaches only subscribers that were registered when the
//!    mutation happened and are still registered when their turn comes.
//! 3. A panicking subscriber never prevents the remaining subscribers from
//!    being invoked.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Subscriber panic | Callback unwinds | Captured; surfaced per [`PanicPolicy`] after the queue drains |
//! | Several panics in one round | More than one callback unwinds | `Propagate` resumes the first, logs the rest |
//! | Foreign handle | `unsubscribe` with another observable's handle | No-op |

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::{error, trace, warn};

/// Identifier of a registered subscriber, unique within one observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// What to do when a subscriber callback panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicPolicy {
    /// Finish delivering to everyone, then resume the first captured panic
    /// on the mutating caller's thread.
    #[default]
    Propagate,
    /// Log every failure at `error` level and keep it for
    /// `take_failures()`; the mutating call returns normally.
    Log,
}

/// A captured subscriber panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberPanic {
    /// The subscriber whose callback panicked.
    pub subscription: SubscriptionId,
    /// Panic message, or `"unknown panic"` for non-string payloads.
    pub message: String,
}

impl fmt::Display for SubscriberPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber {} panicked: {}", self.subscription, self.message)
    }
}

impl std::error::Error for SubscriberPanic {}

type Callback<P> = Box<dyn Fn(&P)>;

struct Entry<P> {
    id: SubscriptionId,
    active: Cell<bool>,
    callback: Callback<P>,
}

struct Registry<P> {
    next_id: u64,
    entries: Vec<Rc<Entry<P>>>,
}

/// Type-erased view of a registry so [`Subscription`] does not carry the
/// payload type.
trait Detach {
    fn detach(&self, id: SubscriptionId) -> bool;
    fn is_registered(&self, id: SubscriptionId) -> bool;
}

impl<P> Detach for RefCell<Registry<P>> {
    fn detach(&self, id: SubscriptionId) -> bool {
        // The entry is dropped only after the borrow ends: its callback may
        // own other subscriptions to this same registry.
        let removed = {
            let mut registry = self.borrow_mut();
            registry
                .entries
                .iter()
                .position(|e| e.id == id)
                .map(|pos| registry.entries.remove(pos))
        };
        match removed {
            Some(entry) => {
                entry.active.set(false);
                true
            }
            None => false,
        }
    }

    fn is_registered(&self, id: SubscriptionId) -> bool {
        self.borrow().entries.iter().any(|e| e.id == id)
    }
}

/// Handle for a registered callback.
///
/// Dropping the handle unsubscribes the callback. Unsubscribing is
/// idempotent: calling [`unsubscribe`](Self::unsubscribe) on an already
/// removed handle, or dropping it afterwards, does nothing.
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    /// Identifier assigned at registration.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the callback. Later mutations will not invoke it, including
    /// deliveries already queued for the current round.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade()
            && registry.detach(self.id)
        {
            trace!(subscription = %self.id, "unsubscribed");
        }
    }

    /// Whether the callback is still registered with a live observable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.is_registered(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

struct Delivery<P> {
    payload: P,
    targets: Vec<Rc<Entry<P>>>,
}

/// Subscriber list plus the delivery queue for one observable.
pub(crate) struct Notifier<P> {
    registry: Rc<RefCell<Registry<P>>>,
    queue: RefCell<VecDeque<Delivery<P>>>,
    delivering: Cell<bool>,
    policy: PanicPolicy,
    failures: RefCell<Vec<SubscriberPanic>>,
}

impl<P: 'static> Notifier<P> {
    pub(crate) fn new(policy: PanicPolicy) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
            queue: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
            policy,
            failures: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn policy(&self) -> PanicPolicy {
        self.policy
    }

    pub(crate) fn subscribe(&self, callback: Callback<P>) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = SubscriptionId(registry.next_id);
            registry.next_id += 1;
            registry.entries.push(Rc::new(Entry {
                id,
                active: Cell::new(true),
                callback,
            }));
            id
        };
        trace!(subscription = %id, "subscribed");
        let registry: Rc<dyn Detach> = self.registry.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Detach `subscription` if it was issued by this notifier.
    pub(crate) fn unsubscribe(&self, subscription: &Subscription) {
        let ours = std::ptr::addr_eq(subscription.registry.as_ptr(), Rc::as_ptr(&self.registry));
        if ours {
            subscription.unsubscribe();
        } else {
            trace!(subscription = %subscription.id, "ignoring handle from another observable");
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub(crate) fn take_failures(&self) -> Vec<SubscriberPanic> {
        std::mem::take(&mut *self.failures.borrow_mut())
    }

    /// Enqueue `payload` for the current subscribers and, unless a round is
    /// already running further up the stack, drain the queue.
    pub(crate) fn notify(&self, payload: P) {
        let targets = self.registry.borrow().entries.clone();
        self.queue
            .borrow_mut()
            .push_back(Delivery { payload, targets });

        if self.delivering.get() {
            trace!("nested mutation, delivery deferred");
            return;
        }

        self.delivering.set(true);
        let mut panics: Vec<(SubscriptionId, Box<dyn Any + Send>)> = Vec::new();
        let mut rounds = 0usize;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(delivery) = next else {
                break;
            };
            rounds += 1;
            for entry in &delivery.targets {
                if !entry.active.get() {
                    continue;
                }
                let result =
                    panic::catch_unwind(AssertUnwindSafe(|| (entry.callback)(&delivery.payload)));
                if let Err(payload) = result {
                    panics.push((entry.id, payload));
                }
            }
        }
        self.delivering.set(false);
        trace!(rounds, "delivery finished");

        if !panics.is_empty() {
            self.surface(panics);
        }
    }

    fn surface(&self, panics: Vec<(SubscriptionId, Box<dyn Any + Send>)>) {
        match self.policy {
            PanicPolicy::Propagate => {
                let mut panics = panics.into_iter();
                let Some((first_id, first)) = panics.next() else {
                    return;
                };
                for (id, payload) in panics {
                    warn!(
                        subscription = %id,
                        message = %panic_message(payload.as_ref()),
                        "additional subscriber panic discarded"
                    );
                }
                warn!(subscription = %first_id, "resuming subscriber panic");
                panic::resume_unwind(first);
            }
            PanicPolicy::Log => {
                let mut failures = self.failures.borrow_mut();
                for (id, payload) in panics {
                    let failure = SubscriberPanic {
                        subscription: id,
                        message: panic_message(payload.as_ref()),
                    };
                    error!(subscription = %id, message = %failure.message, "subscriber panicked");
                    failures.push(failure);
                }
            }
        }
    }
}

/// Text of a panic payload: the `&str` or `String` message, or
/// `"unknown panic"` for any other payload type.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
