#![forbid(unsafe_code)]

//! Reactive state for the tutorial examples.
//!
//! This crate provides the two change-tracking primitives the examples are
//! built on:
//!
//! - [`ObservableCell`]: a shared, version-tracked value with subscriber
//!   callbacks.
//! - [`ObservableList`]: an ordered list of id-keyed [`Record`]s whose ids are
//!   allocated from a per-list counter and never reused.
//! - [`Subscription`]: handle returned by `subscribe()`; unsubscribes on drop.
//!
//! # Architecture
//!
//! Both primitives use `Rc` + `RefCell`/`Cell` interiors: they are
//! single-threaded and `!Send`. Notification is synchronous; a mutation made
//! from inside a subscriber is applied immediately and its notification is
//! queued until the current delivery round completes (see [`subscriber`]).
//!
//! # Invariants
//!
//! 1. Every successful mutation produces exactly one notification, carrying
//!    the post-mutation state.
//! 2. Subscribers are notified in registration order.
//! 3. A panicking subscriber does not stop delivery to the others; the panic
//!    is surfaced according to the configured [`PanicPolicy`].

pub mod cell;
pub mod list;
pub mod subscriber;

pub use cell::{CellConfig, ObservableCell};
pub use list::{ListConfig, ListError, ObservableList, Record, RecordId};
pub use subscriber::{PanicPolicy, SubscriberPanic, Subscription, SubscriptionId, panic_message};
