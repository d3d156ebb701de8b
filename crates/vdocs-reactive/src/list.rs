#![forbid(unsafe_code)]

//! Ordered, id-keyed observable list.
//!
//! # Design
//!
//! [`ObservableList`] owns a `Vec<Record>` in insertion order and a private
//! id counter. `append()` allocates the next id, `remove_by_id()` drops the
//! matching record without touching any other id, and every structural change
//! delivers a fresh snapshot to subscribers.
//!
//! # Invariants
//!
//! 1. Ids handed out by `append()` strictly increase; the counter never
//!    resets or decreases, so an id is never reused after removal.
//! 2. No two records in the list share an id.
//! 3. Removal never renumbers or reorders the remaining records.
//! 4. Exactly one notification per successful `append()`/`remove_by_id()`;
//!    a removal of an absent id is silent.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Absent id | `remove_by_id` on a removed/unknown id | Returns `false`, no notification |
//! | Duplicate id on restore | `from_records` input repeats an id | `ListError::DuplicateId` |
//! | Id space exhausted | Counter at `u64::MAX` | `from_records` errors; `append` panics |
//! | Mutation inside `with_records()` | Closure holds the borrow | Panics (RefCell rules) |

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::subscriber::{Notifier, PanicPolicy, SubscriberPanic, Subscription};

/// Identity of a [`Record`] within its owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RecordId(u64);

impl RecordId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identity-bearing item of an [`ObservableList`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    id: RecordId,
    text: String,
}

impl Record {
    /// Build a record, typically to restore a persisted list via
    /// [`ObservableList::from_records`].
    #[must_use]
    pub fn new(id: RecordId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Errors from restoring a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The same id appears more than once.
    DuplicateId(RecordId),
    /// A restored id leaves no room for the counter to advance.
    IdSpaceExhausted,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate record id {id}"),
            Self::IdSpaceExhausted => write!(f, "record id space exhausted"),
        }
    }
}

impl std::error::Error for ListError {}

/// Configuration for an [`ObservableList`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListConfig {
    /// Id assigned to the first appended record.
    pub first_id: u64,
    /// How subscriber panics are surfaced.
    pub panic_policy: PanicPolicy,
}

impl ListConfig {
    /// Default configuration: ids start at 0, panics propagate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first id handed out.
    #[must_use]
    pub fn with_first_id(mut self, first_id: u64) -> Self {
        self.first_id = first_id;
        self
    }

    /// Set the panic policy.
    #[must_use]
    pub fn with_panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }
}

struct ListInner {
    records: RefCell<Vec<Record>>,
    next_id: Cell<u64>,
    version: Cell<u64>,
    notifier: Notifier<Vec<Record>>,
}

/// A shared, ordered list of [`Record`]s with change notification.
///
/// Cloning creates another handle to the same records, counter and
/// subscribers. Consumers only ever see copies ([`snapshot`](Self::snapshot))
/// or borrowed slices; the list is the sole owner of its records.
///
/// # Example
///
/// ```
/// use vdocs_reactive::{ObservableList, RecordId};
///
/// let todos = ObservableList::new();
/// todos.append("Learn HTML");
/// todos.append("Learn JavaScript");
/// todos.append("Learn Vue");
///
/// assert!(todos.remove_by_id(RecordId::new(1)));
/// let texts: Vec<_> = todos.snapshot().into_iter().map(|r| r.into_text()).collect();
/// assert_eq!(texts, ["Learn HTML", "Learn Vue"]);
/// ```
pub struct ObservableList {
    inner: Rc<ListInner>,
}

impl Clone for ObservableList {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for ObservableList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("records", &*self.inner.records.borrow())
            .field("next_id", &self.inner.next_id.get())
            .field("version", &self.inner.version.get())
            .field("subscriber_count", &self.inner.notifier.subscriber_count())
            .finish()
    }
}

impl Default for ObservableList {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableList {
    /// Empty list, ids starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    /// Empty list with an explicit configuration.
    #[must_use]
    pub fn with_config(config: ListConfig) -> Self {
        Self::from_parts(Vec::new(), config.first_id, config.panic_policy)
    }

    /// List pre-seeded with `texts`, ids allocated from `config.first_id`
    /// in order. Seeding is not a mutation: the version stays 0.
    ///
    /// # Panics
    ///
    /// Panics, like [`append`](Self::append), if allocating an id would
    /// move the counter past `u64::MAX`.
    #[must_use]
    pub fn seeded<I, S>(config: ListConfig, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = config.first_id;
        let records = texts
            .into_iter()
            .map(|text| {
                let id = next;
                next = allocate_after(id);
                Record::new(RecordId(id), text)
            })
            .collect();
        Self::from_parts(records, next, config.panic_policy)
    }

    /// Restore a list from previously taken records.
    ///
    /// The counter resumes after the largest restored id, and never below
    /// `config.first_id`.
    pub fn from_records<I>(records: I, config: ListConfig) -> Result<Self, ListError>
    where
        I: IntoIterator<Item = Record>,
    {
        let records: Vec<Record> = records.into_iter().collect();
        let mut seen = HashSet::with_capacity(records.len());
        let mut next = config.first_id;
        for record in &records {
            if !seen.insert(record.id) {
                return Err(ListError::DuplicateId(record.id));
            }
            let after = record
                .id
                .get()
                .checked_add(1)
                .ok_or(ListError::IdSpaceExhausted)?;
            next = next.max(after);
        }
        debug!(count = records.len(), next_id = next, "list restored");
        Ok(Self::from_parts(records, next, config.panic_policy))
    }

    fn from_parts(records: Vec<Record>, next_id: u64, policy: PanicPolicy) -> Self {
        Self {
            inner: Rc::new(ListInner {
                records: RefCell::new(records),
                next_id: Cell::new(next_id),
                version: Cell::new(0),
                notifier: Notifier::new(policy),
            }),
        }
    }

    /// Append a record with the next id and notify subscribers.
    ///
    /// Accepts any text, including the empty string.
    ///
    /// # Panics
    ///
    /// Panics if the id counter has reached `u64::MAX`.
    pub fn append(&self, text: impl Into<String>) -> Record {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(allocate_after(id));

        let record = Record::new(RecordId(id), text);
        self.inner.records.borrow_mut().push(record.clone());
        debug!(id, "record appended");
        self.commit();
        record
    }

    /// Remove the record with `id`. Returns whether a record was removed;
    /// subscribers are notified only in that case.
    pub fn remove_by_id(&self, id: RecordId) -> bool {
        let removed = {
            let mut records = self.inner.records.borrow_mut();
            match records.iter().position(|r| r.id == id) {
                Some(pos) => {
                    records.remove(pos);
                    true
                }
                None => false,
            }
        };
        if removed {
            debug!(id = id.get(), "record removed");
            self.commit();
        } else {
            debug!(id = id.get(), "remove ignored, id absent");
        }
        removed
    }

    /// Copy of the current ordered contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Record> {
        self.inner.records.borrow().clone()
    }

    /// Borrow the records without copying.
    pub fn with_records<R>(&self, f: impl FnOnce(&[Record]) -> R) -> R {
        f(self.inner.records.borrow().as_slice())
    }

    /// Copy of the record with `id`, if present.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.inner
            .records
            .borrow()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.inner.records.borrow().iter().any(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.records.borrow().is_empty()
    }

    /// Id the next `append()` will assign.
    #[must_use]
    pub fn next_id(&self) -> RecordId {
        RecordId(self.inner.next_id.get())
    }

    /// Number of structural changes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Register a callback invoked with the new snapshot after each
    /// structural change. Dropping the returned [`Subscription`]
    /// unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&[Record]) + 'static) -> Subscription {
        self.inner
            .notifier
            .subscribe(Box::new(move |records: &Vec<Record>| callback(records.as_slice())))
    }

    /// Remove a subscription. Idempotent.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.inner.notifier.unsubscribe(subscription);
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.notifier.subscriber_count()
    }

    /// Drain subscriber failures recorded under [`PanicPolicy::Log`].
    pub fn take_failures(&self) -> Vec<SubscriberPanic> {
        self.inner.notifier.take_failures()
    }

    fn commit(&self) {
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        let snapshot = self.snapshot();
        debug!(version, len = snapshot.len(), "list changed");
        self.inner.notifier.notify(snapshot);
    }
}

/// Counter value after handing out `id`.
fn allocate_after(id: u64) -> u64 {
    match id.checked_add(1) {
        Some(next) => next,
        None => panic!("{}", ListError::IdSpaceExhausted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(list: &ObservableList) -> Vec<String> {
        list.snapshot().into_iter().map(Record::into_text).collect()
    }

    #[test]
    fn tutorial_scenario() {
        let list = ObservableList::new();
        assert_eq!(list.append("Learn HTML").id(), RecordId::new(0));
        assert_eq!(list.append("Learn JavaScript").id(), RecordId::new(1));
        assert_eq!(list.append("Learn Vue").id(), RecordId::new(2));

        assert!(list.remove_by_id(RecordId::new(1)));
        assert_eq!(
            list.snapshot(),
            vec![
                Record::new(RecordId::new(0), "Learn HTML"),
                Record::new(RecordId::new(2), "Learn Vue"),
            ]
        );
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let list = ObservableList::new();
        let a = list.append("a");
        assert!(list.remove_by_id(a.id()));
        let b = list.append("b");
        assert_eq!(b.id(), RecordId::new(1));
    }

    #[test]
    fn remove_twice_returns_false() {
        let list = ObservableList::new();
        let r = list.append("x");
        assert!(list.remove_by_id(r.id()));
        assert!(!list.remove_by_id(r.id()));
        assert!(!list.remove_by_id(RecordId::new(99)));
    }

    #[test]
    fn remove_matches_id_not_text() {
        let list = ObservableList::new();
        let first = list.append("same");
        let second = list.append("same");
        assert_ne!(first.id(), second.id());

        assert!(list.remove_by_id(second.id()));
        assert_eq!(list.snapshot(), vec![first]);
    }

    #[test]
    fn empty_text_is_accepted() {
        let list = ObservableList::new();
        let r = list.append("");
        assert_eq!(r.text(), "");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn first_id_is_configurable() {
        let list = ObservableList::with_config(ListConfig::new().with_first_id(10));
        assert_eq!(list.next_id(), RecordId::new(10));
        assert_eq!(list.append("a").id(), RecordId::new(10));
        assert_eq!(list.append("b").id(), RecordId::new(11));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let list = ObservableList::new();
        list.append("a");
        let mut snap = list.snapshot();
        snap.clear();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn notifications_carry_post_mutation_snapshot() {
        let list = ObservableList::new();
        let seen = Rc::new(RefCell::new(Vec::<Vec<String>>::new()));
        let sink = Rc::clone(&seen);
        let _sub = list.subscribe(move |records| {
            sink.borrow_mut()
                .push(records.iter().map(|r| r.text().to_string()).collect());
        });

        let a = list.append("a");
        list.append("b");
        list.remove_by_id(a.id());
        list.remove_by_id(a.id());

        assert_eq!(
            *seen.borrow(),
            vec![
                vec!["a".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["b".to_string()],
            ]
        );
        assert_eq!(list.version(), 3);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let list = ObservableList::new();
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let sub = list.subscribe(move |_| c.set(c.get() + 1));

        list.append("a");
        list.unsubscribe(&sub);
        list.unsubscribe(&sub);
        list.append("b");

        assert_eq!(count.get(), 1);
        assert_eq!(list.subscriber_count(), 0);
    }

    #[test]
    fn seeded_list_allocates_in_order() {
        let list = ObservableList::seeded(
            ListConfig::default(),
            ["Learn HTML", "Learn JavaScript", "Learn Vue"],
        );
        assert_eq!(list.version(), 0);
        assert_eq!(list.next_id(), RecordId::new(3));
        assert_eq!(
            texts(&list),
            vec!["Learn HTML", "Learn JavaScript", "Learn Vue"]
        );
        assert_eq!(
            list.get(RecordId::new(1)).map(Record::into_text).as_deref(),
            Some("Learn JavaScript")
        );
    }

    #[test]
    fn seeded_up_to_the_last_id() {
        let list = ObservableList::seeded(
            ListConfig::new().with_first_id(u64::MAX - 2),
            ["a", "b"],
        );
        let ids: Vec<u64> = list.snapshot().iter().map(|r| r.id().get()).collect();
        assert_eq!(ids, vec![u64::MAX - 2, u64::MAX - 1]);
        assert_eq!(list.next_id(), RecordId::new(u64::MAX));
    }

    #[test]
    #[should_panic(expected = "record id space exhausted")]
    fn seeded_past_the_id_space_panics() {
        let _ = ObservableList::seeded(
            ListConfig::new().with_first_id(u64::MAX - 1),
            ["a", "b"],
        );
    }

    #[test]
    #[should_panic(expected = "record id space exhausted")]
    fn append_after_seeding_the_last_id_panics() {
        let list = ObservableList::seeded(ListConfig::new().with_first_id(u64::MAX - 1), ["a"]);
        assert_eq!(list.next_id(), RecordId::new(u64::MAX));
        list.append("b");
    }

    #[test]
    fn from_records_resumes_counter() {
        let list = ObservableList::from_records(
            vec![
                Record::new(RecordId::new(4), "d"),
                Record::new(RecordId::new(1), "a"),
            ],
            ListConfig::default(),
        )
        .expect("valid records");
        assert_eq!(list.next_id(), RecordId::new(5));
        assert_eq!(list.append("e").id(), RecordId::new(5));

        let empty = ObservableList::from_records(Vec::new(), ListConfig::new().with_first_id(7))
            .expect("empty restore");
        assert_eq!(empty.next_id(), RecordId::new(7));
    }

    #[test]
    fn from_records_rejects_duplicates() {
        let err = ObservableList::from_records(
            vec![
                Record::new(RecordId::new(2), "a"),
                Record::new(RecordId::new(2), "b"),
            ],
            ListConfig::default(),
        )
        .expect_err("duplicate id");
        assert_eq!(err, ListError::DuplicateId(RecordId::new(2)));
        assert_eq!(err.to_string(), "duplicate record id 2");
    }

    #[test]
    fn from_records_rejects_max_id() {
        let err = ObservableList::from_records(
            vec![Record::new(RecordId::new(u64::MAX), "last")],
            ListConfig::default(),
        )
        .expect_err("no room left");
        assert_eq!(err, ListError::IdSpaceExhausted);
    }

    #[test]
    fn contains_and_is_empty() {
        let list = ObservableList::new();
        assert!(list.is_empty());
        let r = list.append("a");
        assert!(list.contains(r.id()));
        assert!(!list.contains(RecordId::new(5)));
        assert_eq!(list.with_records(|rs| rs.len()), 1);
    }

    #[test]
    fn clone_shares_counter() {
        let a = ObservableList::new();
        let b = a.clone();
        a.append("x");
        assert_eq!(b.append("y").id(), RecordId::new(1));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn independent_lists_have_independent_counters() {
        let a = ObservableList::new();
        let b = ObservableList::new();
        a.append("x");
        a.append("y");
        assert_eq!(b.append("z").id(), RecordId::new(0));
    }

    #[test]
    fn reentrant_append_from_subscriber_is_deferred() {
        let list = ObservableList::new();
        let lens = Rc::new(RefCell::new(Vec::new()));

        let handle = list.clone();
        let l = Rc::clone(&lens);
        let _sub = list.subscribe(move |records| {
            l.borrow_mut().push(records.len());
            if records.len() == 1 {
                handle.append("follow-up");
            }
        });

        list.append("first");

        assert_eq!(*lens.borrow(), vec![1, 2]);
        assert_eq!(list.version(), 2);
    }

    #[test]
    fn display_impls() {
        assert_eq!(RecordId::from(3).to_string(), "3");
        assert_eq!(ListError::IdSpaceExhausted.to_string(), "record id space exhausted");
    }
}
