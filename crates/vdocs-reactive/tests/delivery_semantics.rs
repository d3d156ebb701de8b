//! Integration tests for notification delivery: panic policies, re-entrant
//! mutation ordering and subscription lifetimes across cells and lists.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{Level, info};
use vdocs_reactive::{
    CellConfig, ListConfig, ObservableCell, ObservableList, PanicPolicy, Record, RecordId,
    panic_message,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn panicking_list_subscriber_does_not_starve_others() {
    init_tracing();
    let list = ObservableList::new();
    let log = new_log();

    let l1 = Rc::clone(&log);
    let _first = list.subscribe(move |records| {
        l1.borrow_mut().push(format!("first:{}", records.len()));
    });
    let _bad = list.subscribe(|_| panic!("render failed"));
    let l3 = Rc::clone(&log);
    let _third = list.subscribe(move |records| {
        l3.borrow_mut().push(format!("third:{}", records.len()));
    });

    let result = panic::catch_unwind(AssertUnwindSafe(|| list.append("Learn Vue")));

    let payload = result.expect_err("subscriber panic resumed");
    assert_eq!(panic_message(payload.as_ref()), "render failed");
    assert_eq!(*log.borrow(), vec!["first:1", "third:1"]);
    // The mutation itself was applied before delivery.
    assert_eq!(list.len(), 1);
    info!(failures = 1, "propagate policy verified");
}

#[test]
fn log_policy_returns_normally_and_records_every_failure() {
    init_tracing();
    let list = ObservableList::with_config(ListConfig::new().with_panic_policy(PanicPolicy::Log));
    let _a = list.subscribe(|_| panic!("a"));
    let _b = list.subscribe(|_| panic::panic_any(String::from("b")));

    let record = list.append("x");
    assert!(list.remove_by_id(record.id()));

    let failures = list.take_failures();
    let messages: Vec<&str> = failures.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "b", "a", "b"]);
}

#[test]
fn nested_mutations_are_delivered_in_mutation_order() {
    init_tracing();
    let cell = ObservableCell::new(String::from("Hello World!"));
    let log = new_log();

    let handle = cell.clone();
    let l1 = Rc::clone(&log);
    let _reverser = cell.subscribe(move |value: &String| {
        l1.borrow_mut().push(format!("r:{value}"));
        if value == "Hello World!" {
            handle.update(|v| *v = v.chars().rev().collect());
        }
    });
    let l2 = Rc::clone(&log);
    let _observer =
        cell.subscribe(move |value: &String| l2.borrow_mut().push(format!("o:{value}")));

    cell.set(String::from("Hello World!"));

    assert_eq!(
        *log.borrow(),
        vec![
            "r:Hello World!",
            "o:Hello World!",
            "r:!dlroW olleH",
            "o:!dlroW olleH",
        ]
    );
    assert_eq!(cell.version(), 2);
}

#[test]
fn subscriber_added_during_delivery_sees_only_later_mutations() {
    init_tracing();
    let list = ObservableList::new();
    let log = new_log();
    let late: Rc<RefCell<Option<vdocs_reactive::Subscription>>> = Rc::new(RefCell::new(None));

    let handle = list.clone();
    let slot = Rc::clone(&late);
    let l = Rc::clone(&log);
    let _installer = list.subscribe(move |_| {
        if slot.borrow().is_none() {
            let l = Rc::clone(&l);
            let sub = handle.subscribe(move |records| {
                l.borrow_mut().push(format!("late:{}", records.len()));
            });
            *slot.borrow_mut() = Some(sub);
        }
    });

    list.append("a");
    assert!(log.borrow().is_empty());

    list.append("b");
    assert_eq!(*log.borrow(), vec!["late:2"]);
}

#[test]
fn unsubscribe_during_delivery_skips_pending_callbacks() {
    init_tracing();
    let cell = ObservableCell::new(0);
    let log = new_log();
    let victim: Rc<RefCell<Option<vdocs_reactive::Subscription>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&victim);
    let _killer = cell.subscribe(move |_| {
        if let Some(sub) = slot.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    let l = Rc::clone(&log);
    *victim.borrow_mut() = Some(cell.subscribe(move |v: &i32| l.borrow_mut().push(v.to_string())));

    cell.set(1);
    cell.set(2);

    assert!(log.borrow().is_empty());
    assert_eq!(cell.subscriber_count(), 1);
}

#[test]
fn cell_config_defaults_to_propagate() {
    assert_eq!(CellConfig::default().panic_policy, PanicPolicy::Propagate);
    let cfg = ListConfig::default();
    assert_eq!(cfg.first_id, 0);
    assert_eq!(cfg.panic_policy, PanicPolicy::Propagate);
}

#[test]
fn restored_list_continues_numbering() {
    let original = ObservableList::new();
    for text in ["Learn HTML", "Learn JavaScript", "Learn Vue"] {
        original.append(text);
    }
    assert!(original.remove_by_id(RecordId::new(1)));

    let restored = ObservableList::from_records(original.snapshot(), ListConfig::default())
        .expect("snapshot ids are unique");
    let next = restored.append("Build something");
    assert_eq!(next.id(), RecordId::new(3));
    assert_eq!(
        restored.get(RecordId::new(0)),
        Some(Record::new(RecordId::new(0), "Learn HTML"))
    );
}
