use std::cell::Cell;
use std::rc::Rc;

use replica_model::{BusPayload, EventBus};
use replica_types::SyncEvent;
use serde_json::json;

fn sync_payload() -> BusPayload {
    BusPayload::Sync(SyncEvent::new("id", "prop", json!(1)))
}

#[test]
fn listeners_receive_events_in_subscription_order() {
    let bus = EventBus::new();
    let order: Rc<Cell<u32>> = Rc::new(Cell::new(0));

    let first = Rc::clone(&order);
    bus.on("ping", move |_| {
        assert_eq!(first.get(), 0);
        first.set(1);
    });
    let second = Rc::clone(&order);
    bus.on("ping", move |_| {
        assert_eq!(second.get(), 1);
        second.set(2);
    });

    bus.emit("ping", &sync_payload());
    assert_eq!(order.get(), 2);
}

#[test]
fn events_are_scoped_by_name() {
    let bus = EventBus::new();
    let count: Rc<Cell<u32>> = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    bus.on("ping", move |_| counter.set(counter.get() + 1));

    bus.emit("pong", &sync_payload());
    assert_eq!(count.get(), 0);

    bus.emit("ping", &sync_payload());
    assert_eq!(count.get(), 1);
}

#[test]
fn removed_listeners_stop_receiving() {
    let bus = EventBus::new();
    let count: Rc<Cell<u32>> = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let subscription = bus.on("ping", move |_| counter.set(counter.get() + 1));

    bus.emit("ping", &sync_payload());
    assert!(bus.remove_listener("ping", subscription));
    bus.emit("ping", &sync_payload());

    assert_eq!(count.get(), 1);
    assert_eq!(bus.listener_count("ping"), 0);
    // Removing twice reports the listener is gone.
    assert!(!bus.remove_listener("ping", subscription));
}

#[test]
fn listeners_may_subscribe_reentrantly() {
    let bus = EventBus::new();
    let count: Rc<Cell<u32>> = Rc::new(Cell::new(0));

    let reentrant = bus.clone();
    let counter = Rc::clone(&count);
    bus.on("ping", move |_| {
        let inner_counter = Rc::clone(&counter);
        reentrant.on("ping", move |_| inner_counter.set(inner_counter.get() + 1));
    });

    // The snapshot taken at dispatch time excludes listeners added during it.
    bus.emit("ping", &sync_payload());
    assert_eq!(count.get(), 0);
    assert_eq!(bus.listener_count("ping"), 2);

    bus.emit("ping", &sync_payload());
    assert_eq!(count.get(), 1);
}

#[test]
fn listeners_may_emit_reentrantly() {
    let bus = EventBus::new();
    let count: Rc<Cell<u32>> = Rc::new(Cell::new(0));

    let chained = bus.clone();
    bus.on("first", move |payload| {
        chained.emit("second", payload);
    });
    let counter = Rc::clone(&count);
    bus.on("second", move |_| counter.set(counter.get() + 1));

    bus.emit("first", &sync_payload());
    assert_eq!(count.get(), 1);
}
