//! The shared event bus.
//!
//! An explicit, injectable pub/sub channel. Event names are strings: each
//! property's local change events are published under the property name,
//! every definition's edit event under its configured name, and sync events
//! under [`SYNC_EVENT`]. Dispatch is synchronous and run-to-completion; the
//! listener list is snapshotted before dispatch, so listeners may emit or
//! subscribe reentrantly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use replica_types::SyncEvent;

use crate::instance::Instance;
use crate::value::Value;

/// A local notification that one property of one instance changed.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The property that changed.
    pub name: String,
    /// The stored (post-transform) value.
    pub value: Value,
    /// The instance that changed.
    pub model: Instance,
}

/// Emitted under a definition's edit-event name when `edit` becomes true.
#[derive(Debug, Clone)]
pub struct EditEvent {
    /// The instance that entered edit mode.
    pub model: Instance,
}

/// What travels on the bus.
#[derive(Debug, Clone)]
pub enum BusPayload {
    /// A local property change.
    Change(ChangeEvent),
    /// An instance entered edit mode.
    Edit(EditEvent),
    /// An outbound replication notification.
    Sync(SyncEvent),
}

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Listener {
    id: SubscriptionId,
    callback: Rc<dyn Fn(&BusPayload)>,
}

#[derive(Default)]
struct BusInner {
    listeners: HashMap<String, Vec<Listener>>,
    next_id: u64,
}

/// A synchronous, process-local pub/sub channel.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `listener` to events published under `event`.
    pub fn on(
        &self,
        event: impl Into<String>,
        listener: impl Fn(&BusPayload) + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.entry(event.into()).or_default().push(Listener {
            id,
            callback: Rc::new(listener),
        });
        id
    }

    /// Removes a listener. Returns whether it was subscribed.
    pub fn remove_listener(&self, event: &str, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.listeners.get_mut(event) {
            Some(listeners) => {
                let before = listeners.len();
                listeners.retain(|listener| listener.id != id);
                listeners.len() != before
            }
            None => false,
        }
    }

    /// Publishes `payload` to every listener of `event`, in subscription
    /// order, within the caller's turn.
    pub fn emit(&self, event: &str, payload: &BusPayload) {
        let snapshot: Vec<Rc<dyn Fn(&BusPayload)>> = {
            let inner = self.inner.borrow();
            match inner.listeners.get(event) {
                Some(listeners) => listeners
                    .iter()
                    .map(|listener| Rc::clone(&listener.callback))
                    .collect(),
                None => return,
            }
        };
        for callback in snapshot {
            callback(payload);
        }
    }

    /// Number of listeners currently subscribed to `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("events", &inner.listeners.len())
            .finish()
    }
}
