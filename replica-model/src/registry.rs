//! The process-wide registry of live instances.
//!
//! The registry holds weak, lookup-only associations: it never extends an
//! instance's lifetime. Entries whose instance has been dropped are pruned
//! lazily on access. `flush` is the test/reset hook.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::instance::{Instance, WeakInstance};

#[derive(Default)]
struct RegistryInner {
    instances: HashMap<String, WeakInstance>,
}

/// Tracks live instances by id for sync lookup.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance under its id.
    pub fn add(&self, instance: &Instance) {
        self.inner
            .borrow_mut()
            .instances
            .insert(instance.id().to_string(), instance.downgrade());
    }

    /// Removes an instance. Returns whether it was registered.
    pub fn remove(&self, instance: &Instance) -> bool {
        self.inner
            .borrow_mut()
            .instances
            .remove(instance.id())
            .is_some()
    }

    /// Looks up a live instance by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Instance> {
        let mut inner = self.inner.borrow_mut();
        match inner.instances.get(id).and_then(WeakInstance::upgrade) {
            Some(instance) => Some(instance),
            None => {
                inner.instances.remove(id);
                None
            }
        }
    }

    /// Number of registered instances still alive.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner
            .instances
            .retain(|_, instance| instance.upgrade().is_some());
        inner.instances.len()
    }

    /// True when no live instance is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every association.
    pub fn flush(&self) {
        self.inner.borrow_mut().instances.clear();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.inner.borrow().instances.len())
            .finish()
    }
}
