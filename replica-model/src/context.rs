//! The shared context instances are constructed against.
//!
//! Bundles the three external collaborators — event bus, registry, id
//! generator — into one cheaply cloneable handle. Everything is injected;
//! there is no ambient global state, so isolated tests can run each against
//! their own context.

use std::rc::Rc;

use replica_types::{IdGenerator, UuidIdGenerator};

use crate::bus::EventBus;
use crate::registry::Registry;

/// Shared handles for one replica: bus, registry, id generation.
#[derive(Clone)]
pub struct Context {
    bus: EventBus,
    registry: Registry,
    ids: Rc<dyn IdGenerator>,
}

impl Context {
    /// Creates a context with a fresh bus, a fresh registry, and UUID ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(UuidIdGenerator)
    }

    /// Creates a context with a custom id generator.
    #[must_use]
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            bus: EventBus::new(),
            registry: Registry::new(),
            ids: Rc::new(ids),
        }
    }

    /// The shared event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The registry of live instances.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Generates a fresh instance id.
    #[must_use]
    pub fn generate_id(&self) -> String {
        self.ids.generate_id()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("bus", &self.bus)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
