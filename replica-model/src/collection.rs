//! The ordered collection backing a has-many relationship.
//!
//! A collection is a shared handle: clones observe the same membership. Each
//! parent instance gets its own collection, keyed by the parent id and the
//! relationship name, so two parents never share one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::definition::Definition;
use crate::instance::Instance;

struct CollectionInner {
    id: String,
    kind: Definition,
    items: RefCell<Vec<Instance>>,
}

/// An ordered collection of child instances, all of one definition.
#[derive(Clone)]
pub struct Collection {
    inner: Rc<CollectionInner>,
}

impl Collection {
    /// Creates an empty collection of `kind`, identified by `id`.
    #[must_use]
    pub fn new(kind: Definition, id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(CollectionInner {
                id: id.into(),
                kind,
                items: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The collection's id (parent id + relationship name).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The child definition all members belong to.
    #[must_use]
    pub fn kind(&self) -> &Definition {
        &self.inner.kind
    }

    /// Appends an item, preserving insertion order.
    pub fn add(&self, item: Instance) {
        self.inner.items.borrow_mut().push(item);
    }

    /// Removes an item by identity. Returns whether it was present.
    pub fn remove(&self, item: &Instance) -> bool {
        let mut items = self.inner.items.borrow_mut();
        match items.iter().position(|member| member.same(item)) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// A snapshot of the members, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<Instance> {
        self.inner.items.borrow().clone()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// True when the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Handle identity: whether two handles refer to one collection.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind.name())
            .field("len", &self.len())
            .finish()
    }
}
