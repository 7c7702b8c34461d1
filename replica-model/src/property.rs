//! Property declarations.
//!
//! A declaration is plain configuration data: an optional type tag, an
//! optional default, get/set transforms, observer wiring, sync and
//! visibility flags. The instance constructor consumes these generically —
//! there is no per-property code.

use std::rc::Rc;

use crate::bus::ChangeEvent;
use crate::definition::Definition;
use crate::instance::Instance;
use crate::kind::PropertyKind;
use crate::value::Value;

/// A get/set transform between stored and exposed values.
pub type Transform = Rc<dyn Fn(Value) -> Value>;

/// An observer bound to an instance, fired when a watched property changes.
pub type Observer = Rc<dyn Fn(&Instance, &ChangeEvent)>;

/// The default seeded into the store when a property is materialized.
#[derive(Clone)]
pub enum DefaultValue {
    /// A JSON default, cloned per instance.
    Value(serde_json::Value),
    /// A fresh empty collection of the given child definition, scoped to the
    /// owning instance. Never shared between instances.
    EmptyCollection(Definition),
}

/// A named, typed, observable property declaration.
#[derive(Clone)]
pub struct PropertySpec {
    /// Declared type; `None` leaves the property unchecked.
    pub kind: Option<PropertyKind>,

    /// Default seeded at materialization time, through the set transform.
    pub default: Option<DefaultValue>,

    /// Whether assignments broadcast a sync event.
    pub sync: bool,

    /// Transform applied on read, stored → exposed.
    pub get: Option<Transform>,

    /// Transform applied on write, input → stored.
    pub set: Option<Transform>,

    /// Observers keyed by the property name they watch.
    pub watch: Vec<(String, Observer)>,

    /// Whether the property participates in serialization and generic
    /// population. Built-ins and relationship accessors are hidden.
    pub enumerable: bool,
}

impl PropertySpec {
    fn with_kind(kind: Option<PropertyKind>) -> Self {
        Self {
            kind,
            default: None,
            sync: false,
            get: None,
            set: None,
            watch: Vec::new(),
            enumerable: true,
        }
    }

    /// A property with no declared type.
    #[must_use]
    pub fn untyped() -> Self {
        Self::with_kind(None)
    }

    /// A string-typed property.
    #[must_use]
    pub fn string() -> Self {
        Self::with_kind(Some(PropertyKind::String))
    }

    /// A number-typed property.
    #[must_use]
    pub fn number() -> Self {
        Self::with_kind(Some(PropertyKind::Number))
    }

    /// A boolean-typed property.
    #[must_use]
    pub fn boolean() -> Self {
        Self::with_kind(Some(PropertyKind::Boolean))
    }

    /// An array-typed property.
    #[must_use]
    pub fn array() -> Self {
        Self::with_kind(Some(PropertyKind::Array))
    }

    /// A property holding a nested instance of `definition`.
    #[must_use]
    pub fn model(definition: Definition) -> Self {
        Self::with_kind(Some(PropertyKind::Model(definition)))
    }

    /// Enables sync broadcasting for this property.
    #[must_use]
    pub fn synced(mut self) -> Self {
        self.sync = true;
        self
    }

    /// Sets a JSON default value.
    #[must_use]
    pub fn default_value(mut self, default: serde_json::Value) -> Self {
        self.default = Some(DefaultValue::Value(default));
        self
    }

    /// Excludes the property from serialization and generic population.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.enumerable = false;
        self
    }

    /// Installs a read transform.
    #[must_use]
    pub fn with_get(mut self, get: impl Fn(Value) -> Value + 'static) -> Self {
        self.get = Some(Rc::new(get));
        self
    }

    /// Installs a write transform.
    #[must_use]
    pub fn with_set(mut self, set: impl Fn(Value) -> Value + 'static) -> Self {
        self.set = Some(Rc::new(set));
        self
    }

    /// Subscribes `observer` to change events of `watched` on the owning
    /// instance. The observer may assign back into the declaring property;
    /// convergence of cyclic observer graphs is the caller's responsibility.
    #[must_use]
    pub fn watch(
        mut self,
        watched: impl Into<String>,
        observer: impl Fn(&Instance, &ChangeEvent) + 'static,
    ) -> Self {
        self.watch.push((watched.into(), Rc::new(observer)));
        self
    }

    /// Runs the write transform, identity when none is declared.
    #[must_use]
    pub(crate) fn apply_set(&self, value: Value) -> Value {
        match &self.set {
            Some(set) => set(value),
            None => value,
        }
    }

    /// Runs the read transform, identity when none is declared.
    #[must_use]
    pub(crate) fn apply_get(&self, value: Value) -> Value {
        match &self.get {
            Some(get) => get(value),
            None => value,
        }
    }
}

impl std::fmt::Debug for PropertySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySpec")
            .field("kind", &self.kind)
            .field("sync", &self.sync)
            .field("enumerable", &self.enumerable)
            .field("watch", &self.watch.iter().map(|(w, _)| w).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
