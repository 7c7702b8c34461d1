//! Live instances and the instance constructor.
//!
//! An instance is a shared handle over a private layered store, built from a
//! definition plus raw JSON data. Mutation flows through the write pipeline:
//! transform, enforce, layer into the store, emit the local change event,
//! then conditionally emit a sync event. That sequence is strict and never
//! reordered within a single write.
//!
//! Construction materializes every accessor before applying any raw value,
//! and aggregates per-field and per-child failures into one error instead of
//! short-circuiting — a caller validating a bulk import sees every offending
//! field in one report.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use replica_types::{SYNC_EVENT, SyncEvent};
use tracing::debug;

use crate::bus::{BusPayload, ChangeEvent, EditEvent};
use crate::collection::Collection;
use crate::context::Context;
use crate::definition::Definition;
use crate::error::{FieldError, ModelError, ModelResult, TypeViolation};
use crate::kind::enforce;
use crate::property::{DefaultValue, Observer, PropertySpec};
use crate::store::LayeredStore;
use crate::value::Value;

pub(crate) struct InstanceInner {
    id: String,
    definition: Definition,
    context: Context,
    store: RefCell<LayeredStore>,
    /// True only while an inbound sync event is being applied.
    drop_sync: Cell<bool>,
}

/// A live, typed, observable record.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<InstanceInner>,
}

/// A non-owning handle to an instance, used by the registry and by observer
/// closures so neither extends the instance's lifetime.
#[derive(Clone)]
pub struct WeakInstance(Weak<InstanceInner>);

impl WeakInstance {
    /// The instance, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Instance> {
        self.0.upgrade().map(|inner| Instance { inner })
    }
}

/// Suspends outbound sync emission for the instance until dropped.
///
/// Raised by the reconciler while applying an inbound sync event; restoring
/// on drop guarantees the flag is cleared on every exit path.
pub struct SyncSuspension {
    inner: Rc<InstanceInner>,
    previous: bool,
}

impl Drop for SyncSuspension {
    fn drop(&mut self) {
        self.inner.drop_sync.set(self.previous);
    }
}

// Backing declarations for relationship accessors. Synthesized on demand:
// relationships live in their own schema dictionaries, not in `properties`.

fn has_many_backing(child: &Definition) -> PropertySpec {
    let mut spec = PropertySpec::array().hidden();
    spec.default = Some(DefaultValue::EmptyCollection(child.clone()));
    spec
}

fn has_one_backing(child: &Definition) -> PropertySpec {
    PropertySpec::model(child.clone()).hidden()
}

impl Definition {
    /// Constructs an instance of this definition from raw JSON data.
    ///
    /// Raw data must be a JSON object (or null, treated as empty). A missing
    /// `id` is generated; a present one is kept. Every field or child that
    /// fails validation is collected, and the construction fails once with
    /// the aggregate — the instance is registered only on full success.
    pub fn create(&self, context: &Context, raw: serde_json::Value) -> ModelResult<Instance> {
        let record = match raw {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => return Err(ModelError::RecordExpected(other)),
        };

        let mut errors: Vec<FieldError> = Vec::new();

        // Id first: has-many collections derive their ids from it.
        let id = match record.get("id") {
            None => context.generate_id(),
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(other) => {
                errors.push(FieldError {
                    field: "id".to_string(),
                    source: TypeViolation {
                        expected: "string".to_string(),
                        value: other.clone(),
                    }
                    .into(),
                });
                context.generate_id()
            }
        };

        let instance = Instance {
            inner: Rc::new(InstanceInner {
                id,
                definition: self.clone(),
                context: context.clone(),
                store: RefCell::new(LayeredStore::new()),
                drop_sync: Cell::new(false),
            }),
        };

        // Materialize every accessor before applying any raw value: wire all
        // observers, then seed defaults, then relationship backing state.
        for spec in self.properties().values() {
            for (watched, observer) in &spec.watch {
                instance.observe(watched, observer);
            }
        }
        for (name, spec) in self.properties() {
            instance.seed_default(name, spec);
        }
        for (name, child) in self.has_many() {
            instance.seed_default(name, &has_many_backing(child));
        }

        // Apply raw values for every enumerable declared property.
        for (name, spec) in self.properties() {
            if !spec.enumerable {
                continue;
            }
            if let Some(data) = record.get(name) {
                if let Err(source) = instance.set(name, Value::Data(data.clone())) {
                    errors.push(FieldError {
                        field: name.clone(),
                        source,
                    });
                }
            }
        }

        // Populate has-one children: raw data instantiates transparently.
        for name in self.has_one().keys() {
            if let Some(data) = record.get(name) {
                if let Err(source) = instance.set(name, Value::Data(data.clone())) {
                    errors.push(FieldError {
                        field: name.clone(),
                        source,
                    });
                }
            }
        }

        // Populate has-many children: one failing child record does not
        // abort its siblings.
        for (name, child) in self.has_many() {
            let Some(data) = record.get(name) else {
                continue;
            };
            let serde_json::Value::Array(items) = data else {
                errors.push(FieldError {
                    field: name.clone(),
                    source: TypeViolation {
                        expected: "array".to_string(),
                        value: data.clone(),
                    }
                    .into(),
                });
                continue;
            };
            if let Some(collection) = instance.children(name) {
                for (index, item) in items.iter().enumerate() {
                    match child.create(context, item.clone()) {
                        Ok(member) => collection.add(member),
                        Err(source) => errors.push(FieldError {
                            field: format!("{name}[{index}]"),
                            source,
                        }),
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(ModelError::Construction {
                definition: self.name().to_string(),
                errors,
            });
        }

        context.registry().add(&instance);
        debug!(model = self.name(), id = instance.id(), "constructed instance");
        Ok(instance)
    }
}

impl Instance {
    /// The instance's id, fixed at construction.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The definition this instance was constructed from.
    #[must_use]
    pub fn definition(&self) -> &Definition {
        &self.inner.definition
    }

    /// The context the instance emits into.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    /// Handle identity: whether two handles refer to one instance.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// A non-owning handle to this instance.
    #[must_use]
    pub fn downgrade(&self) -> WeakInstance {
        WeakInstance(Rc::downgrade(&self.inner))
    }

    /// Reads a property through its declared get transform.
    ///
    /// Returns [`Value::Absent`] for never-written and unknown names.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        let stored = self
            .inner
            .store
            .borrow()
            .current(name)
            .cloned()
            .unwrap_or(Value::Absent);
        match self.inner.definition.property(name) {
            Some(spec) => spec.apply_get(stored),
            None => stored,
        }
    }

    /// The property as an owned string, if it is one.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<String> {
        self.get(name).as_str().map(str::to_string)
    }

    /// The property as a boolean, if it is one.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).as_bool()
    }

    /// The property as a float, if it is numeric.
    #[must_use]
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).as_f64()
    }

    /// Whether the instance is in edit mode.
    #[must_use]
    pub fn edit(&self) -> bool {
        self.get_bool("edit").unwrap_or(false)
    }

    /// Enters or leaves edit mode. Entering announces the definition's edit
    /// event; `locked` mirrors the new state either way.
    pub fn set_edit(&self, editing: bool) -> ModelResult<()> {
        self.set("edit", editing)
    }

    /// Whether the instance is locked (here or on another replica).
    #[must_use]
    pub fn locked(&self) -> bool {
        self.get_bool("locked").unwrap_or(false)
    }

    /// The has-many collection for `name`, once materialized.
    #[must_use]
    pub fn children(&self, name: &str) -> Option<Collection> {
        self.get(name).as_collection().cloned()
    }

    /// The has-one child for `name`, if assigned.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<Instance> {
        self.get(name).as_model().cloned()
    }

    /// Number of value frames layered for `name`.
    #[must_use]
    pub fn revisions(&self, name: &str) -> usize {
        self.inner.store.borrow().depth(name)
    }

    /// Assigns a declared property or relationship through the write
    /// pipeline.
    ///
    /// On a type violation the assignment fails and no state changes. An
    /// absent (or null) value always passes — that is how a typed property
    /// is cleared.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ModelResult<()> {
        self.assign(name, value.into())
    }

    fn assign(&self, name: &str, value: Value) -> ModelResult<()> {
        let definition = self.inner.definition.clone();
        if let Some(spec) = definition.property(name) {
            return self.write(name, spec, value);
        }
        if let Some(child) = definition.has_one_definition(name) {
            // Raw data assigned to a has-one accessor instantiates
            // transparently before enforcement.
            let value = match value {
                Value::Data(data) if !data.is_null() => {
                    Value::Model(child.create(&self.inner.context, data)?)
                }
                other => other,
            };
            return self.write(name, &has_one_backing(child), value);
        }
        if let Some(child) = definition.has_many_definition(name) {
            return self.write(name, &has_many_backing(child), value);
        }
        Err(ModelError::UnknownProperty(name.to_string()))
    }

    /// The write pipeline: transform, enforce, layer, local event, sync.
    fn write(&self, name: &str, spec: &PropertySpec, value: Value) -> ModelResult<()> {
        let transformed = spec.apply_set(value);

        if let Some(kind) = &spec.kind {
            if !transformed.is_absent() {
                enforce(kind, &transformed)?;
            }
        }

        self.inner
            .store
            .borrow_mut()
            .layer(name, transformed.clone());

        let change = ChangeEvent {
            name: name.to_string(),
            value: transformed.clone(),
            model: self.clone(),
        };
        self.inner.context.bus().emit(name, &BusPayload::Change(change));

        if spec.sync && !self.inner.drop_sync.get() {
            let event = SyncEvent::new(self.id(), name, transformed.to_json());
            self.inner
                .context
                .bus()
                .emit(SYNC_EVENT, &BusPayload::Sync(event));
        }

        Ok(())
    }

    /// Announces the definition's edit event for this instance.
    pub fn emit_edit(&self) {
        let event = EditEvent {
            model: self.clone(),
        };
        self.inner
            .context
            .bus()
            .emit(self.inner.definition.edit_event(), &BusPayload::Edit(event));
    }

    /// Suspends outbound sync emission until the returned guard drops.
    #[must_use]
    pub fn suspend_sync(&self) -> SyncSuspension {
        let previous = self.inner.drop_sync.get();
        self.inner.drop_sync.set(true);
        SyncSuspension {
            inner: Rc::clone(&self.inner),
            previous,
        }
    }

    /// Seeds a declared default into the store, through the set transform.
    /// Collection defaults get a fresh collection scoped to this instance.
    fn seed_default(&self, name: &str, spec: &PropertySpec) {
        let Some(default) = &spec.default else {
            return;
        };
        let value = match default {
            DefaultValue::Value(data) => spec.apply_set(Value::Data(data.clone())),
            DefaultValue::EmptyCollection(child) => Value::Collection(Collection::new(
                child.clone(),
                format!("{}-{}", self.id(), name),
            )),
        };
        self.inner.store.borrow_mut().layer(name, value);
    }

    /// Subscribes `observer` to change events of `watched` on this instance.
    /// The subscription holds only a weak back-edge.
    fn observe(&self, watched: &str, observer: &Observer) {
        let weak = self.downgrade();
        let observer = Rc::clone(observer);
        self.inner.context.bus().on(watched, move |payload| {
            let BusPayload::Change(event) = payload else {
                return;
            };
            let Some(instance) = weak.upgrade() else {
                return;
            };
            if !event.model.same(&instance) {
                return;
            }
            observer(&instance, event);
        });
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.inner.id)
            .field("definition", &self.inner.definition.name())
            .finish()
    }
}
