//! Model definitions and schema composition.
//!
//! A definition is a named, immutable schema: three independent dictionaries
//! (properties, has-many, has-one) plus a constant edit-event name. Deriving
//! a definition from a base merges each dictionary once, at build time —
//! entries declared on the derived definition shadow same-named inherited
//! entries, everything else stays visible, and the base is never mutated.
//! There is no runtime inheritance walking: instances see only the merged
//! result.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::warn;

use crate::property::PropertySpec;

pub(crate) struct DefinitionInner {
    name: String,
    edit_event: String,
    properties: BTreeMap<String, PropertySpec>,
    has_many: BTreeMap<String, Definition>,
    has_one: BTreeMap<String, Definition>,
}

/// An immutable, shareable model schema.
#[derive(Clone)]
pub struct Definition {
    inner: Rc<DefinitionInner>,
}

impl Definition {
    /// Starts building a definition named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder {
            name: name.into(),
            edit_event: None,
            base: None,
            properties: BTreeMap::new(),
            has_many: BTreeMap::new(),
            has_one: BTreeMap::new(),
        }
    }

    /// The definition's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The bus event name emitted when an instance enters edit mode.
    #[must_use]
    pub fn edit_event(&self) -> &str {
        &self.inner.edit_event
    }

    /// The merged property dictionary.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, PropertySpec> {
        &self.inner.properties
    }

    /// Looks up a declared property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.inner.properties.get(name)
    }

    /// The merged has-many dictionary.
    #[must_use]
    pub fn has_many(&self) -> &BTreeMap<String, Definition> {
        &self.inner.has_many
    }

    /// The child definition of a has-many relationship.
    #[must_use]
    pub fn has_many_definition(&self, name: &str) -> Option<&Definition> {
        self.inner.has_many.get(name)
    }

    /// The merged has-one dictionary.
    #[must_use]
    pub fn has_one(&self) -> &BTreeMap<String, Definition> {
        &self.inner.has_one
    }

    /// The child definition of a has-one relationship.
    #[must_use]
    pub fn has_one_definition(&self, name: &str) -> Option<&Definition> {
        self.inner.has_one.get(name)
    }

    /// Schema identity: whether two handles refer to one merged definition.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.inner.name)
            .field("edit_event", &self.inner.edit_event)
            .field("properties", &self.inner.properties.keys().collect::<Vec<_>>())
            .field("has_many", &self.inner.has_many.keys().collect::<Vec<_>>())
            .field("has_one", &self.inner.has_one.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Merges one schema dictionary: every derived entry, plus every base entry
/// whose key the derived dictionary does not declare. Neither input is
/// mutated. Runs once at definition-build time, not per instance.
#[must_use]
pub fn merge_entries<V: Clone>(
    derived: &BTreeMap<String, V>,
    base: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    let mut merged = base.clone();
    for (name, entry) in derived {
        merged.insert(name.clone(), entry.clone());
    }
    merged
}

/// The schema every definition implicitly inherits.
///
/// `edit` flips an instance into edit mode and announces it on the
/// definition's edit event; `locked` mirrors `edit` and is sync-enabled so
/// other replicas can see the instance is being edited. The mirror converges
/// because it assigns an unconditional value.
fn base_properties() -> BTreeMap<String, PropertySpec> {
    let mut properties = BTreeMap::new();

    properties.insert(
        "edit".to_string(),
        PropertySpec::boolean()
            .default_value(serde_json::Value::Bool(false))
            .hidden()
            .watch("edit", |model, event| {
                if event.value.as_bool() == Some(true) {
                    model.emit_edit();
                }
            }),
    );

    properties.insert(
        "locked".to_string(),
        PropertySpec::boolean()
            .default_value(serde_json::Value::Bool(false))
            .synced()
            .hidden()
            .watch("edit", |model, event| {
                if let Err(error) = model.set("locked", event.value.clone()) {
                    warn!(model = model.id(), %error, "failed to mirror edit into locked");
                }
            }),
    );

    properties
}

/// Builds a [`Definition`], optionally derived from a base definition.
pub struct DefinitionBuilder {
    name: String,
    edit_event: Option<String>,
    base: Option<Definition>,
    properties: BTreeMap<String, PropertySpec>,
    has_many: BTreeMap<String, Definition>,
    has_one: BTreeMap<String, Definition>,
}

impl DefinitionBuilder {
    /// Declares a property. Shadows a same-named inherited declaration.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, spec: PropertySpec) -> Self {
        self.properties.insert(name.into(), spec);
        self
    }

    /// Declares a has-many relationship to `child`.
    #[must_use]
    pub fn has_many(mut self, name: impl Into<String>, child: &Definition) -> Self {
        self.has_many.insert(name.into(), child.clone());
        self
    }

    /// Declares a has-one relationship to `child`.
    #[must_use]
    pub fn has_one(mut self, name: impl Into<String>, child: &Definition) -> Self {
        self.has_one.insert(name.into(), child.clone());
        self
    }

    /// Overrides the edit-event name (defaults to `<name>:edit`).
    #[must_use]
    pub fn edit_event(mut self, event: impl Into<String>) -> Self {
        self.edit_event = Some(event.into());
        self
    }

    /// Derives from `base`: non-shadowed entries of all three dictionaries
    /// remain visible on the built definition.
    #[must_use]
    pub fn inherit(mut self, base: &Definition) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Merges and freezes the definition.
    #[must_use]
    pub fn build(self) -> Definition {
        let empty = BTreeMap::new();
        let (base_props, base_many, base_one) = match &self.base {
            Some(base) => (
                base.inner.properties.clone(),
                &base.inner.has_many,
                &base.inner.has_one,
            ),
            None => (base_properties(), &empty, &empty),
        };

        let edit_event = self
            .edit_event
            .unwrap_or_else(|| format!("{}:edit", self.name));

        Definition {
            inner: Rc::new(DefinitionInner {
                edit_event,
                properties: merge_entries(&self.properties, &base_props),
                has_many: merge_entries(&self.has_many, base_many),
                has_one: merge_entries(&self.has_one, base_one),
                name: self.name,
            }),
        }
    }
}
