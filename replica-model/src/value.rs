//! Runtime values held by instance properties.
//!
//! Scalars and plain structures are carried as JSON (the same shape raw
//! input arrives in); nested instances and has-many collections are live
//! handles. `Absent` and JSON `null` both count as "no value" — assigning
//! either clears a property without tripping its type check.

use crate::collection::Collection;
use crate::instance::Instance;

/// A value stored in (or assigned to) an instance property.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value. Typed properties accept this unconditionally.
    Absent,
    /// A plain JSON value: string, number, boolean, array, or object.
    Data(serde_json::Value),
    /// A live nested instance.
    Model(Instance),
    /// A live ordered collection of child instances.
    Collection(Collection),
}

impl Value {
    /// True for `Absent` and for JSON `null`.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent) || matches!(self, Self::Data(serde_json::Value::Null))
    }

    /// The value as a string slice, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Data(data) => data.as_str(),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Data(data) => data.as_bool(),
            _ => None,
        }
    }

    /// The value as a float, if it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Data(data) => data.as_f64(),
            _ => None,
        }
    }

    /// The nested instance, if this value is one.
    #[must_use]
    pub fn as_model(&self) -> Option<&Instance> {
        match self {
            Self::Model(instance) => Some(instance),
            _ => None,
        }
    }

    /// The collection handle, if this value is one.
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Renders the value for serialization and for the sync payload.
    ///
    /// Live handles flatten to plain data: an instance becomes its shallow
    /// serialized record, a collection the array of its members' records.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Absent => serde_json::Value::Null,
            Self::Data(data) => data.clone(),
            Self::Model(instance) => instance.serialize(),
            Self::Collection(collection) => serde_json::Value::Array(
                collection.items().iter().map(Instance::serialize).collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Model(a), Self::Model(b)) => a.same(b),
            (Self::Collection(a), Self::Collection(b)) => a.same(b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Data(serde_json::Value::from(text))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Data(serde_json::Value::from(text))
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Data(serde_json::Value::from(flag))
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Data(serde_json::Value::from(number))
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Data(serde_json::Value::from(number))
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Model(instance)
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}
