//! Type enforcement.
//!
//! A declared property type is a tagged variant over a closed set: one of
//! four primitive kinds, or a nested model definition. A single dispatch
//! function checks an incoming value against it. Enforcement is only ever
//! invoked for non-absent values — clearing a typed property is always
//! allowed.

use crate::definition::Definition;
use crate::error::TypeViolation;
use crate::value::Value;

/// The declared type of a property.
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// JSON string.
    String,
    /// JSON number (integer or float).
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON array, or an ordered collection handle.
    Array,
    /// A nested instance of exactly this definition.
    Model(Definition),
}

impl PropertyKind {
    /// Human-readable name used in violation messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Number => "number".into(),
            Self::Boolean => "boolean".into(),
            Self::Array => "array".into(),
            Self::Model(definition) => format!("model<{}>", definition.name()),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::Data(data)) => data.is_string(),
            (Self::Number, Value::Data(data)) => data.is_number(),
            (Self::Boolean, Value::Data(data)) => data.is_boolean(),
            (Self::Array, Value::Data(data)) => data.is_array(),
            (Self::Array, Value::Collection(_)) => true,
            (Self::Model(definition), Value::Model(instance)) => {
                instance.definition().same(definition)
            }
            _ => false,
        }
    }
}

impl PartialEq for PropertyKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String, Self::String)
            | (Self::Number, Self::Number)
            | (Self::Boolean, Self::Boolean)
            | (Self::Array, Self::Array) => true,
            (Self::Model(a), Self::Model(b)) => a.same(b),
            _ => false,
        }
    }
}

/// Checks `value` against `kind`.
///
/// Returns normally with no side effect on success; fails with a
/// [`TypeViolation`] carrying the declared type and the offending value
/// otherwise. Callers must not invoke this for absent values.
pub fn enforce(kind: &PropertyKind, value: &Value) -> Result<(), TypeViolation> {
    if kind.accepts(value) {
        Ok(())
    } else {
        Err(TypeViolation {
            expected: kind.name(),
            value: value.to_json(),
        })
    }
}
