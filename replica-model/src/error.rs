//! Error types for the model engine.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// A value failed a declared type check.
///
/// Recoverable per-field: collected into an aggregate during construction,
/// thrown singly for a bare post-construction assignment.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("type violation: expected {expected}, got {value}")]
pub struct TypeViolation {
    /// Human-readable name of the declared type (e.g. `string`, `model<item>`).
    pub expected: String,

    /// The offending value, in serialized form.
    pub value: serde_json::Value,
}

/// One failed field or child inside a construction call.
#[derive(Debug, Error)]
#[error("{field}: {source}")]
pub struct FieldError {
    /// Property name, or `relation[index]` for a has-many child.
    pub field: String,

    /// The underlying failure.
    #[source]
    pub source: ModelError,
}

/// Errors that can occur when defining, constructing, or mutating models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A declared type check failed.
    #[error(transparent)]
    Type(#[from] TypeViolation),

    /// Assignment to a property the definition does not declare.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// Raw model data was not a JSON object.
    #[error("model data must be a JSON object, got {0}")]
    RecordExpected(serde_json::Value),

    /// One or more field/child failures during a single construction call.
    ///
    /// Always all-or-nothing for the instance being constructed: the failing
    /// instance is never registered. `errors` preserves processing order.
    #[error("constructing '{definition}' failed with {} error(s)", .errors.len())]
    Construction {
        /// Name of the definition whose construction failed.
        definition: String,
        /// Every individual failure, in the order it was encountered.
        errors: Vec<FieldError>,
    },
}

impl ModelError {
    /// Returns the aggregated failures if this is a construction error.
    #[must_use]
    pub fn construction_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Construction { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
