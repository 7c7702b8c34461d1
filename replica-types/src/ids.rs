//! Identifier generation for model instances.
//!
//! Ids are opaque strings. The default generator uses UUID v7, which embeds
//! a timestamp for natural ordering.

use uuid::Uuid;

/// Produces a fresh unique id for an instance that was constructed without one.
///
/// Injectable so tests can substitute a deterministic sequence.
pub trait IdGenerator {
    /// Returns a new id, unique within the process and across replicas.
    fn generate_id(&self) -> String;
}

/// Default generator: time-ordered UUID v7 rendered in canonical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let ids = UuidIdGenerator;
        let a = ids.generate_id();
        let b = ids.generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_are_canonical_uuids() {
        let id = UuidIdGenerator.generate_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
