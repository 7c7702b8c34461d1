//! Core type contracts for Replica.
//!
//! This crate defines the fundamental, schema-agnostic types shared by the
//! model engine and the sync layer:
//! - Identifier generation ([`IdGenerator`], UUID v7 by default)
//! - The sync event payload exchanged between replicas ([`SyncEvent`])
//!
//! All schema-specific behavior (property declarations, relationships,
//! instances) lives in `replica-model`; this crate must stay free of it so
//! any transport can depend on the wire contract alone.

mod event;
mod ids;

pub use event::{SYNC_EVENT, SyncEvent};
pub use ids::{IdGenerator, UuidIdGenerator};
