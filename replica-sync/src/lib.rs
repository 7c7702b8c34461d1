//! Inbound sync for Replica.
//!
//! The model engine emits a sync event for every locally-mutated,
//! sync-enabled property. This crate is the other direction: the
//! [`Reconciler`] takes an inbound `{id, property, value}` event, finds the
//! live instance in the registry, and assigns the value through the normal
//! setter with outbound emission suspended.
//!
//! Guarantees:
//! - applying an inbound event never re-emits an outbound sync event for
//!   that write (loop prevention across replicas)
//! - local observers still fire, exactly as for a local mutation
//! - model-typed values arriving as plain data are re-instantiated through
//!   their declared definition, recursively
//!
//! Moving events between processes is a transport concern and lives outside
//! this crate; [`Reconciler::attach`] bridges two in-process buses where a
//! transport would sit, which is how replica pairs are wired in tests.

mod error;
mod reconciler;

pub use error::{SyncError, SyncResult};
pub use reconciler::Reconciler;
