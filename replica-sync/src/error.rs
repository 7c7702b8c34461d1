//! Error types for the sync layer.

use thiserror::Error;

use replica_model::ModelError;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while applying inbound sync events.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The assignment (or nested re-instantiation) failed in the model
    /// engine.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// No live instance is registered under the event's id.
    #[error("instance not found: {0}")]
    InstanceNotFound(String),
}
