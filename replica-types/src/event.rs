//! The sync event payload.
//!
//! A sync event describes one locally-mutated, sync-enabled property of one
//! instance. It is the unit of replication: any transport that moves these
//! between processes must preserve the field names byte-for-byte.

use serde::{Deserialize, Serialize};

/// Bus event name under which sync events are published.
pub const SYNC_EVENT: &str = "sync";

/// An outbound (or inbound) notification of a property change.
///
/// `value` is plain JSON: model-typed values travel as their serialized
/// record, never as live instances. The receiving side re-instantiates them
/// through the declared definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Id of the instance that changed.
    pub id: String,

    /// Name of the property that changed.
    pub property: String,

    /// The newly assigned value, in serialized form.
    pub value: serde_json::Value,
}

impl SyncEvent {
    /// Creates a new sync event.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        property: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            property: property.into(),
            value,
        }
    }
}
