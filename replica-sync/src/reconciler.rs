//! Event reconciler - applies inbound sync events to local instances.
//!
//! The inbound counterpart of the write pipeline's sync emission. Applying
//! an event goes through the normal property setter, so local observers fire
//! exactly as they would for a local mutation, but outbound sync emission is
//! suspended for the duration — an inbound application never re-broadcasts,
//! which is what keeps two synchronized replicas from feeding back into each
//! other.

use replica_types::{SYNC_EVENT, SyncEvent};
use tracing::{debug, warn};

use replica_model::{
    BusPayload, Context, EventBus, Instance, PropertyKind, SubscriptionId, Value,
};

use crate::error::{SyncError, SyncResult};

/// Applies inbound sync events against one context's registry.
#[derive(Clone)]
pub struct Reconciler {
    context: Context,
}

impl Reconciler {
    /// Creates a reconciler for `context`.
    #[must_use]
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// Applies an externally-originated change to `instance`.
    ///
    /// Inbound values for model-typed properties travel as plain data and
    /// are re-instantiated through the declared child definition before
    /// assignment; has-one accessors already instantiate transparently.
    pub fn apply(
        &self,
        instance: &Instance,
        property: &str,
        value: serde_json::Value,
    ) -> SyncResult<()> {
        let declared = instance
            .definition()
            .property(property)
            .and_then(|spec| spec.kind.clone());

        let value = match declared {
            Some(PropertyKind::Model(child)) if !value.is_null() => {
                Value::Model(child.create(&self.context, value)?)
            }
            _ => Value::Data(value),
        };

        let _suspension = instance.suspend_sync();
        instance.set(property, value)?;
        Ok(())
    }

    /// Applies a sync event to the instance registered under its id.
    /// Returns whether a local instance was modified; events for unknown
    /// ids are skipped.
    pub fn apply_event(&self, event: &SyncEvent) -> SyncResult<bool> {
        match self.context.registry().get(&event.id) {
            Some(instance) => {
                self.apply(&instance, &event.property, event.value.clone())?;
                debug!(id = %event.id, property = %event.property, "applied sync event");
                Ok(true)
            }
            None => {
                debug!(id = %event.id, "skipping sync event for unknown instance");
                Ok(false)
            }
        }
    }

    /// Like [`apply_event`](Self::apply_event), but unknown ids are an
    /// error rather than a skip.
    pub fn apply_event_required(&self, event: &SyncEvent) -> SyncResult<()> {
        if self.apply_event(event)? {
            Ok(())
        } else {
            Err(SyncError::InstanceNotFound(event.id.clone()))
        }
    }

    /// Subscribes this reconciler to `source`'s sync events, applying each
    /// into its own context. Bridges two in-process channels where a real
    /// transport would sit; failures are reported, not propagated, since
    /// emission has no caller to fail.
    pub fn attach(&self, source: &EventBus) -> SubscriptionId {
        let reconciler = self.clone();
        source.on(SYNC_EVENT, move |payload| {
            if let BusPayload::Sync(event) = payload {
                if let Err(error) = reconciler.apply_event(event) {
                    warn!(
                        id = %event.id,
                        property = %event.property,
                        %error,
                        "failed to apply inbound sync event"
                    );
                }
            }
        })
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}
