//! Replica model engine.
//!
//! Declares domain entities as typed, observable records with nested
//! relationships, and broadcasts selected mutations onto a shared event
//! channel so replicas in other processes can stay synchronized.
//!
//! - [`Definition`] — a named, inheritable schema: properties, has-many,
//!   has-one, and an edit-event name. Derivation merges schemas once, at
//!   build time ([`merge_entries`]).
//! - [`PropertySpec`] — a property declaration as plain data: type tag,
//!   default, get/set transforms, observers, sync and visibility flags.
//! - [`Instance`] — a live record. Mutation runs the write pipeline:
//!   transform → enforce → store → local change event → sync event.
//! - [`EventBus`] / [`Registry`] / [`Context`] — the injected collaborators:
//!   pub/sub channel, live-instance lookup, id generation.
//!
//! Everything is single-threaded and synchronous: writes, observer dispatch,
//! and sync emission run to completion within the caller's turn. Observers
//! may assign back into the instance; the engine does not detect cyclic
//! observer graphs — callers must wire observers that converge.
//!
//! # Example
//!
//! ```
//! use replica_model::{Context, Definition, PropertySpec};
//! use serde_json::json;
//!
//! let context = Context::new();
//! let todo = Definition::builder("todo")
//!     .property("name", PropertySpec::string().synced())
//!     .property("done", PropertySpec::boolean().default_value(json!(false)))
//!     .build();
//!
//! let item = todo.create(&context, json!({"name": "write the docs"})).unwrap();
//! assert_eq!(item.get_str("name").as_deref(), Some("write the docs"));
//! assert_eq!(item.get_bool("done"), Some(false));
//! ```

mod bus;
mod collection;
mod context;
mod definition;
mod error;
mod instance;
mod kind;
mod property;
mod registry;
mod serialize;
mod store;
mod value;

pub use bus::{BusPayload, ChangeEvent, EditEvent, EventBus, SubscriptionId};
pub use collection::Collection;
pub use context::Context;
pub use definition::{Definition, DefinitionBuilder, merge_entries};
pub use error::{FieldError, ModelError, ModelResult, TypeViolation};
pub use instance::{Instance, SyncSuspension, WeakInstance};
pub use kind::{PropertyKind, enforce};
pub use property::{DefaultValue, Observer, PropertySpec, Transform};
pub use registry::Registry;
pub use value::Value;
