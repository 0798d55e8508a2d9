//! # Resource Store
//!
//! A client-side, in-memory resource store: a registry of named resource
//! types, each backed by a single-entity slot or an id-keyed collection,
//! with identity-preserving caching, completeness tracking, and
//! deduplicated asynchronous retrieval.
//!
//! ## Core guarantees
//!
//! - **Identity**: one logical entity is one object. `get`, `find`, and
//!   `inject` all hand out the same [`Entity`] handle for the same
//!   identifier, and a fetch merges new attributes into it in place:
//!   callers holding a reference observe the completed data transparently.
//! - **Completeness**: every cached entry records whether its data is fully
//!   fetched. A complete entry makes [`find`](DataStore::find) resolve from
//!   cache with no network access; completeness only ever moves upward.
//! - **Deduplication**: at most one fetch is in flight per
//!   `(resource, id)` pair. Concurrent `find` calls coalesce onto the same
//!   pending fetch and settle together, from a single transport call.
//! - **Failure propagation**: transport failures reject the pending result
//!   with the transport's parsed failure body verbatim
//!   ([`StoreError::Fetch`]), so callers inspect domain error content
//!   through one uniform asynchronous channel.
//!
//! ## Architecture
//!
//! The store is an actor: [`StoreActor`] owns the definition registry, the
//! instance cache, and the in-flight fetch table, and processes requests
//! sequentially; cache mutations are atomic because nothing else touches
//! the state. [`DataStore`] is the cloneable facade handle; the
//! [`Transport`] trait is the external collaborator that performs the
//! actual network retrieval.
//!
//! ## Example
//!
//! ```rust
//! use resource_store::mock::MockTransport;
//! use resource_store::{InjectOptions, RecordId, ResourceConfig, StoreActor};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), resource_store::StoreError> {
//!     let transport = Arc::new(MockTransport::new());
//!     let (actor, store) = StoreActor::new(transport, 32);
//!     tokio::spawn(actor.run());
//!
//!     store
//!         .define_resource(ResourceConfig::new("person").id_attribute("id"))
//!         .await?;
//!     store
//!         .inject(
//!             "person",
//!             json!([{ "id": 1, "name": "John", "age": 54 }]),
//!             InjectOptions::default(),
//!         )
//!         .await?;
//!
//!     // Complete in cache: resolves without touching the transport.
//!     let john = store.find("person", RecordId::from(1)).await?;
//!     assert_eq!(john.attribute("name"), Some(json!("John")));
//!     Ok(())
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockTransport`](mock::MockTransport), a
//! scriptable transport double with a recorded call log, for fast and
//! deterministic tests of code built on the store.

pub mod cache;
pub mod client;
pub mod definition;
pub mod error;
pub mod message;
pub mod mock;
pub mod record;
pub mod store;
pub mod transport;

// Re-export core types for convenience
pub use cache::{InjectOptions, Injected};
pub use client::DataStore;
pub use definition::{RecordFactory, Registry, ResourceConfig, ResourceDefinition, ResourceKind};
pub use error::StoreError;
pub use message::{Response, StoreRequest};
pub use record::{Attributes, Document, Entity, Record, RecordId};
pub use store::StoreActor;
pub use transport::{FetchOutcome, Transport};
