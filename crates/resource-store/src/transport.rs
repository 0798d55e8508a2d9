//! # Transport Collaborator
//!
//! The store never performs network I/O itself. A [`Transport`]
//! implementation is handed to the store at construction time and invoked
//! by the fetch coordinator for every entity that must be retrieved.
//!
//! The contract is deliberately post-parse: a fetch resolves to either the
//! entity's attributes or an arbitrary structured failure body. Status
//! codes, headers, and wire formats are entirely the transport's concern;
//! the coordinator only merges success attributes or propagates the failure
//! body verbatim.

use crate::record::{Attributes, Entity, RecordId};
use async_trait::async_trait;
use serde_json::Value;

/// Parsed outcome of one transport fetch.
pub type FetchOutcome = Result<Attributes, Value>;

/// Performs the network retrieval for one entity.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Fetch the data for `entity`. `id` is absent for singular resources.
    ///
    /// The entity is the store's live handle: implementations may read
    /// attributes from it (a URL, a parent id) to build the request, but
    /// must not mutate it; merging the result is the coordinator's job.
    async fn fetch(&self, resource: &str, id: Option<&RecordId>, entity: &Entity) -> FetchOutcome;
}
