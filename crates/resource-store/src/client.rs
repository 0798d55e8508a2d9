//! # Store Facade
//!
//! [`DataStore`] is the public surface of the store: a thin, cloneable
//! handle that forwards every operation to the [`StoreActor`] over the
//! request channel and returns results via oneshot channels. It holds no
//! state of its own (all state lives in the actor), so it is cheap to
//! clone and share across tasks.
//!
//! [`StoreActor`]: crate::StoreActor

use crate::cache::{InjectOptions, Injected};
use crate::definition::{ResourceConfig, ResourceDefinition};
use crate::error::StoreError;
use crate::message::{Response, StoreRequest};
use crate::record::{Entity, RecordId};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Cloneable facade over the store actor.
#[derive(Clone)]
pub struct DataStore {
    sender: mpsc::Sender<StoreRequest>,
}

impl DataStore {
    pub(crate) fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Register a resource. Fails with [`StoreError::Validation`] when the
    /// name is empty or taken, or a collection lacks an id attribute; a
    /// failed define leaves no state behind.
    pub async fn define_resource(&self, config: ResourceConfig) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Define { config, respond_to })
            .await
    }

    /// Look up a resource definition by name.
    pub async fn definition(&self, name: &str) -> Result<ResourceDefinition, StoreError> {
        let name = name.to_string();
        self.request(|respond_to| StoreRequest::Definition { name, respond_to })
            .await
    }

    /// Produce a fresh, empty entity of the resource's type. The instance is
    /// not added to the cache.
    pub async fn create_instance(&self, name: &str) -> Result<Entity, StoreError> {
        let name = name.to_string();
        self.request(|respond_to| StoreRequest::CreateInstance { name, respond_to })
            .await
    }

    /// Merge `data` (one JSON object, or an array of objects for collection
    /// resources) into the cache. Returns the cached entities in the same
    /// shape as the input.
    #[tracing::instrument(skip_all, fields(resource = %name))]
    pub async fn inject(
        &self,
        name: &str,
        data: Value,
        options: InjectOptions,
    ) -> Result<Injected, StoreError> {
        debug!("Sending request");
        let name = name.to_string();
        self.request(|respond_to| StoreRequest::Inject {
            name,
            data,
            options,
            respond_to,
        })
        .await
    }

    /// Read a cached entity without touching the transport.
    pub async fn get(
        &self,
        name: &str,
        id: impl Into<Option<RecordId>>,
    ) -> Result<Option<Entity>, StoreError> {
        let name = name.to_string();
        let id = id.into();
        self.request(|respond_to| StoreRequest::Get {
            name,
            id,
            respond_to,
        })
        .await
    }

    /// Snapshot of every cached entity for a resource.
    pub async fn get_all(&self, name: &str) -> Result<Vec<Entity>, StoreError> {
        let name = name.to_string();
        self.request(|respond_to| StoreRequest::GetAll { name, respond_to })
            .await
    }

    /// Remove one cached entry. The definition stays.
    pub async fn eject(
        &self,
        name: &str,
        id: impl Into<Option<RecordId>>,
    ) -> Result<(), StoreError> {
        let name = name.to_string();
        let id = id.into();
        self.request(|respond_to| StoreRequest::Eject {
            name,
            id,
            respond_to,
        })
        .await
    }

    /// Remove every cached entry for a resource. The definition stays.
    pub async fn eject_all(&self, name: &str) -> Result<(), StoreError> {
        let name = name.to_string();
        self.request(|respond_to| StoreRequest::EjectAll { name, respond_to })
            .await
    }

    /// True iff a cached entry exists and no further fetch is required.
    pub async fn is_complete(
        &self,
        name: &str,
        id: impl Into<Option<RecordId>>,
    ) -> Result<bool, StoreError> {
        let name = name.to_string();
        let id = id.into();
        self.request(|respond_to| StoreRequest::IsComplete {
            name,
            id,
            respond_to,
        })
        .await
    }

    /// Resolve an entity, fetching it over the transport unless the cache
    /// already holds it complete. Concurrent calls for the same entity
    /// coalesce onto a single fetch and settle together.
    ///
    /// Transport failures reject with [`StoreError::Fetch`] carrying the
    /// parsed failure body verbatim.
    #[tracing::instrument(skip_all, fields(resource = %name))]
    pub async fn find(
        &self,
        name: &str,
        id: impl Into<Option<RecordId>>,
    ) -> Result<Entity, StoreError> {
        debug!("Sending request");
        let name = name.to_string();
        let id = id.into();
        self.request(|respond_to| StoreRequest::Find {
            name,
            id,
            respond_to,
        })
        .await
    }

    /// Clear every definition and all cached state.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Reset { respond_to })
            .await
    }
}
