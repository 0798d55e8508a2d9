//! # System Lifecycle & Orchestration
//!
//! Wiring the directory together is deliberately boring: spawn the store
//! actor, define the resources, hand out clients. [`DirectorySystem`] is
//! the conductor that does it in the right order and coordinates a clean
//! shutdown: the actor drains and exits once every handle is dropped.

pub mod tracing;

pub use tracing::*;

use crate::clients::DirectoryClient;
use crate::transport::DirectoryTransport;
use resource_store::{DataStore, ResourceConfig, StoreActor, StoreError, Transport};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The running directory: store actor plus clients.
pub struct DirectorySystem {
    pub client: DirectoryClient,
    pub store: DataStore,
    handle: JoinHandle<()>,
}

impl DirectorySystem {
    /// Start the directory against the canned-data backend.
    pub async fn start() -> Result<Self, StoreError> {
        Self::start_with(Arc::new(DirectoryTransport::new())).await
    }

    /// Start the directory against an arbitrary transport, used by tests
    /// to substitute a scripted mock.
    pub async fn start_with(transport: Arc<dyn Transport>) -> Result<Self, StoreError> {
        let (actor, store) = StoreActor::new(transport, 32);
        let handle = tokio::spawn(actor.run());

        store
            .define_resource(ResourceConfig::new("person").id_attribute("id"))
            .await?;
        store.define_resource(ResourceConfig::new("profile")).await?;

        Ok(Self {
            client: DirectoryClient::new(store.clone()),
            store,
            handle,
        })
    }

    /// Drop every handle and wait for the actor to drain.
    pub async fn shutdown(self) -> Result<(), String> {
        let Self {
            client,
            store,
            handle,
        } = self;
        drop(client);
        drop(store);
        handle.await.map_err(|e| e.to_string())
    }
}
