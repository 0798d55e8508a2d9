//! # Directory Client
//!
//! Provides a high-level API for the people directory. It wraps the store's
//! [`DataStore`] facade and exposes typed methods, hiding the JSON attribute
//! handling from callers.

use crate::model::{Person, Profile};
use resource_store::{DataStore, InjectOptions, RecordId, StoreError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors surfaced by the directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The store rejected the operation (validation, unknown resource, or a
    /// transport failure carried through a `find`).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A cached record did not decode into its typed model.
    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the people directory.
#[derive(Clone)]
pub struct DirectoryClient {
    store: DataStore,
}

impl DirectoryClient {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    /// Preload partial roster rows, e.g. from a server-rendered listing.
    /// Rows are injected incomplete, so the first lookup still fetches the
    /// full record.
    pub async fn preload(&self, rows: Value) -> Result<(), DirectoryError> {
        self.store
            .inject("person", rows, InjectOptions::incomplete())
            .await?;
        Ok(())
    }

    /// Resolve one person, fetching from the backend unless already
    /// complete in cache.
    #[instrument(skip(self))]
    pub async fn person(&self, id: i64) -> Result<Person, DirectoryError> {
        debug!("Sending request");
        let entity = self.store.find("person", RecordId::from(id)).await?;
        Ok(serde_json::from_value(entity.to_json())?)
    }

    /// Resolve the signed-in user's profile.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Profile, DirectoryError> {
        debug!("Sending request");
        let entity = self.store.find("profile", None).await?;
        Ok(serde_json::from_value(entity.to_json())?)
    }

    /// Access the underlying store facade.
    pub fn store(&self) -> &DataStore {
        &self.store
    }
}
