//! # Store Errors
//!
//! This module defines the common error types used throughout the resource
//! store. By centralizing error definitions, we ensure consistent error
//! handling across the store actor and every facade handle.
//!
//! Definition and payload problems (`Validation`, `NotFound`) surface from
//! the facade call that caused them. `Fetch` is different: it only ever
//! surfaces through the settlement of a pending [`find`], carrying the
//! transport's parsed failure body verbatim so callers can inspect
//! domain-specific error content.
//!
//! [`find`]: crate::DataStore::find

use serde_json::Value;

/// Errors that can occur within the resource store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// A resource definition or inject payload failed validation.
    #[error("invalid resource configuration: {0}")]
    Validation(String),
    /// An operation referenced an undefined resource or absent entity.
    #[error("not found: {0}")]
    NotFound(String),
    /// The transport reported a failure. The payload is the transport's
    /// parsed failure body, never wrapped or re-serialized.
    #[error("fetch failed: {0}")]
    Fetch(Value),
    #[error("store closed")]
    StoreClosed,
    #[error("store dropped response channel")]
    StoreDropped,
}
