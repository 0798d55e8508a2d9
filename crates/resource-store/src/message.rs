//! # Store Messages
//!
//! This module defines the message types exchanged between the [`DataStore`]
//! facade and the [`StoreActor`]. Every public operation maps to one request
//! variant carrying a oneshot `respond_to` channel; `FetchSettled` is the
//! internal variant through which a spawned transport task re-enters the
//! actor loop, so the cache merge and the completeness-flag update happen
//! inside the actor's single thread of control.
//!
//! [`DataStore`]: crate::DataStore
//! [`StoreActor`]: crate::StoreActor

use crate::cache::{InjectOptions, Injected};
use crate::definition::{ResourceConfig, ResourceDefinition};
use crate::error::StoreError;
use crate::record::{Entity, RecordId};
use crate::transport::FetchOutcome;
use serde_json::Value;
use tokio::sync::oneshot;

/// One-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Deduplication key for in-flight fetches; the id is absent for singular
/// resources.
pub type FetchKey = (String, Option<RecordId>);

/// Requests processed sequentially by the store actor.
#[derive(Debug)]
pub enum StoreRequest {
    Define {
        config: ResourceConfig,
        respond_to: Response<()>,
    },
    Definition {
        name: String,
        respond_to: Response<ResourceDefinition>,
    },
    CreateInstance {
        name: String,
        respond_to: Response<Entity>,
    },
    Inject {
        name: String,
        data: Value,
        options: InjectOptions,
        respond_to: Response<Injected>,
    },
    Get {
        name: String,
        id: Option<RecordId>,
        respond_to: Response<Option<Entity>>,
    },
    GetAll {
        name: String,
        respond_to: Response<Vec<Entity>>,
    },
    Eject {
        name: String,
        id: Option<RecordId>,
        respond_to: Response<()>,
    },
    EjectAll {
        name: String,
        respond_to: Response<()>,
    },
    IsComplete {
        name: String,
        id: Option<RecordId>,
        respond_to: Response<bool>,
    },
    Find {
        name: String,
        id: Option<RecordId>,
        respond_to: Response<Entity>,
    },
    Reset {
        respond_to: Response<()>,
    },
    /// A spawned transport fetch settled; merge and fan out to all waiters.
    FetchSettled {
        key: FetchKey,
        outcome: FetchOutcome,
    },
}
