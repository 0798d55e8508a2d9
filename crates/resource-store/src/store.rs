//! # Store Actor
//!
//! This module defines the [`StoreActor`], the component that owns all store
//! state (the definition registry, the instance cache, and the in-flight
//! fetch table) and processes requests sequentially.
//!
//! # Architecture Note
//! Even though many [`DataStore`] handles may be cloned across tasks, the
//! actor processes its messages *one at a time* in a loop. This means no
//! `Mutex` or `RwLock` guards the store state: the identifier-to-entry
//! update and the completeness-flag update always happen as a single atomic
//! step, and no reader can observe a complete flag without the data behind
//! it.
//!
//! ## Fetch coordination
//!
//! `Find` is the only operation that suspends. The actor never awaits a
//! transport call itself: it spawns the fetch into its own task and keeps
//! processing requests. When the fetch settles, the task re-enters the loop
//! with a [`FetchSettled`](crate::StoreRequest::FetchSettled) message, and
//! the actor merges the result and fans it out to every waiter that
//! coalesced onto that fetch in the meantime. At most one fetch is in
//! flight per `(resource, id)` key.
//!
//! The actor holds only a [`WeakSender`](tokio::sync::mpsc::WeakSender) to
//! its own channel for those settlement messages, so dropping every
//! `DataStore` handle still shuts the actor down.

use crate::cache::InstanceCache;
use crate::client::DataStore;
use crate::definition::{Registry, ResourceConfig, ResourceKind};
use crate::error::StoreError;
use crate::message::{FetchKey, Response, StoreRequest};
use crate::record::{Entity, RecordId};
use crate::transport::{FetchOutcome, Transport};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns registry, cache, and in-flight fetch state.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    notifier: mpsc::WeakSender<StoreRequest>,
    transport: Arc<dyn Transport>,
    registry: Registry,
    cache: InstanceCache,
    in_flight: HashMap<FetchKey, Vec<Response<Entity>>>,
}

impl StoreActor {
    /// Creates a new `StoreActor` and its associated [`DataStore`] facade.
    ///
    /// # Arguments
    ///
    /// * `transport` - The collaborator that performs the actual network
    ///   retrieval for entities that are not complete in cache.
    /// * `buffer_size` - The capacity of the request channel. If the channel
    ///   is full, facade calls wait until there is space.
    pub fn new(transport: Arc<dyn Transport>, buffer_size: usize) -> (Self, DataStore) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            notifier: sender.downgrade(),
            transport,
            registry: Registry::new(),
            cache: InstanceCache::new(),
            in_flight: HashMap::new(),
        };
        (actor, DataStore::new(sender))
    }

    /// Runs the actor's event loop, processing requests until every facade
    /// handle has been dropped.
    pub async fn run(mut self) {
        info!("Store started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }
        info!("Store shutdown");
    }

    fn handle(&mut self, msg: StoreRequest) {
        match msg {
            StoreRequest::Define { config, respond_to } => {
                self.handle_define(config, respond_to)
            }
            StoreRequest::Definition { name, respond_to } => {
                let result = self.registry.definition(&name).cloned();
                let _ = respond_to.send(result);
            }
            StoreRequest::CreateInstance { name, respond_to } => {
                let result = self
                    .registry
                    .definition(&name)
                    .map(|def| Entity::new(def.new_record()));
                let _ = respond_to.send(result);
            }
            StoreRequest::Inject {
                name,
                data,
                options,
                respond_to,
            } => {
                let result = match self.registry.definition(&name) {
                    Ok(def) => self.cache.inject(def, data, options),
                    Err(e) => Err(e),
                };
                match &result {
                    Ok(_) => debug!(resource = %name, incomplete = options.incomplete, "Injected"),
                    Err(e) => warn!(resource = %name, error = %e, "Inject rejected"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::Get {
                name,
                id,
                respond_to,
            } => {
                let result = match self.registry.definition(&name) {
                    Ok(def) => self.cache.get(def, id.as_ref()),
                    Err(e) => Err(e),
                };
                let _ = respond_to.send(result);
            }
            StoreRequest::GetAll { name, respond_to } => {
                let result = self
                    .registry
                    .definition(&name)
                    .map(|def| self.cache.get_all(def));
                let _ = respond_to.send(result);
            }
            StoreRequest::Eject {
                name,
                id,
                respond_to,
            } => {
                let result = match self.registry.definition(&name) {
                    Ok(def) => self.cache.eject(def, id.as_ref()),
                    Err(e) => Err(e),
                };
                if result.is_ok() {
                    debug!(resource = %name, id = ?id, "Ejected");
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::EjectAll { name, respond_to } => {
                let result = match self.registry.definition(&name) {
                    Ok(def) => {
                        self.cache.eject_all(def);
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                if result.is_ok() {
                    debug!(resource = %name, "Ejected all");
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::IsComplete {
                name,
                id,
                respond_to,
            } => {
                let result = match self.registry.definition(&name) {
                    Ok(def) => Ok(self.cache.is_complete(def, id.as_ref())),
                    Err(e) => Err(e),
                };
                let _ = respond_to.send(result);
            }
            StoreRequest::Find {
                name,
                id,
                respond_to,
            } => self.handle_find(name, id, respond_to),
            StoreRequest::Reset { respond_to } => {
                // In-flight fetches are left to settle exactly once; their
                // waiters observe NotFound because the definition is gone.
                self.registry.reset();
                self.cache.clear();
                info!("Store reset");
                let _ = respond_to.send(Ok(()));
            }
            StoreRequest::FetchSettled { key, outcome } => self.handle_settled(key, outcome),
        }
    }

    fn handle_define(&mut self, config: ResourceConfig, respond_to: Response<()>) {
        match self.registry.define(config) {
            Ok(def) => {
                info!(resource = %def.name(), kind = %def.kind(), "Resource defined");
                let def = def.clone();
                self.cache.init(&def);
                let _ = respond_to.send(Ok(()));
            }
            Err(e) => {
                warn!(error = %e, "Define rejected");
                let _ = respond_to.send(Err(e));
            }
        }
    }

    fn handle_find(&mut self, name: String, id: Option<RecordId>, respond_to: Response<Entity>) {
        let def = match self.registry.definition(&name) {
            Ok(def) => def,
            Err(e) => {
                warn!(resource = %name, "Find on undefined resource");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        // Singular fetches are keyed by name alone; collections require an id.
        let id = match def.kind() {
            ResourceKind::Singular => None,
            ResourceKind::Collection => match id {
                Some(id) => Some(id),
                None => {
                    let _ = respond_to.send(Err(StoreError::Validation(format!(
                        "collection resource '{name}' requires an id"
                    ))));
                    return;
                }
            },
        };

        if self.cache.is_complete(def, id.as_ref()) {
            debug!(resource = %name, id = ?id, "Find served from cache");
            let result = match self.cache.get(def, id.as_ref()) {
                Ok(Some(entity)) => Ok(entity),
                Ok(None) => Err(StoreError::NotFound(format!(
                    "no cached entity for resource '{name}'"
                ))),
                Err(e) => Err(e),
            };
            let _ = respond_to.send(result);
            return;
        }

        let key: FetchKey = (name.clone(), id.clone());
        if let Some(waiters) = self.in_flight.get_mut(&key) {
            waiters.push(respond_to);
            debug!(resource = %name, id = ?id, waiters = waiters.len(), "Find coalesced onto in-flight fetch");
            return;
        }

        // Reuse the incomplete entry if one exists; otherwise seed a skeleton
        // so callers share identity with the entity the fetch will complete.
        let entity = match self.cache.get(def, id.as_ref()) {
            Ok(Some(entity)) => entity,
            Ok(None) => self.cache.seed_incomplete(def, id.as_ref()),
            Err(e) => {
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        self.in_flight.insert(key.clone(), vec![respond_to]);
        debug!(resource = %name, id = ?id, "Fetch started");
        self.spawn_fetch(key, entity);
    }

    fn spawn_fetch(&self, key: FetchKey, entity: Entity) {
        let transport = self.transport.clone();
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            let outcome: FetchOutcome =
                transport.fetch(&key.0, key.1.as_ref(), &entity).await;
            if let Some(sender) = notifier.upgrade() {
                let _ = sender.send(StoreRequest::FetchSettled { key, outcome }).await;
            }
        });
    }

    fn handle_settled(&mut self, key: FetchKey, outcome: FetchOutcome) {
        let Some(waiters) = self.in_flight.remove(&key) else {
            warn!(resource = %key.0, "Fetch settled with no in-flight entry");
            return;
        };
        let (name, id) = key;
        match outcome {
            Ok(attrs) => match self.registry.definition(&name) {
                Ok(def) => {
                    let entity = self.cache.complete_fetch(def, id.as_ref(), attrs);
                    info!(resource = %name, id = ?id, waiters = waiters.len(), "Fetch completed");
                    for waiter in waiters {
                        let _ = waiter.send(Ok(entity.clone()));
                    }
                }
                Err(e) => {
                    // The store was reset while the fetch was in flight.
                    warn!(resource = %name, "Fetch settled for undefined resource");
                    for waiter in waiters {
                        let _ = waiter.send(Err(e.clone()));
                    }
                }
            },
            Err(body) => {
                warn!(resource = %name, id = ?id, "Fetch failed");
                for waiter in waiters {
                    let _ = waiter.send(Err(StoreError::Fetch(body.clone())));
                }
            }
        }
    }
}
