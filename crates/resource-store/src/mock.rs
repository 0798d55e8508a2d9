//! # Mock Transport
//!
//! [`MockTransport`] implements the same [`Transport`] contract as a
//! production transport but operates entirely in-memory: tests script the
//! outcome for each `(resource, id)` pair up front and assert on the
//! recorded call log afterwards. This keeps tests fast and deterministic:
//! no server, no sockets.
//!
//! # Example
//! ```rust
//! use resource_store::mock::MockTransport;
//! use resource_store::{RecordId, ResourceConfig, StoreActor};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = Arc::new(MockTransport::new());
//!     transport.respond_ok("person", RecordId::from(3), json!({ "id": 3, "name": "Matt" }));
//!
//!     let (actor, store) = StoreActor::new(transport.clone(), 32);
//!     tokio::spawn(actor.run());
//!
//!     store
//!         .define_resource(ResourceConfig::new("person").id_attribute("id"))
//!         .await
//!         .unwrap();
//!     let matt = store.find("person", RecordId::from(3)).await.unwrap();
//!
//!     assert_eq!(matt.attribute("name"), Some(json!("Matt")));
//!     assert_eq!(transport.calls(), 1);
//! }
//! ```

use crate::message::FetchKey;
use crate::record::{Entity, RecordId};
use crate::transport::{FetchOutcome, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scriptable transport double for tests.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<FetchKey, FetchOutcome>>,
    calls: Mutex<Vec<FetchKey>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful fetch for `(resource, id)`.
    ///
    /// # Panics
    /// Panics when `body` is not a JSON object; success payloads are
    /// attribute mappings by contract.
    pub fn respond_ok(&self, resource: &str, id: impl Into<Option<RecordId>>, body: Value) {
        let Value::Object(attrs) = body else {
            panic!("mock success body must be a JSON object");
        };
        self.responses
            .lock()
            .unwrap()
            .insert((resource.to_string(), id.into()), Ok(attrs));
    }

    /// Script a failed fetch for `(resource, id)`; `body` is the parsed
    /// failure payload the pending result will reject with.
    pub fn respond_err(&self, resource: &str, id: impl Into<Option<RecordId>>, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert((resource.to_string(), id.into()), Err(body));
    }

    /// Total number of fetches issued.
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of fetches issued for one `(resource, id)` pair.
    pub fn calls_for(&self, resource: &str, id: impl Into<Option<RecordId>>) -> usize {
        let key = (resource.to_string(), id.into());
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|recorded| **recorded == key)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, resource: &str, id: Option<&RecordId>, _entity: &Entity) -> FetchOutcome {
        let key = (resource.to_string(), id.cloned());
        self.calls.lock().unwrap().push(key.clone());
        match self.responses.lock().unwrap().get(&key) {
            Some(outcome) => outcome.clone(),
            None => Err(json!({
                "error": format!("no mock response for resource '{resource}'"),
            })),
        }
    }
}
