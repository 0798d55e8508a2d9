//! # Directory Transport
//!
//! A [`Transport`] that serves person and profile fetches from a canned
//! data set, standing in for the HTTP backend a real deployment would talk
//! to. Unknown people and resources fail with a structured body, exactly
//! like a parsed JSON error response would.

use async_trait::async_trait;
use resource_store::{Attributes, Entity, FetchOutcome, RecordId, Transport};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Canned-data backend for the people directory.
pub struct DirectoryTransport {
    people: HashMap<i64, Attributes>,
    profile: Attributes,
}

fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

impl DirectoryTransport {
    pub fn new() -> Self {
        let mut people = HashMap::new();
        people.insert(1, attrs(json!({ "id": 1, "name": "John", "age": 54 })));
        people.insert(2, attrs(json!({ "id": 2, "name": "Jane", "age": 24 })));
        people.insert(
            3,
            attrs(json!({ "id": 3, "name": "Matt", "age": 34, "middle": "Ryu" })),
        );
        Self {
            people,
            profile: attrs(json!({ "name": "Sean", "age": 34 })),
        }
    }
}

impl Default for DirectoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for DirectoryTransport {
    async fn fetch(&self, resource: &str, id: Option<&RecordId>, _entity: &Entity) -> FetchOutcome {
        match (resource, id) {
            ("person", Some(RecordId::Int(n))) => match self.people.get(n) {
                Some(person) => Ok(person.clone()),
                None => Err(json!({ "error": format!("person {n} not found") })),
            },
            ("profile", _) => Ok(self.profile.clone()),
            _ => Err(json!({ "error": format!("unknown resource '{resource}'") })),
        }
    }
}
