//! # Records & Entities
//!
//! The store is agnostic to what a cached record actually is. The [`Record`]
//! trait is the contract an entity representation must satisfy: attribute
//! reads, merge-style attribute writes, and JSON serialization. [`Document`]
//! is the default implementation, a plain bag of JSON attributes; resource
//! definitions may plug in their own factory to produce richer records.
//!
//! # Architecture Note
//! Why a shared handle instead of plain values?
//! The store guarantees that one logical entity is one object: every caller
//! that obtains the entity (via `get`, `find`, or `inject`) holds the
//! *same* instance, and an in-place merge performed by a later fetch is
//! observed by all of them. [`Entity`] encodes that guarantee as an
//! `Arc<RwLock<Box<dyn Record>>>`: cloning the handle preserves identity
//! (compare with [`Entity::ptr_eq`]), and mutation happens through the
//! handle, never by replacement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Attribute mapping carried by records and transport payloads.
pub type Attributes = Map<String, Value>;

/// Contract for entity representations managed by the store.
pub trait Record: Send + Sync + fmt::Debug {
    /// Read a single attribute, if present.
    fn attribute(&self, key: &str) -> Option<Value>;

    /// Merge attributes in: new values overwrite same-named old ones,
    /// attributes absent from `attrs` are left untouched.
    fn set_attributes(&mut self, attrs: Attributes);

    /// Serialize the record to a plain JSON object.
    fn to_json(&self) -> Value;
}

/// Default record implementation: a flat JSON attribute bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    attributes: Attributes,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes(attributes: Attributes) -> Self {
        Self { attributes }
    }
}

impl Record for Document {
    fn attribute(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).cloned()
    }

    fn set_attributes(&mut self, attrs: Attributes) {
        for (key, value) in attrs {
            self.attributes.insert(key, value);
        }
    }

    fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

/// A shared handle to one cached record.
///
/// Cloning an `Entity` clones the handle, not the record: all clones refer
/// to the same underlying instance, and merges performed through any clone
/// are visible through every other one.
#[derive(Clone, Debug)]
pub struct Entity {
    inner: Arc<RwLock<Box<dyn Record>>>,
}

impl Entity {
    pub fn new(record: Box<dyn Record>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    /// Read a single attribute, if present.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.inner.read().expect("record lock poisoned").attribute(key)
    }

    /// Merge attributes into the record in place.
    pub fn set_attributes(&self, attrs: Attributes) {
        self.inner
            .write()
            .expect("record lock poisoned")
            .set_attributes(attrs);
    }

    /// Serialize the record to a plain JSON object.
    pub fn to_json(&self) -> Value {
        self.inner.read().expect("record lock poisoned").to_json()
    }

    /// True iff both handles refer to the same underlying record.
    pub fn ptr_eq(a: &Entity, b: &Entity) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

/// Identifier value of a cached record, as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Normalize a JSON value into an id. Only integers and strings qualify.
    pub fn from_value(value: &Value) -> Option<RecordId> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Str(s.clone())),
            _ => None,
        }
    }

    /// The id as a JSON value, for seeding skeleton records.
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Str(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_merge_overwrites_only_named_attributes() {
        let mut doc = Document::new();
        doc.set_attributes(
            json!({ "id": 1, "name": "John", "age": 54 })
                .as_object()
                .unwrap()
                .clone(),
        );
        doc.set_attributes(json!({ "age": 55 }).as_object().unwrap().clone());

        assert_eq!(doc.to_json(), json!({ "id": 1, "name": "John", "age": 55 }));
    }

    #[test]
    fn entity_clones_share_identity_and_mutations() {
        let entity = Entity::new(Box::new(Document::new()));
        let other = entity.clone();

        other.set_attributes(json!({ "name": "Jane" }).as_object().unwrap().clone());

        assert!(Entity::ptr_eq(&entity, &other));
        assert_eq!(entity.attribute("name"), Some(json!("Jane")));
    }

    #[test]
    fn record_id_normalizes_integers_and_strings() {
        assert_eq!(RecordId::from_value(&json!(3)), Some(RecordId::Int(3)));
        assert_eq!(
            RecordId::from_value(&json!("abc")),
            Some(RecordId::Str("abc".into()))
        );
        assert_eq!(RecordId::from_value(&json!(1.5)), None);
        assert_eq!(RecordId::from_value(&json!({ "id": 1 })), None);
    }
}
