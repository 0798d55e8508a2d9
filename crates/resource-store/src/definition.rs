//! # Resource Definitions & Registry
//!
//! A resource is declared once, up front, with a [`ResourceConfig`]; the
//! [`Registry`] validates it into an immutable [`ResourceDefinition`] and
//! keeps it until a full reset. Definition problems fail fast at definition
//! time, and a failed `define` leaves no trace in the registry.
//!
//! Shape is a tagged variant ([`ResourceKind`]), selected at definition time
//! and dispatched explicitly by the cache and coordinator: a `Singular`
//! resource is one entity slot, a `Collection` resource is a keyed mapping
//! and therefore requires an `id_attribute`.

use crate::error::StoreError;
use crate::record::{Document, Record};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh, empty record for a resource.
pub type RecordFactory = Arc<dyn Fn() -> Box<dyn Record> + Send + Sync>;

/// Shape of a resource: one entity slot, or a keyed collection of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Singular,
    Collection,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Singular => write!(f, "singular"),
            ResourceKind::Collection => write!(f, "collection"),
        }
    }
}

/// Caller-facing configuration for defining a resource.
///
/// Shape inference: an explicit [`singular`](Self::singular) or
/// [`collection`](Self::collection) marker wins; otherwise supplying an
/// id attribute implies a collection, and a bare name is a singular
/// resource.
#[derive(Clone)]
pub struct ResourceConfig {
    name: String,
    id_attribute: Option<String>,
    kind: Option<ResourceKind>,
    factory: Option<RecordFactory>,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_attribute: None,
            kind: None,
            factory: None,
        }
    }

    /// Name of the attribute used as the cache key for collection resources.
    pub fn id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.id_attribute = Some(attribute.into());
        self
    }

    /// Explicitly mark the resource as a single-entity slot.
    pub fn singular(mut self) -> Self {
        self.kind = Some(ResourceKind::Singular);
        self
    }

    /// Explicitly mark the resource as a keyed collection.
    pub fn collection(mut self) -> Self {
        self.kind = Some(ResourceKind::Collection);
        self
    }

    /// Supply a custom record factory. Defaults to [`Document::new`].
    pub fn factory(
        mut self,
        factory: impl Fn() -> Box<dyn Record> + Send + Sync + 'static,
    ) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }
}

impl fmt::Debug for ResourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("name", &self.name)
            .field("id_attribute", &self.id_attribute)
            .field("kind", &self.kind)
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}

/// A validated, immutable resource definition.
#[derive(Clone)]
pub struct ResourceDefinition {
    name: String,
    kind: ResourceKind,
    id_attribute: Option<String>,
    factory: RecordFactory,
}

impl ResourceDefinition {
    fn from_config(config: ResourceConfig) -> Result<Self, StoreError> {
        if config.name.is_empty() {
            return Err(StoreError::Validation(
                "resource name must not be empty".to_string(),
            ));
        }

        let kind = config.kind.unwrap_or(if config.id_attribute.is_some() {
            ResourceKind::Collection
        } else {
            ResourceKind::Singular
        });

        if kind == ResourceKind::Collection && config.id_attribute.as_deref().unwrap_or("").is_empty()
        {
            return Err(StoreError::Validation(format!(
                "collection resource '{}' requires an id attribute",
                config.name
            )));
        }

        Ok(Self {
            name: config.name,
            kind,
            id_attribute: config.id_attribute,
            factory: config
                .factory
                .unwrap_or_else(|| Arc::new(|| Box::new(Document::new()))),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id_attribute(&self) -> Option<&str> {
        self.id_attribute.as_deref()
    }

    /// Produce a fresh, empty record of this resource's entity type.
    pub fn new_record(&self) -> Box<dyn Record> {
        (self.factory)()
    }
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("id_attribute", &self.id_attribute)
            .finish()
    }
}

/// Holds every defined resource, keyed by name.
#[derive(Default)]
pub struct Registry {
    definitions: HashMap<String, ResourceDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a definition. Fails without side effects when the
    /// name is empty, already taken, or a collection lacks an id attribute.
    pub fn define(&mut self, config: ResourceConfig) -> Result<&ResourceDefinition, StoreError> {
        let definition = ResourceDefinition::from_config(config)?;
        if self.definitions.contains_key(definition.name()) {
            return Err(StoreError::Validation(format!(
                "resource '{}' is already defined",
                definition.name()
            )));
        }
        let name = definition.name().to_string();
        Ok(self.definitions.entry(name).or_insert(definition))
    }

    /// Look up a definition by name.
    pub fn definition(&self, name: &str) -> Result<&ResourceDefinition, StoreError> {
        self.definitions
            .get(name)
            .ok_or_else(|| StoreError::NotFound(format!("resource '{name}' is not defined")))
    }

    /// Drop every definition.
    pub fn reset(&mut self) {
        self.definitions.clear();
    }
}
