//! # Instance Cache
//!
//! Per-resource entity storage: one slot for singular resources, an
//! id-keyed mapping for collections. Every entry carries a `complete` flag
//! recording whether the entity's data is considered fully fetched; the
//! flag gates whether [`find`] touches the transport at all.
//!
//! Two rules govern every write:
//!
//! - **Identity**: an existing entry is merged in place, never replaced.
//!   Callers already holding the entity observe the new attributes through
//!   their own handle.
//! - **Monotonic completeness**: injecting as complete always upgrades an
//!   entry to complete; injecting as incomplete never downgrades one.
//!
//! [`find`]: crate::DataStore::find

use crate::definition::{ResourceDefinition, ResourceKind};
use crate::error::StoreError;
use crate::record::{Attributes, Entity, RecordId};
use serde_json::Value;
use std::collections::HashMap;

/// Options for [`inject`](crate::DataStore::inject).
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectOptions {
    /// Mark the injected data as partial: the entity must still be fetched
    /// before `find` can resolve it from cache.
    pub incomplete: bool,
}

impl InjectOptions {
    /// Shorthand for `InjectOptions { incomplete: true }`.
    pub fn incomplete() -> Self {
        Self { incomplete: true }
    }
}

/// Result of an inject, mirroring the shape of the input payload.
#[derive(Debug, Clone)]
pub enum Injected {
    One(Entity),
    Many(Vec<Entity>),
}

impl Injected {
    /// Flatten into a vector regardless of input shape.
    pub fn entities(self) -> Vec<Entity> {
        match self {
            Injected::One(entity) => vec![entity],
            Injected::Many(entities) => entities,
        }
    }
}

/// One cached entity plus its completeness flag.
#[derive(Debug)]
pub(crate) struct CacheEntry {
    pub(crate) entity: Entity,
    pub(crate) complete: bool,
}

/// Storage for one resource, dispatched by shape.
#[derive(Debug)]
enum ResourceCache {
    Singular(Option<CacheEntry>),
    Collection(HashMap<RecordId, CacheEntry>),
}

/// All cached entities, keyed by resource name.
#[derive(Debug, Default)]
pub(crate) struct InstanceCache {
    resources: HashMap<String, ResourceCache>,
}

impl InstanceCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set up empty storage for a freshly defined resource.
    pub(crate) fn init(&mut self, definition: &ResourceDefinition) {
        self.resources
            .insert(definition.name().to_string(), Self::empty(definition));
    }

    fn empty(definition: &ResourceDefinition) -> ResourceCache {
        match definition.kind() {
            ResourceKind::Singular => ResourceCache::Singular(None),
            ResourceKind::Collection => ResourceCache::Collection(HashMap::new()),
        }
    }

    fn slot_mut(&mut self, definition: &ResourceDefinition) -> &mut ResourceCache {
        self.resources
            .entry(definition.name().to_string())
            .or_insert_with(|| Self::empty(definition))
    }

    /// Merge `data` (one JSON object, or an array of objects for collection
    /// resources) into the cache. Every item is validated before any merge
    /// is applied, so a bad item leaves the cache untouched.
    pub(crate) fn inject(
        &mut self,
        definition: &ResourceDefinition,
        data: Value,
        options: InjectOptions,
    ) -> Result<Injected, StoreError> {
        match data {
            Value::Object(attrs) => match definition.kind() {
                ResourceKind::Singular => Ok(Injected::One(self.merge_singular(
                    definition,
                    attrs,
                    options.incomplete,
                ))),
                ResourceKind::Collection => {
                    let id = Self::item_id(definition, &attrs)?;
                    Ok(Injected::One(self.merge_keyed(
                        definition,
                        id,
                        attrs,
                        options.incomplete,
                    )))
                }
            },
            Value::Array(items) => {
                if definition.kind() != ResourceKind::Collection {
                    return Err(StoreError::Validation(format!(
                        "cannot inject a sequence into singular resource '{}'",
                        definition.name()
                    )));
                }
                let mut batch = Vec::with_capacity(items.len());
                for item in items {
                    let Value::Object(attrs) = item else {
                        return Err(StoreError::Validation(format!(
                            "inject into '{}' expects JSON objects",
                            definition.name()
                        )));
                    };
                    let id = Self::item_id(definition, &attrs)?;
                    batch.push((id, attrs));
                }
                let entities = batch
                    .into_iter()
                    .map(|(id, attrs)| self.merge_keyed(definition, id, attrs, options.incomplete))
                    .collect();
                Ok(Injected::Many(entities))
            }
            _ => Err(StoreError::Validation(format!(
                "inject into '{}' expects a JSON object or an array of objects",
                definition.name()
            ))),
        }
    }

    fn item_id(definition: &ResourceDefinition, attrs: &Attributes) -> Result<RecordId, StoreError> {
        // id_attribute presence is validated at definition time
        let id_attribute = definition.id_attribute().unwrap_or("id");
        attrs
            .get(id_attribute)
            .and_then(RecordId::from_value)
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "record for resource '{}' is missing id attribute '{}'",
                    definition.name(),
                    id_attribute
                ))
            })
    }

    fn merge_singular(
        &mut self,
        definition: &ResourceDefinition,
        attrs: Attributes,
        incomplete: bool,
    ) -> Entity {
        let slot = self.slot_mut(definition);
        let ResourceCache::Singular(entry) = slot else {
            // kind is fixed at definition time
            *slot = ResourceCache::Singular(None);
            return self.merge_singular(definition, attrs, incomplete);
        };
        match entry {
            Some(entry) => {
                entry.entity.set_attributes(attrs);
                if !incomplete {
                    entry.complete = true;
                }
                entry.entity.clone()
            }
            None => {
                let mut record = definition.new_record();
                record.set_attributes(attrs);
                let entity = Entity::new(record);
                *entry = Some(CacheEntry {
                    entity: entity.clone(),
                    complete: !incomplete,
                });
                entity
            }
        }
    }

    fn merge_keyed(
        &mut self,
        definition: &ResourceDefinition,
        id: RecordId,
        attrs: Attributes,
        incomplete: bool,
    ) -> Entity {
        let slot = self.slot_mut(definition);
        let ResourceCache::Collection(entries) = slot else {
            // kind is fixed at definition time
            *slot = ResourceCache::Collection(HashMap::new());
            return self.merge_keyed(definition, id, attrs, incomplete);
        };
        match entries.get_mut(&id) {
            Some(entry) => {
                entry.entity.set_attributes(attrs);
                if !incomplete {
                    entry.complete = true;
                }
                entry.entity.clone()
            }
            None => {
                let mut record = definition.new_record();
                record.set_attributes(attrs);
                let entity = Entity::new(record);
                entries.insert(
                    id,
                    CacheEntry {
                        entity: entity.clone(),
                        complete: !incomplete,
                    },
                );
                entity
            }
        }
    }

    /// Look up a cached entity. Singular resources ignore the id; collection
    /// lookups require one.
    pub(crate) fn get(
        &self,
        definition: &ResourceDefinition,
        id: Option<&RecordId>,
    ) -> Result<Option<Entity>, StoreError> {
        match self.resources.get(definition.name()) {
            Some(ResourceCache::Singular(entry)) => {
                Ok(entry.as_ref().map(|entry| entry.entity.clone()))
            }
            Some(ResourceCache::Collection(entries)) => {
                let id = Self::require_id(definition, id)?;
                Ok(entries.get(id).map(|entry| entry.entity.clone()))
            }
            None => Ok(None),
        }
    }

    /// Snapshot of every cached entity for a resource.
    pub(crate) fn get_all(&self, definition: &ResourceDefinition) -> Vec<Entity> {
        match self.resources.get(definition.name()) {
            Some(ResourceCache::Singular(entry)) => {
                entry.iter().map(|entry| entry.entity.clone()).collect()
            }
            Some(ResourceCache::Collection(entries)) => {
                entries.values().map(|entry| entry.entity.clone()).collect()
            }
            None => Vec::new(),
        }
    }

    /// Remove one entry. Removing an absent entry is not an error.
    pub(crate) fn eject(
        &mut self,
        definition: &ResourceDefinition,
        id: Option<&RecordId>,
    ) -> Result<(), StoreError> {
        match self.resources.get_mut(definition.name()) {
            Some(ResourceCache::Singular(entry)) => {
                *entry = None;
                Ok(())
            }
            Some(ResourceCache::Collection(entries)) => {
                let id = Self::require_id(definition, id)?;
                entries.remove(id);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Remove every entry for a resource, keeping the definition.
    pub(crate) fn eject_all(&mut self, definition: &ResourceDefinition) {
        if let Some(slot) = self.resources.get_mut(definition.name()) {
            *slot = Self::empty(definition);
        }
    }

    /// True iff a cached entry exists and no further fetch is required.
    pub(crate) fn is_complete(
        &self,
        definition: &ResourceDefinition,
        id: Option<&RecordId>,
    ) -> bool {
        match self.resources.get(definition.name()) {
            Some(ResourceCache::Singular(entry)) => {
                entry.as_ref().is_some_and(|entry| entry.complete)
            }
            Some(ResourceCache::Collection(entries)) => id
                .and_then(|id| entries.get(id))
                .is_some_and(|entry| entry.complete),
            None => false,
        }
    }

    /// The coordinator's merge step: merge fetched attributes in place and
    /// mark the entry complete, as one atomic mutation. Re-inserts the entry
    /// when it was ejected mid-flight.
    pub(crate) fn complete_fetch(
        &mut self,
        definition: &ResourceDefinition,
        id: Option<&RecordId>,
        mut attrs: Attributes,
    ) -> Entity {
        match (definition.kind(), id) {
            (ResourceKind::Collection, Some(id)) => {
                if let Some(id_attribute) = definition.id_attribute() {
                    attrs
                        .entry(id_attribute.to_string())
                        .or_insert_with(|| id.to_value());
                }
                self.merge_keyed(definition, id.clone(), attrs, false)
            }
            _ => self.merge_singular(definition, attrs, false),
        }
    }

    /// Insert an incomplete skeleton entry for a pending fetch, seeding the
    /// id attribute when known. Callers that `get` the entity while the
    /// fetch is in flight share identity with what `find` later resolves.
    pub(crate) fn seed_incomplete(
        &mut self,
        definition: &ResourceDefinition,
        id: Option<&RecordId>,
    ) -> Entity {
        let mut attrs = Attributes::new();
        match (definition.kind(), id) {
            (ResourceKind::Collection, Some(id)) => {
                if let Some(id_attribute) = definition.id_attribute() {
                    attrs.insert(id_attribute.to_string(), id.to_value());
                }
                self.merge_keyed(definition, id.clone(), attrs, true)
            }
            _ => self.merge_singular(definition, attrs, true),
        }
    }

    fn require_id<'a>(
        definition: &ResourceDefinition,
        id: Option<&'a RecordId>,
    ) -> Result<&'a RecordId, StoreError> {
        id.ok_or_else(|| {
            StoreError::Validation(format!(
                "collection resource '{}' requires an id",
                definition.name()
            ))
        })
    }

    /// Drop all cached state for every resource.
    pub(crate) fn clear(&mut self) {
        self.resources.clear();
    }
}
