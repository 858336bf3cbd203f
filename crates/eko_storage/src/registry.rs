//! Identity registry: which entities exist, and under which id.
//!
//! Ids come from a counter that only increases, so an id is never handed to
//! a second entity during the registry's lifetime, even after the first one
//! is removed.

use std::collections::BTreeMap;

use eko_foundation::Entity;

/// Bidirectional entity ↔ id mapping.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    /// Entity -> id.
    ids: BTreeMap<Entity, u64>,
    /// Id -> entity, ordered by id for stable enumeration.
    entities: BTreeMap<u64, Entity>,
    /// Next id to hand out.
    next_id: u64,
}

impl IdentityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity, returning its id.
    ///
    /// Idempotent: an entity already present keeps its id.
    pub fn add(&mut self, entity: Entity) -> u64 {
        if let Some(id) = self.ids.get(&entity) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(entity, id);
        self.entities.insert(id, entity);
        id
    }

    /// Unregisters an entity. Idempotent.
    ///
    /// Returns the id the entity held, if it was present.
    pub fn remove(&mut self, entity: Entity) -> Option<u64> {
        let id = self.ids.remove(&entity)?;
        self.entities.remove(&id);
        Some(id)
    }

    /// True if the entity is registered.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.ids.contains_key(&entity)
    }

    /// Looks up the entity registered under `id`.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    /// Looks up the id of a registered entity.
    #[must_use]
    pub fn id(&self, entity: Entity) -> Option<u64> {
        self.ids.get(&entity).copied()
    }

    /// All registered entities in ascending id order.
    #[must_use]
    pub fn list(&self) -> Vec<Entity> {
        self.entities.values().copied().collect()
    }

    /// Iterates registered entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.values().copied()
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id the next registration will receive.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
