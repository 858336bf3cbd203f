//! Component storage indexed by (type, entity).
//!
//! A component record is allocated when the component is proposed and only
//! becomes *live* once added. Live components are reachable through two
//! indices, by type and by owning entity, and a bucket is pruned as soon as
//! its last component leaves it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use eko_foundation::{Entity, Error, Result, StructureKind};

use crate::arena::{Arena, Key};
use crate::properties::PropertyBag;

/// Handle to a component record.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub Key);

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({:?})", self.0)
    }
}

/// A typed attribute record owned by one entity.
#[derive(Clone, Debug)]
pub struct ComponentRecord {
    ty: Arc<str>,
    entity: Entity,
    properties: PropertyBag,
    live: bool,
}

impl ComponentRecord {
    /// The component type tag.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The owning entity.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The property bag.
    #[must_use]
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// The property bag, mutably.
    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// True if the record is registered in the indices.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }
}

/// Stores every component record and indexes the live ones.
#[derive(Clone, Debug, Default)]
pub struct ComponentStore {
    /// All records, live or proposed.
    records: Arena<ComponentRecord>,
    /// Live components: type -> entity -> component.
    by_type: BTreeMap<Arc<str>, BTreeMap<Entity, ComponentId>>,
    /// Live components: entity -> type -> component.
    by_entity: BTreeMap<Entity, BTreeMap<Arc<str>, ComponentId>>,
    /// Every record scoped to an entity, live or not.
    scoped: BTreeMap<Entity, BTreeSet<ComponentId>>,
}

impl ComponentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a record for a new, not yet live component.
    pub fn propose(&mut self, ty: &str, entity: Entity) -> ComponentId {
        let id = ComponentId(self.records.insert(ComponentRecord {
            ty: ty.into(),
            entity,
            properties: PropertyBag::new(),
            live: false,
        }));
        self.scoped.entry(entity).or_default().insert(id);
        id
    }

    /// Makes a component live.
    ///
    /// No-op if this component is already live.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if a different live component already occupies
    /// the same (type, entity) pair, and `StaleHandle` if the record was
    /// freed.
    pub fn add(&mut self, id: ComponentId) -> Result<()> {
        let record = self
            .records
            .get(id.0)
            .ok_or_else(|| Error::stale_handle(id))?;
        if record.live {
            return Ok(());
        }
        let (ty, entity) = (record.ty.clone(), record.entity);

        if let Some(existing) = self.get(&ty, entity) {
            return Err(Error::duplicate(
                StructureKind::Component,
                format!("{ty} on {entity} (live as {existing:?})"),
            ));
        }

        self.by_type
            .entry(ty.clone())
            .or_default()
            .insert(entity, id);
        self.by_entity.entry(entity).or_default().insert(ty, id);
        if let Some(record) = self.records.get_mut(id.0) {
            record.live = true;
        }
        Ok(())
    }

    /// Takes a component out of the indices. No-op if it is not live.
    ///
    /// The record and its properties survive, so the component can be
    /// added again later.
    pub fn remove(&mut self, id: ComponentId) {
        let Some(record) = self.records.get_mut(id.0) else {
            return;
        };
        if !record.live {
            return;
        }
        record.live = false;
        let (ty, entity) = (record.ty.clone(), record.entity);

        if let Some(bucket) = self.by_type.get_mut(&ty) {
            bucket.remove(&entity);
            if bucket.is_empty() {
                self.by_type.remove(&ty);
            }
        }
        if let Some(bucket) = self.by_entity.get_mut(&entity) {
            bucket.remove(&ty);
            if bucket.is_empty() {
                self.by_entity.remove(&entity);
            }
        }
    }

    /// True if the component is live.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.records.get(id.0).is_some_and(|r| r.live)
    }

    /// The live component of `ty` on `entity`, if any.
    #[must_use]
    pub fn get(&self, ty: &str, entity: Entity) -> Option<ComponentId> {
        self.by_type.get(ty)?.get(&entity).copied()
    }

    /// Every live component on `entity`, ordered by type.
    #[must_use]
    pub fn attached(&self, entity: Entity) -> Vec<ComponentId> {
        self.by_entity
            .get(&entity)
            .map(|bucket| bucket.values().copied().collect())
            .unwrap_or_default()
    }

    /// Every live component of `ty`, ordered by owning entity.
    #[must_use]
    pub fn list_by_type(&self, ty: &str) -> Vec<ComponentId> {
        self.by_type
            .get(ty)
            .map(|bucket| bucket.values().copied().collect())
            .unwrap_or_default()
    }

    /// Resolves a record, live or proposed.
    #[must_use]
    pub fn record(&self, id: ComponentId) -> Option<&ComponentRecord> {
        self.records.get(id.0)
    }

    /// Resolves a record mutably.
    pub fn record_mut(&mut self, id: ComponentId) -> Option<&mut ComponentRecord> {
        self.records.get_mut(id.0)
    }

    /// A proposed record of `ty` on `entity` with no properties, if any.
    #[must_use]
    pub fn blank_proposal(&self, ty: &str, entity: Entity) -> Option<ComponentId> {
        self.scoped.get(&entity)?.iter().copied().find(|id| {
            self.records.get(id.0).is_some_and(|r| {
                !r.live && r.properties.is_empty() && r.ty.as_ref() == ty
            })
        })
    }

    /// Frees a record that is not live.
    ///
    /// Returns false, and does nothing, for live or stale handles.
    pub fn discard(&mut self, id: ComponentId) -> bool {
        let Some(record) = self.records.get(id.0) else {
            return false;
        };
        if record.live {
            return false;
        }
        let entity = record.entity;
        self.records.remove(id.0);
        if let Some(set) = self.scoped.get_mut(&entity) {
            set.remove(&id);
            if set.is_empty() {
                self.scoped.remove(&entity);
            }
        }
        true
    }

    /// Removes and frees every record scoped to `entity`.
    ///
    /// Handles to those records become stale.
    pub fn release_entity(&mut self, entity: Entity) {
        let Some(ids) = self.scoped.remove(&entity) else {
            return;
        };
        for id in ids {
            self.remove(id);
            self.records.remove(id.0);
        }
    }

    /// Frees every record and empties every index.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_type.clear();
        self.by_entity.clear();
        self.scoped.clear();
    }

    /// Number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_entity.values().map(BTreeMap::len).sum()
    }

    /// True if no component is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Number of allocated records, live or proposed.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of non-empty index buckets (type buckets + entity buckets).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.by_type.len() + self.by_entity.len()
    }
}
