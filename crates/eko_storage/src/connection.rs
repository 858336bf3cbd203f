//! Connection storage with bidirectional indices.
//!
//! Connections are typed directed edges. The store keeps a type index keyed
//! by `(source, target)` plus per-entity outgoing and incoming indices, so
//! traversal is cheap in both directions. As with components, a record is
//! allocated at proposal time and only becomes live once added.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use eko_foundation::{Direction, Entity, Error, Result, StructureKind};

use crate::arena::{Arena, Key};
use crate::properties::PropertyBag;

/// Handle to a connection record.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub Key);

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({:?})", self.0)
    }
}

/// A typed directed edge record.
#[derive(Clone, Debug)]
pub struct ConnectionRecord {
    ty: Arc<str>,
    source: Entity,
    target: Entity,
    properties: PropertyBag,
    live: bool,
}

impl ConnectionRecord {
    /// The connection type tag.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The source entity.
    #[must_use]
    pub fn source(&self) -> Entity {
        self.source
    }

    /// The target entity.
    #[must_use]
    pub fn target(&self) -> Entity {
        self.target
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

/// Stores every connection record and indexes the live ones.
///
/// Maintains:
/// - Type index: type -> (source, target) -> connection
/// - Forward: source -> outgoing connections
/// - Reverse: target -> incoming connections
#[derive(Clone, Debug, Default)]
pub struct ConnectionStore {
    records: Arena<ConnectionRecord>,
    by_type: BTreeMap<Arc<str>, BTreeMap<(Entity, Entity), ConnectionId>>,
    outgoing: BTreeMap<Entity, BTreeSet<ConnectionId>>,
    incoming: BTreeMap<Entity, BTreeSet<ConnectionId>>,
    /// Every record touching an entity, live or not.
    scoped: BTreeMap<Entity, BTreeSet<ConnectionId>>,
}

impl ConnectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a record for a new, not yet live connection.
    pub fn propose(&mut self, ty: &str, source: Entity, target: Entity) -> ConnectionId {
        let id = ConnectionId(self.records.insert(ConnectionRecord {
            ty: ty.into(),
            source,
            target,
            properties: PropertyBag::new(),
            live: false,
        }));
        self.scoped.entry(source).or_default().insert(id);
        self.scoped.entry(target).or_default().insert(id);
        id
    }

    /// Makes a connection live.
    ///
    /// No-op if this connection is already live.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if a different live connection already occupies
    /// the same (type, source, target) triple, and `StaleHandle` if the
    /// record was freed.
    pub fn add(&mut self, id: ConnectionId) -> Result<()> {
        let record = self
            .records
            .get(id.0)
            .ok_or_else(|| Error::stale_handle(id))?;
        if record.live {
            return Ok(());
        }
        let (ty, source, target) = (record.ty.clone(), record.source, record.target);

        if let Some(existing) = self.get(&ty, source, target) {
            return Err(Error::duplicate(
                StructureKind::Connection,
                format!("{ty} from {source} to {target} (live as {existing:?})"),
            ));
        }

        self.by_type
            .entry(ty)
            .or_default()
            .insert((source, target), id);
        self.outgoing.entry(source).or_default().insert(id);
        self.incoming.entry(target).or_default().insert(id);
        if let Some(record) = self.records.get_mut(id.0) {
            record.live = true;
        }
        Ok(())
    }

    /// Takes a connection out of the indices. No-op if it is not live.
    pub fn remove(&mut self, id: ConnectionId) {
        let Some(record) = self.records.get_mut(id.0) else {
            return;
        };
        if !record.live {
            return;
        }
        record.live = false;
        let (ty, source, target) = (record.ty.clone(), record.source, record.target);

        if let Some(bucket) = self.by_type.get_mut(&ty) {
            bucket.remove(&(source, target));
            if bucket.is_empty() {
                self.by_type.remove(&ty);
            }
        }
        Self::prune(&mut self.outgoing, source, id);
        Self::prune(&mut self.incoming, target, id);
    }

    fn prune(index: &mut BTreeMap<Entity, BTreeSet<ConnectionId>>, entity: Entity, id: ConnectionId) {
        if let Some(bucket) = index.get_mut(&entity) {
            bucket.remove(&id);
            if bucket.is_empty() {
                index.remove(&entity);
            }
        }
    }

    /// True if the connection is live.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.records.get(id.0).is_some_and(|r| r.live)
    }

    /// The live connection of `ty` from `source` to `target`, if any.
    #[must_use]
    pub fn get(&self, ty: &str, source: Entity, target: Entity) -> Option<ConnectionId> {
        self.by_type.get(ty)?.get(&(source, target)).copied()
    }

    /// Every live connection of `ty`, ordered by (source, target).
    #[must_use]
    pub fn list_by_type(&self, ty: &str) -> Vec<ConnectionId> {
        self.by_type
            .get(ty)
            .map(|bucket| bucket.values().copied().collect())
            .unwrap_or_default()
    }

    /// Live connections incident to `entity`.
    ///
    /// `direction` selects outgoing, incoming, or both; `ty`, if given,
    /// additionally filters by edge type. A self-loop is reported once.
    #[must_use]
    pub fn list_by_entity(
        &self,
        entity: Entity,
        direction: Direction,
        ty: Option<&str>,
    ) -> Vec<ConnectionId> {
        let mut found = BTreeSet::new();
        if matches!(direction, Direction::Both | Direction::Outgoing) {
            if let Some(ids) = self.outgoing.get(&entity) {
                found.extend(ids.iter().copied());
            }
        }
        if matches!(direction, Direction::Both | Direction::Incoming) {
            if let Some(ids) = self.incoming.get(&entity) {
                found.extend(ids.iter().copied());
            }
        }

        found
            .into_iter()
            .filter(|id| match ty {
                Some(ty) => self.records.get(id.0).is_some_and(|r| &*r.ty == ty),
                None => true,
            })
            .collect()
    }

    /// Targets of live `ty` connections leaving `source`, ordered by target.
    #[must_use]
    pub fn targets(&self, source: Entity, ty: &str) -> Vec<Entity> {
        let Some(bucket) = self.by_type.get(ty) else {
            return Vec::new();
        };
        bucket
            .range((source, Entity::MIN)..=(source, Entity::MAX))
            .map(|((_, target), _)| *target)
            .collect()
    }

    /// Sources of live `ty` connections entering `target`.
    #[must_use]
    pub fn sources(&self, target: Entity, ty: &str) -> Vec<Entity> {
        self.list_by_entity(target, Direction::Incoming, Some(ty))
            .into_iter()
            .filter_map(|id| self.records.get(id.0).map(ConnectionRecord::source))
            .collect()
    }

    /// Resolves a record, live or proposed.
    #[must_use]
    pub fn record(&self, id: ConnectionId) -> Option<&ConnectionRecord> {
        self.records.get(id.0)
    }

    /// Resolves a record mutably.
    pub fn record_mut(&mut self, id: ConnectionId) -> Option<&mut ConnectionRecord> {
        self.records.get_mut(id.0)
    }

    /// A proposed `ty` record from `source` to `target` with no properties,
    /// if any.
    #[must_use]
    pub fn blank_proposal(&self, ty: &str, source: Entity, target: Entity) -> Option<ConnectionId> {
        self.scoped.get(&source)?.iter().copied().find(|id| {
            self.records.get(id.0).is_some_and(|r| {
                !r.live
                    && r.properties.is_empty()
                    && r.source == source
                    && r.target == target
                    && r.ty.as_ref() == ty
            })
        })
    }

    /// Frees a record that is not live.
    ///
    /// Returns false, and does nothing, for live or stale handles.
    pub fn discard(&mut self, id: ConnectionId) -> bool {
        let Some(record) = self.records.get(id.0) else {
            return false;
        };
        if record.live {
            return false;
        }
        let ends = [record.source, record.target];
        self.records.remove(id.0);
        for end in ends {
            if let Some(set) = self.scoped.get_mut(&end) {
                set.remove(&id);
                if set.is_empty() {
                    self.scoped.remove(&end);
                }
            }
        }
        true
    }

    /// Removes and frees every record touching `entity`.
    pub fn release_entity(&mut self, entity: Entity) {
        let Some(ids) = self.scoped.remove(&entity) else {
            return;
        };
        for id in ids {
            let other = self.records.get(id.0).map(|r| {
                if r.source == entity {
                    r.target
                } else {
                    r.source
                }
            });
            if let Some(other) = other {
                if let Some(set) = self.scoped.get_mut(&other) {
                    set.remove(&id);
                    if set.is_empty() {
                        self.scoped.remove(&other);
                    }
                }
            }
            self.remove(id);
            self.records.remove(id.0);
        }
    }

    /// Frees every record and empties every index.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_type.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.scoped.clear();
    }

    /// Number of live connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outgoing.values().map(BTreeSet::len).sum()
    }

    /// True if no connection is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }

    /// Number of allocated records, live or proposed.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of non-empty index buckets (type + outgoing + incoming).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.by_type.len() + self.outgoing.len() + self.incoming.len()
    }
}
