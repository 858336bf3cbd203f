//! The graph facade.
//!
//! `Model` is the unified interface to the identity registry and the two
//! structure stores. Entity, component and connection handles are plain
//! `Copy` values; every operation on them is routed through the model that
//! minted them.
//!
//! # Existence on write
//!
//! Creating a component first creates its owning entity, and creating a
//! connection first creates both endpoints. This is the only place the
//! kernel creates anything implicitly, and authored content depends on it
//! to skip existence checks: `model.set(cup, "container", "volume", 0.2)` on
//! a proposed `cup` brings the cup into existence.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use eko_foundation::{Direction, Entity, Error, Result, Value};
use tracing::{debug, trace};

use crate::component::{ComponentId, ComponentStore};
use crate::connection::{ConnectionId, ConnectionStore};
use crate::predicate::Predicate;
use crate::properties::PropertyMap;
use crate::registry::IdentityRegistry;

/// Aggregated properties of an entity, keyed by component type.
pub type Properties = BTreeMap<Arc<str>, PropertyMap>;

/// Origin tag for the next model. Zero is reserved for untagged handles.
static NEXT_ORIGIN: AtomicU32 = AtomicU32::new(1);

/// In-memory graph of entities, components and connections.
///
/// Every model tags the handles it mints with its own origin, so handles
/// from another model never name one of its entities. A clone keeps the
/// origin and accepts the original's handles.
#[derive(Clone, Debug)]
pub struct Model {
    /// Which entities exist.
    registry: IdentityRegistry,
    /// Typed attributes.
    components: ComponentStore,
    /// Typed directed edges.
    connections: ConnectionStore,
    /// Tag stamped on every handle this model mints.
    origin: u32,
    /// Next entity handle key.
    next_key: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            registry: IdentityRegistry::default(),
            components: ComponentStore::default(),
            connections: ConnectionStore::default(),
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
            next_key: 0,
        }
    }
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity registry.
    #[must_use]
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// The component store.
    #[must_use]
    pub fn component_store(&self) -> &ComponentStore {
        &self.components
    }

    /// The connection store.
    #[must_use]
    pub fn connection_store(&self) -> &ConnectionStore {
        &self.connections
    }

    // --- Entity Operations ---

    /// Proposes a new entity. It does not exist until created.
    pub fn entity(&mut self) -> Entity {
        let entity = Entity::new(self.origin, self.next_key);
        self.next_key += 1;
        entity
    }

    /// The entity registered under `id`, if any.
    #[must_use]
    pub fn entity_by_id(&self, id: u64) -> Option<Entity> {
        self.registry.get(id)
    }

    /// Live entities in ascending id order, optionally filtered.
    #[must_use]
    pub fn entities(&self, predicate: Option<&Predicate>) -> Vec<Entity> {
        self.registry
            .iter()
            .filter(|e| predicate.is_none_or(|p| self.matches(*e, p)))
            .collect()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if no entity exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registers an entity. Idempotent.
    pub fn create(&mut self, entity: Entity) -> Entity {
        if !self.registry.contains(entity) {
            let id = self.registry.add(entity);
            debug!(%entity, id, "entity created");
        }
        entity
    }

    /// Deletes an entity with everything hanging off it.
    ///
    /// Attached components go first, then incident connections in both
    /// directions, then the registration. Every handle scoped to the entity
    /// (including proposed components and connections) becomes stale.
    pub fn delete(&mut self, entity: Entity) {
        for component in self.components.attached(entity) {
            self.delete_component(component);
        }
        for connection in self.connections.list_by_entity(entity, Direction::Both, None) {
            self.delete_connection(connection);
        }
        self.components.release_entity(entity);
        self.connections.release_entity(entity);
        if let Some(id) = self.registry.remove(entity) {
            debug!(%entity, id, "entity deleted");
        }
    }

    /// True if the entity is registered.
    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.registry.contains(entity)
    }

    /// The id of a registered entity.
    #[must_use]
    pub fn id(&self, entity: Entity) -> Option<u64> {
        self.registry.id(entity)
    }

    /// The live component of `ty` on `entity`, or a proposed one.
    ///
    /// A blank proposal left over from an earlier lookup is handed out again
    /// instead of allocating another record.
    pub fn component(&mut self, entity: Entity, ty: &str) -> ComponentId {
        self.components
            .get(ty, entity)
            .or_else(|| self.components.blank_proposal(ty, entity))
            .unwrap_or_else(|| self.components.propose(ty, entity))
    }

    /// Frees a proposed component that will not be created.
    ///
    /// Returns false, and does nothing, if the component is live or the
    /// handle is stale.
    pub fn discard_component(&mut self, component: ComponentId) -> bool {
        self.components.discard(component)
    }

    /// Every live component on `entity`, ordered by type.
    #[must_use]
    pub fn components(&self, entity: Entity) -> Vec<ComponentId> {
        self.components.attached(entity)
    }

    /// Every live component of `ty`, ordered by owning entity.
    #[must_use]
    pub fn components_of_type(&self, ty: &str) -> Vec<ComponentId> {
        self.components.list_by_type(ty)
    }

    /// The live `ty` connection from `source` to `target`, or a proposed one.
    ///
    /// Blank proposals are reused the same way as for [`Model::component`].
    pub fn connection(&mut self, source: Entity, ty: &str, target: Entity) -> ConnectionId {
        self.connections
            .get(ty, source, target)
            .or_else(|| self.connections.blank_proposal(ty, source, target))
            .unwrap_or_else(|| self.connections.propose(ty, source, target))
    }

    /// Frees a proposed connection that will not be created.
    ///
    /// Returns false, and does nothing, if the connection is live or the
    /// handle is stale.
    pub fn discard_connection(&mut self, connection: ConnectionId) -> bool {
        self.connections.discard(connection)
    }

    /// Live connections incident to `entity`.
    #[must_use]
    pub fn connections(
        &self,
        entity: Entity,
        direction: Direction,
        ty: Option<&str>,
    ) -> Vec<ConnectionId> {
        self.connections.list_by_entity(entity, direction, ty)
    }

    /// Every live connection of `ty`.
    #[must_use]
    pub fn connections_of_type(&self, ty: &str) -> Vec<ConnectionId> {
        self.connections.list_by_type(ty)
    }

    /// Every attached component's properties, keyed by component type.
    #[must_use]
    pub fn properties(&self, entity: Entity) -> Properties {
        self.components
            .attached(entity)
            .into_iter()
            .filter_map(|id| self.components.record(id))
            .map(|record| (Arc::from(record.ty()), record.properties().get_all()))
            .collect()
    }

    /// Bulk-sets properties, creating each named component as needed.
    ///
    /// # Errors
    ///
    /// Propagates errors from component creation.
    pub fn set_properties(&mut self, entity: Entity, properties: &Properties) -> Result<()> {
        for (ty, values) in properties {
            let component = self.component(entity, ty);
            self.create_component(component)?;
            self.set_component_properties(
                component,
                values.iter().map(|(k, v)| (k.clone(), v.clone())),
            )?;
        }
        Ok(())
    }

    /// True if `entity` satisfies every clause of `predicate`.
    ///
    /// A clause fails if the component is absent or any listed property is
    /// missing or unequal. Numbers compare across int and float.
    #[must_use]
    pub fn matches(&self, entity: Entity, predicate: &Predicate) -> bool {
        predicate.clauses().all(|(ty, expected)| {
            let Some(record) = self
                .components
                .get(ty, entity)
                .and_then(|id| self.components.record(id))
            else {
                return false;
            };
            expected.iter().all(|(key, value)| {
                record
                    .properties()
                    .get(key)
                    .is_some_and(|actual| actual.loosely_equals(value))
            })
        })
    }

    /// Deletes every entity, returning the model to its empty state.
    ///
    /// Proposed structures that were never created are dropped too. Ids
    /// keep counting up from where they were.
    pub fn reset(&mut self) {
        let entities = self.registry.list();
        debug!(count = entities.len(), "resetting model");
        for entity in entities {
            if self.exists(entity) {
                self.delete(entity);
            }
        }
        self.components.clear();
        self.connections.clear();
    }

    // --- Component Operations ---

    /// Makes a component live, creating its entity first if needed.
    ///
    /// # Errors
    ///
    /// `Duplicate` if another live component holds the same type on the same
    /// entity; `StaleHandle` if the handle was freed.
    pub fn create_component(&mut self, component: ComponentId) -> Result<ComponentId> {
        let entity = self
            .components
            .record(component)
            .ok_or_else(|| Error::stale_handle(component))?
            .entity();
        if self.components.contains(component) {
            return Ok(component);
        }
        self.create(entity);
        self.components.add(component)?;
        trace!(%entity, ?component, "component created");
        Ok(component)
    }

    /// Takes a component out of the graph. No-op if it is not live.
    pub fn delete_component(&mut self, component: ComponentId) {
        if self.components.contains(component) {
            self.components.remove(component);
            trace!(?component, "component deleted");
        }
    }

    /// True if the component is live.
    #[must_use]
    pub fn component_exists(&self, component: ComponentId) -> bool {
        self.components.contains(component)
    }

    /// The component's type, unless the handle is stale.
    #[must_use]
    pub fn component_type(&self, component: ComponentId) -> Option<&str> {
        self.components.record(component).map(|r| r.ty())
    }

    /// The component's owning entity, unless the handle is stale.
    #[must_use]
    pub fn component_entity(&self, component: ComponentId) -> Option<Entity> {
        self.components.record(component).map(|r| r.entity())
    }

    /// Reads one property.
    #[must_use]
    pub fn component_property(&self, component: ComponentId, key: &str) -> Option<&Value> {
        self.components.record(component)?.properties().get(key)
    }

    /// Writes one property; `Nil` deletes the key.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the handle was freed.
    pub fn set_component_property(
        &mut self,
        component: ComponentId,
        key: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.components
            .record_mut(component)
            .ok_or_else(|| Error::stale_handle(component))?
            .properties_mut()
            .set(key, value);
        Ok(())
    }

    /// Snapshot of every property (empty for a stale handle).
    #[must_use]
    pub fn component_properties(&self, component: ComponentId) -> PropertyMap {
        self.components
            .record(component)
            .map(|r| r.properties().get_all())
            .unwrap_or_default()
    }

    /// Applies each entry with single-set semantics, in order.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the handle was freed.
    pub fn set_component_properties<K, V, I>(
        &mut self,
        component: ComponentId,
        entries: I,
    ) -> Result<()>
    where
        K: Into<Arc<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.components
            .record_mut(component)
            .ok_or_else(|| Error::stale_handle(component))?
            .properties_mut()
            .set_all(entries);
        Ok(())
    }

    // --- Connection Operations ---

    /// Makes a connection live, creating both endpoints first if needed.
    ///
    /// # Errors
    ///
    /// `Duplicate` if another live connection holds the same triple;
    /// `StaleHandle` if the handle was freed.
    pub fn create_connection(&mut self, connection: ConnectionId) -> Result<ConnectionId> {
        let record = self
            .connections
            .record(connection)
            .ok_or_else(|| Error::stale_handle(connection))?;
        let (source, target) = (record.source(), record.target());
        if self.connections.contains(connection) {
            return Ok(connection);
        }
        self.create(source);
        self.create(target);
        self.connections.add(connection)?;
        trace!(%source, %target, ?connection, "connection created");
        Ok(connection)
    }

    /// Takes a connection out of the graph. No-op if it is not live.
    pub fn delete_connection(&mut self, connection: ConnectionId) {
        if self.connections.contains(connection) {
            self.connections.remove(connection);
            trace!(?connection, "connection deleted");
        }
    }

    /// True if the connection is live.
    #[must_use]
    pub fn connection_exists(&self, connection: ConnectionId) -> bool {
        self.connections.contains(connection)
    }

    /// The connection's type, unless the handle is stale.
    #[must_use]
    pub fn connection_type(&self, connection: ConnectionId) -> Option<&str> {
        self.connections.record(connection).map(|r| r.ty())
    }

    /// The connection's source, unless the handle is stale.
    #[must_use]
    pub fn connection_source(&self, connection: ConnectionId) -> Option<Entity> {
        self.connections.record(connection).map(|r| r.source())
    }

    /// The connection's target, unless the handle is stale.
    #[must_use]
    pub fn connection_target(&self, connection: ConnectionId) -> Option<Entity> {
        self.connections.record(connection).map(|r| r.target())
    }

    /// Reads one property.
    #[must_use]
    pub fn connection_property(&self, connection: ConnectionId, key: &str) -> Option<&Value> {
        self.connections.record(connection)?.properties().get(key)
    }

    /// Writes one property; `Nil` deletes the key.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the handle was freed.
    pub fn set_connection_property(
        &mut self,
        connection: ConnectionId,
        key: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.connections
            .record_mut(connection)
            .ok_or_else(|| Error::stale_handle(connection))?
            .properties_mut()
            .set(key, value);
        Ok(())
    }

    /// Snapshot of every property (empty for a stale handle).
    #[must_use]
    pub fn connection_properties(&self, connection: ConnectionId) -> PropertyMap {
        self.connections
            .record(connection)
            .map(|r| r.properties().get_all())
            .unwrap_or_default()
    }

    /// Applies each entry with single-set semantics, in order.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the handle was freed.
    pub fn set_connection_properties<K, V, I>(
        &mut self,
        connection: ConnectionId,
        entries: I,
    ) -> Result<()>
    where
        K: Into<Arc<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.connections
            .record_mut(connection)
            .ok_or_else(|| Error::stale_handle(connection))?
            .properties_mut()
            .set_all(entries);
        Ok(())
    }

    // --- Shorthand used by authored content ---

    /// Reads property `key` of component `ty` on `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity, ty: &str, key: &str) -> Option<&Value> {
        let id = self.components.get(ty, entity)?;
        self.component_property(id, key)
    }

    /// Writes property `key` of component `ty` on `entity`, creating the
    /// component (and the entity) if needed.
    ///
    /// # Errors
    ///
    /// Propagates errors from component creation.
    pub fn set(
        &mut self,
        entity: Entity,
        ty: &str,
        key: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let component = self.component(entity, ty);
        self.create_component(component)?;
        self.set_component_property(component, key, value)
    }

    /// Ensures a live `ty` connection from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Propagates errors from connection creation.
    pub fn link(&mut self, source: Entity, ty: &str, target: Entity) -> Result<ConnectionId> {
        let connection = self.connection(source, ty, target);
        self.create_connection(connection)
    }

    /// Removes the `ty` connection from `source` to `target`, if live.
    pub fn unlink(&mut self, source: Entity, ty: &str, target: Entity) {
        if let Some(connection) = self.connections.get(ty, source, target) {
            self.delete_connection(connection);
        }
    }

    /// Targets of live `ty` connections leaving `source`.
    #[must_use]
    pub fn targets(&self, source: Entity, ty: &str) -> Vec<Entity> {
        self.connections.targets(source, ty)
    }

    /// Sources of live `ty` connections entering `target`.
    #[must_use]
    pub fn sources(&self, target: Entity, ty: &str) -> Vec<Entity> {
        self.connections.sources(target, ty)
    }
}
