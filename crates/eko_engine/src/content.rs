//! Authored content the kernel invokes by name.
//!
//! Content is kept on typed shelves, one per [`ContentKind`]. Every shelf
//! remembers registration order: option discovery walks actions in that
//! order and `start` runs initials in that order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use eko_foundation::{Entity, Error, Result, Value};
use eko_storage::Model;

use crate::action::Action;
use crate::simulation::Simulation;

// =============================================================================
// Content Kinds
// =============================================================================

/// The kinds of authored content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    /// Time-consuming, rule-gated graph mutations.
    Action,
    /// Named behaviour invoked on an entity or the model.
    Method,
    /// Text rendering for one component type.
    Description,
    /// Recipe that populates a new entity.
    Template,
    /// World setup run by `start`.
    Initial,
}

impl ContentKind {
    /// The lowercase name used in lookups and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Method => "method",
            Self::Description => "description",
            Self::Template => "template",
            Self::Initial => "initial",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// What a method is invoked on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// The model itself.
    Model,
    /// One entity.
    Entity(Entity),
}

impl Receiver {
    /// The receiving entity.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the method was invoked on the model.
    pub fn entity(self) -> Result<Entity> {
        match self {
            Self::Entity(entity) => Ok(entity),
            Self::Model => Err(Error::invalid_argument(
                "method requires an entity receiver",
            )),
        }
    }
}

/// A named behaviour.
pub trait Method: Send + Sync {
    /// Invokes the method.
    ///
    /// # Errors
    ///
    /// Whatever the method reports.
    fn call(&self, model: &mut Model, receiver: Receiver, args: &[Value]) -> Result<Value>;
}

impl<F> Method for F
where
    F: Fn(&mut Model, Receiver, &[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, model: &mut Model, receiver: Receiver, args: &[Value]) -> Result<Value> {
        self(model, receiver, args)
    }
}

/// Renders one component of an entity as text.
pub trait Description: Send + Sync {
    /// The text, or `None` to stay silent.
    fn describe(&self, model: &Model, entity: Entity) -> Option<String>;
}

impl<F> Description for F
where
    F: Fn(&Model, Entity) -> Option<String> + Send + Sync,
{
    fn describe(&self, model: &Model, entity: Entity) -> Option<String> {
        self(model, entity)
    }
}

/// Populates a freshly created entity.
pub trait Template: Send + Sync {
    /// Builds the entity.
    ///
    /// # Errors
    ///
    /// Propagates graph errors.
    fn build(&self, model: &mut Model, entity: Entity) -> Result<()>;
}

impl<F> Template for F
where
    F: Fn(&mut Model, Entity) -> Result<()> + Send + Sync,
{
    fn build(&self, model: &mut Model, entity: Entity) -> Result<()> {
        self(model, entity)
    }
}

/// Sets up the world when a simulation starts.
pub trait Initial: Send + Sync {
    /// Runs the setup.
    ///
    /// # Errors
    ///
    /// Propagates graph and content errors.
    fn run(&self, simulation: &mut Simulation) -> Result<()>;
}

impl<F> Initial for F
where
    F: Fn(&mut Simulation) -> Result<()> + Send + Sync,
{
    fn run(&self, simulation: &mut Simulation) -> Result<()> {
        self(simulation)
    }
}

// =============================================================================
// Shelf
// =============================================================================

/// Named definitions of one kind, in registration order.
pub struct Shelf<T: ?Sized> {
    kind: ContentKind,
    entries: Vec<(Arc<str>, Arc<T>)>,
    positions: BTreeMap<Arc<str>, usize>,
}

impl<T: ?Sized> Shelf<T> {
    /// Creates an empty shelf.
    #[must_use]
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            positions: BTreeMap::new(),
        }
    }

    /// The kind stored on this shelf.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Looks up a definition.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<T>> {
        self.positions
            .get(name)
            .map(|&i| Arc::clone(&self.entries[i].1))
            .ok_or_else(|| Error::not_found(self.kind.as_str(), name))
    }

    /// Every definition in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<(Arc<str>, Arc<T>)> {
        self.entries
            .iter()
            .map(|(name, def)| (Arc::clone(name), Arc::clone(def)))
            .collect()
    }

    /// Registers a definition.
    ///
    /// Re-registering a name replaces the definition and keeps its original
    /// position.
    pub fn set(&mut self, name: impl Into<Arc<str>>, definition: Arc<T>) {
        let name = name.into();
        if let Some(&i) = self.positions.get(&name) {
            self.entries[i].1 = definition;
        } else {
            self.positions.insert(Arc::clone(&name), self.entries.len());
            self.entries.push((name, definition));
        }
    }

    /// True if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_ref())
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Clone for Shelf<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            entries: self.entries.clone(),
            positions: self.positions.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Shelf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shelf")
            .field("kind", &self.kind)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// Content Registry
// =============================================================================

/// Every shelf of authored content.
#[derive(Clone, Debug)]
pub struct ContentRegistry {
    actions: Shelf<dyn Action>,
    methods: Shelf<dyn Method>,
    descriptions: Shelf<dyn Description>,
    templates: Shelf<dyn Template>,
    initials: Shelf<dyn Initial>,
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegistry {
    /// Creates a registry with every shelf empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Shelf::new(ContentKind::Action),
            methods: Shelf::new(ContentKind::Method),
            descriptions: Shelf::new(ContentKind::Description),
            templates: Shelf::new(ContentKind::Template),
            initials: Shelf::new(ContentKind::Initial),
        }
    }

    /// Registered actions.
    #[must_use]
    pub fn actions(&self) -> &Shelf<dyn Action> {
        &self.actions
    }

    /// Registered actions, mutably.
    pub fn actions_mut(&mut self) -> &mut Shelf<dyn Action> {
        &mut self.actions
    }

    /// Registered methods.
    #[must_use]
    pub fn methods(&self) -> &Shelf<dyn Method> {
        &self.methods
    }

    /// Registered methods, mutably.
    pub fn methods_mut(&mut self) -> &mut Shelf<dyn Method> {
        &mut self.methods
    }

    /// Registered descriptions, keyed by component type.
    #[must_use]
    pub fn descriptions(&self) -> &Shelf<dyn Description> {
        &self.descriptions
    }

    /// Registered descriptions, mutably.
    pub fn descriptions_mut(&mut self) -> &mut Shelf<dyn Description> {
        &mut self.descriptions
    }

    /// Registered templates.
    #[must_use]
    pub fn templates(&self) -> &Shelf<dyn Template> {
        &self.templates
    }

    /// Registered templates, mutably.
    pub fn templates_mut(&mut self) -> &mut Shelf<dyn Template> {
        &mut self.templates
    }

    /// Registered initials.
    #[must_use]
    pub fn initials(&self) -> &Shelf<dyn Initial> {
        &self.initials
    }

    /// Registered initials, mutably.
    pub fn initials_mut(&mut self) -> &mut Shelf<dyn Initial> {
        &mut self.initials
    }

    /// Names registered under `kind`, in registration order.
    #[must_use]
    pub fn names(&self, kind: ContentKind) -> Vec<Arc<str>> {
        fn collect<T: ?Sized>(shelf: &Shelf<T>) -> Vec<Arc<str>> {
            shelf.entries.iter().map(|(n, _)| Arc::clone(n)).collect()
        }
        match kind {
            ContentKind::Action => collect(&self.actions),
            ContentKind::Method => collect(&self.methods),
            ContentKind::Description => collect(&self.descriptions),
            ContentKind::Template => collect(&self.templates),
            ContentKind::Initial => collect(&self.initials),
        }
    }

    /// Invokes method `name` on `receiver`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the method is not registered, or whatever it reports.
    pub fn call(
        &self,
        model: &mut Model,
        name: &str,
        receiver: Receiver,
        args: &[Value],
    ) -> Result<Value> {
        self.methods.get(name)?.call(model, receiver, args)
    }
}
