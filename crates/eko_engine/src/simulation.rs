//! The simulation facade.
//!
//! A [`Simulation`] ties a [`Model`] to the content that drives it and to the
//! perspective entity whose pending action gates [`update`](Simulation::update).

use eko_foundation::{Entity, Result, Value};
use eko_storage::Model;
use tracing::{debug, info};

use crate::action::{self, ActionOption};
use crate::config::EngineConfig;
use crate::content::{ContentRegistry, Receiver};
use crate::options;
use crate::tick::{TickExecutor, UpdateReport};

/// A running interactive-fiction world.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    /// The graph.
    model: Model,
    /// Authored content.
    content: ContentRegistry,
    /// Whose turn gates the update cycle.
    perspective: Option<Entity>,
    /// Update cycle driver.
    executor: TickExecutor,
}

impl Simulation {
    /// Creates a simulation over `content` with the default configuration.
    #[must_use]
    pub fn new(content: ContentRegistry) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.executor = self.executor.with_config(config);
        self
    }

    /// The graph.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The graph, mutably.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// The content registry.
    #[must_use]
    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    /// The content registry, mutably.
    pub fn content_mut(&mut self) -> &mut ContentRegistry {
        &mut self.content
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.executor.config()
    }

    /// Ticks taken since the simulation was created.
    #[must_use]
    pub fn tick_number(&self) -> u64 {
        self.executor.tick_number()
    }

    /// Resets the world and runs every initial in registration order.
    ///
    /// # Errors
    ///
    /// The first error raised by an initial; later initials do not run.
    pub fn start(&mut self) -> Result<()> {
        self.model.reset();
        self.perspective = None;
        let initials = self.content.initials().list();
        info!(initials = initials.len(), "starting simulation");
        for (name, initial) in initials {
            debug!(initial = %name, "running initial");
            initial.run(self)?;
        }
        Ok(())
    }

    /// Sets the entity whose pending action gates `update`.
    pub fn set_perspective(&mut self, entity: Option<Entity>) {
        self.perspective = entity;
    }

    /// The perspective entity.
    #[must_use]
    pub fn perspective(&self) -> Option<Entity> {
        self.perspective
    }

    /// Lists what `agent` can do to `target`.
    ///
    /// # Errors
    ///
    /// See [`options::get_options`].
    pub fn get_options(
        &mut self,
        agent: Entity,
        target: Option<Entity>,
    ) -> Result<Vec<ActionOption>> {
        options::get_options(&mut self.model, &self.content, agent, target)
    }

    /// Starts the action `option` describes, returning its action entity.
    ///
    /// # Errors
    ///
    /// `NotFound` if the option names an unregistered action.
    pub fn select(&mut self, option: &ActionOption) -> Result<Entity> {
        self.content.actions().get(&option.action)?;
        let action = action::begin(&mut self.model, option)?;
        debug!(action = %option.action, agent = %option.context.agent, "option selected");
        Ok(action)
    }

    /// Runs one update cycle.
    ///
    /// # Errors
    ///
    /// See [`TickExecutor::update`].
    pub fn update(&mut self) -> Result<UpdateReport> {
        self.executor
            .update(&mut self.model, &self.content, self.perspective)
    }

    /// Invokes method `name` on `entity`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the method is not registered, or whatever it reports.
    pub fn call(&mut self, name: &str, entity: Entity, args: &[Value]) -> Result<Value> {
        self.content
            .call(&mut self.model, name, Receiver::Entity(entity), args)
    }

    /// Invokes method `name` on the model.
    ///
    /// # Errors
    ///
    /// `NotFound` if the method is not registered, or whatever it reports.
    pub fn call_model(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        self.content
            .call(&mut self.model, name, Receiver::Model, args)
    }

    /// Creates a new entity and builds it with template `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the template is not registered, or whatever it reports.
    /// The entity is left in place if the template fails part way.
    pub fn instantiate(&mut self, name: &str) -> Result<Entity> {
        let template = self.content.templates().get(name)?;
        let entity = self.model.entity();
        self.model.create(entity);
        template.build(&mut self.model, entity)?;
        debug!(template = name, %entity, "instantiated");
        Ok(entity)
    }

    /// Describes `entity` by concatenating the descriptions of its
    /// components, in component-type order.
    ///
    /// Components without a registered description, and descriptions that
    /// return `None`, are skipped.
    #[must_use]
    pub fn describe(&self, entity: Entity) -> String {
        self.model
            .components(entity)
            .into_iter()
            .filter_map(|c| self.model.component_type(c))
            .filter_map(|ty| self.content.descriptions().get(ty).ok())
            .filter_map(|d| d.describe(&self.model, entity))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
