//! Actions and the graph shape of an action in progress.
//!
//! Selecting an option creates a dedicated action entity:
//!
//! ```text
//! agent --performing--> action --targeting--> target
//!                              \--using-----> instrument
//! ```
//!
//! The action entity carries an `action` component holding the definition
//! name, the progress made so far and the agent.

use std::sync::Arc;

use eko_foundation::{Entity, Error, Result, Value};
use eko_storage::Model;

/// Component type holding an action's state.
pub const ACTION: &str = "action";
/// Edge from an agent to the action it is performing.
pub const PERFORMING: &str = "performing";
/// Edge from an action to its target.
pub const TARGETING: &str = "targeting";
/// Edge from an action to its instrument.
pub const USING: &str = "using";
/// Edge from a container to its contents.
pub const CONTAINS: &str = "contains";

/// Who is acting, on what, with what.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionContext {
    /// The performing agent.
    pub agent: Entity,
    /// The target, if any.
    pub target: Option<Entity>,
    /// The instrument, if any.
    pub using: Option<Entity>,
}

impl ActionContext {
    /// A context with only an agent.
    #[must_use]
    pub fn new(agent: Entity) -> Self {
        Self {
            agent,
            target: None,
            using: None,
        }
    }

    /// Builder method to set the target.
    #[must_use]
    pub fn with_target(mut self, target: Option<Entity>) -> Self {
        self.target = target;
        self
    }

    /// Builder method to set the instrument.
    #[must_use]
    pub fn with_using(mut self, using: Option<Entity>) -> Self {
        self.using = using;
        self
    }
}

/// A time-consuming, rule-gated graph mutation.
pub trait Action: Send + Sync {
    /// Ticks of progress needed before the action completes.
    fn duration(&self) -> u32;

    /// True if the action applies in `context`.
    ///
    /// Called repeatedly during option discovery; must not mutate anything.
    fn matches(&self, model: &Model, context: &ActionContext) -> bool;

    /// Applies the action's effect.
    ///
    /// # Errors
    ///
    /// Any graph error. Effects already applied are not rolled back.
    fn complete(&self, model: &mut Model, context: &ActionContext) -> Result<()>;

    /// Display text for an option or a pending action.
    fn name(&self, model: &Model, context: &ActionContext) -> String;
}

/// A selectable way for an agent to act.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOption {
    /// Registered action name.
    pub action: Arc<str>,
    /// Display text.
    pub label: String,
    /// Agent, target and instrument.
    pub context: ActionContext,
}

/// Snapshot of an action entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionState {
    /// The action entity.
    pub entity: Entity,
    /// Registered action name.
    pub name: Arc<str>,
    /// Ticks of progress made.
    pub progress: i64,
    /// Agent, target and instrument, resolved from the graph.
    pub context: ActionContext,
}

impl ActionState {
    /// Reads the action stored on `entity`.
    ///
    /// Returns `None` if the entity carries no readable action state. Target
    /// and instrument resolve to `None` once their edges are gone.
    #[must_use]
    pub fn read(model: &Model, entity: Entity) -> Option<Self> {
        let name = model.get(entity, ACTION, "name")?.as_str()?;
        let agent = model.get(entity, ACTION, "agent")?.as_entity()?;
        let progress = model
            .get(entity, ACTION, "progress")
            .and_then(Value::as_int)
            .unwrap_or(0);
        let context = ActionContext::new(agent)
            .with_target(model.targets(entity, TARGETING).first().copied())
            .with_using(model.targets(entity, USING).first().copied());
        Some(Self {
            entity,
            name: name.into(),
            progress,
            context,
        })
    }

    /// True if `progress` has reached `duration`.
    #[must_use]
    pub fn is_due(&self, duration: u32) -> bool {
        self.progress >= i64::from(duration)
    }
}

/// Creates the action entity for `option` with zero progress.
///
/// # Errors
///
/// Propagates graph errors.
pub fn begin(model: &mut Model, option: &ActionOption) -> Result<Entity> {
    let ActionContext {
        agent,
        target,
        using,
    } = option.context;
    let action = model.entity();
    model.set(action, ACTION, "name", Arc::clone(&option.action))?;
    model.set(action, ACTION, "progress", 0)?;
    model.set(action, ACTION, "agent", agent)?;
    model.link(agent, PERFORMING, action)?;
    if let Some(target) = target {
        model.link(action, TARGETING, target)?;
    }
    if let Some(using) = using {
        model.link(action, USING, using)?;
    }
    Ok(action)
}

/// Adds one tick of progress to an action entity.
///
/// # Errors
///
/// `StaleHandle` if the entity holds no action component.
pub fn advance(model: &mut Model, action: Entity) -> Result<i64> {
    let progress = model
        .get(action, ACTION, "progress")
        .and_then(Value::as_int)
        .ok_or_else(|| Error::stale_handle(action))?
        + 1;
    model.set(action, ACTION, "progress", progress)?;
    Ok(progress)
}

/// Every entity carrying action state, ordered by entity.
#[must_use]
pub fn in_progress(model: &Model) -> Vec<Entity> {
    model
        .components_of_type(ACTION)
        .into_iter()
        .filter_map(|c| model.component_entity(c))
        .collect()
}

/// The action `agent` is currently performing, if any.
#[must_use]
pub fn current(model: &Model, agent: Entity) -> Option<Entity> {
    model
        .targets(agent, PERFORMING)
        .into_iter()
        .find(|&action| model.get(action, ACTION, "name").is_some())
}
