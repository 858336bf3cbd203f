//! The update cycle.
//!
//! One tick adds a unit of progress to every action in progress and then
//! completes every action that has reached its duration. An update either
//! finishes the perspective's already-due action, or ticks until the
//! perspective is waiting on an action of its own or nothing is left in
//! progress. Other agents' actions and zero-duration actions are thereby
//! fast-forwarded inside a single update.

use eko_foundation::{Entity, Error, Result, SemanticLimit};
use eko_storage::Model;
use tracing::{debug, trace, warn};

use crate::action::{self, ActionState};
use crate::config::EngineConfig;
use crate::content::ContentRegistry;

// =============================================================================
// Update Report
// =============================================================================

/// Outcome of one update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Ticks taken.
    pub steps: u32,
    /// Action entities completed, in completion order.
    pub completed: Vec<Entity>,
}

impl UpdateReport {
    /// True if nothing happened.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.steps == 0 && self.completed.is_empty()
    }
}

// =============================================================================
// Tick Executor
// =============================================================================

/// Drives in-progress actions forward.
#[derive(Clone, Debug, Default)]
pub struct TickExecutor {
    /// Step cap and friends.
    config: EngineConfig,
    /// Ticks taken over the executor's lifetime.
    tick_number: u64,
}

impl TickExecutor {
    /// Creates an executor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks taken so far.
    #[must_use]
    pub fn tick_number(&self) -> u64 {
        self.tick_number
    }

    /// Runs one update on behalf of `perspective`.
    ///
    /// # Errors
    ///
    /// `NotFound` if an action entity names an unregistered action, any error
    /// raised by an action's `complete` (returned as is, with earlier effects
    /// kept), and `LimitExceeded` if the step cap is hit.
    pub fn update(
        &mut self,
        model: &mut Model,
        content: &ContentRegistry,
        perspective: Option<Entity>,
    ) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();

        if let Some(state) = perspective
            .and_then(|p| action::current(model, p))
            .and_then(|a| ActionState::read(model, a))
        {
            let definition = content.actions().get(&state.name)?;
            if state.is_due(definition.duration()) {
                Self::complete(model, content, &state)?;
                report.completed.push(state.entity);
                debug!(action = %state.name, "completed pending action");
                return Ok(report);
            }
        }

        loop {
            let pending = action::in_progress(model);
            if pending.is_empty() {
                break;
            }
            if report.steps >= self.config.max_steps_per_update {
                let limit = SemanticLimit::MaxSteps {
                    limit: self.config.max_steps_per_update,
                    pending: pending.len(),
                };
                warn!(%limit, "update aborted");
                return Err(Error::limit_exceeded(limit));
            }

            self.step(model, content, &pending, &mut report)?;

            if perspective.is_some_and(|p| action::current(model, p).is_some()) {
                break;
            }
        }

        debug!(
            steps = report.steps,
            completed = report.completed.len(),
            tick = self.tick_number,
            "update finished"
        );
        Ok(report)
    }

    /// Advances every pending action once, then completes the due ones,
    /// including zero-duration actions started by those completions.
    fn step(
        &mut self,
        model: &mut Model,
        content: &ContentRegistry,
        pending: &[Entity],
        report: &mut UpdateReport,
    ) -> Result<()> {
        for &entity in pending {
            if model.exists(entity) {
                action::advance(model, entity)?;
            }
        }
        self.tick_number += 1;
        report.steps += 1;
        trace!(tick = self.tick_number, pending = pending.len(), "tick");

        // Completions may start new zero-duration actions; those finish in
        // this tick too, so rescan until a pass completes nothing.
        let mut passes = 0;
        loop {
            let mut finished = false;
            for entity in action::in_progress(model) {
                let Some(state) = ActionState::read(model, entity) else {
                    continue;
                };
                let definition = content.actions().get(&state.name)?;
                if state.is_due(definition.duration()) {
                    Self::complete(model, content, &state)?;
                    report.completed.push(entity);
                    finished = true;
                }
            }
            if !finished {
                return Ok(());
            }
            passes += 1;
            if passes > self.config.max_steps_per_update {
                let limit = SemanticLimit::MaxSteps {
                    limit: self.config.max_steps_per_update,
                    pending: action::in_progress(model).len(),
                };
                warn!(%limit, tick = self.tick_number, "completion chain aborted");
                return Err(Error::limit_exceeded(limit));
            }
        }
    }

    /// Applies an action's effect and removes its entity.
    fn complete(model: &mut Model, content: &ContentRegistry, state: &ActionState) -> Result<()> {
        let definition = content.actions().get(&state.name)?;
        definition.complete(model, &state.context)?;
        if model.exists(state.entity) {
            model.delete(state.entity);
        }
        trace!(action = %state.name, entity = %state.entity, "action completed");
        Ok(())
    }
}
