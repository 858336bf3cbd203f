//! Configuration for the update cycle.

/// Default cap on steps a single update may fast-forward.
pub const DEFAULT_MAX_STEPS_PER_UPDATE: u32 = 1_000;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of steps one `update` may take before the kill switch
    /// trips.
    ///
    /// Zero-duration actions whose completion selects another zero-duration
    /// action never block the perspective, so the fast-forward loop needs a
    /// bound.
    pub max_steps_per_update: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps_per_update: DEFAULT_MAX_STEPS_PER_UPDATE,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the step cap.
    #[must_use]
    pub fn with_max_steps_per_update(mut self, steps: u32) -> Self {
        self.max_steps_per_update = steps;
        self
    }
}
