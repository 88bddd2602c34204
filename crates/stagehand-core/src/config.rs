//! Engine configuration
//!
//! Groups the physics constants with the dispatch and RNG settings a game
//! runs with. Loadable from RON through `stagehand-script`.

use crate::level::DEFAULT_CASCADE_LIMIT;
use crate::PhysicsConfig;
use serde::{Deserialize, Serialize};

/// Upper bound for [`EngineConfig::max_cascade_depth`]
pub const MAX_CASCADE_DEPTH: usize = 64;

/// Configuration for a game run
///
/// # Example
///
/// ```
/// use stagehand_core::EngineConfig;
///
/// let mut config = EngineConfig::default();
/// assert_eq!(config.max_cascade_depth(), 8);
///
/// // Clamped to [1, 64]
/// config.set_max_cascade_depth(0);
/// assert_eq!(config.max_cascade_depth(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    physics: PhysicsConfig,
    /// How many rounds of attribute-change events one dispatch may chain
    max_cascade_depth: usize,
    /// Seed for each level's placement RNG (offset by the level's index)
    rng_seed: u64,
}

impl EngineConfig {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            physics,
            ..Self::default()
        }
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    /// The cascade limit, clamped to `[1, MAX_CASCADE_DEPTH]`
    ///
    /// Loaded files are not validated, so the clamp applies on read as well.
    pub fn max_cascade_depth(&self) -> usize {
        self.max_cascade_depth.clamp(1, MAX_CASCADE_DEPTH)
    }

    /// Set the cascade limit, clamped to `[1, MAX_CASCADE_DEPTH]`
    pub fn set_max_cascade_depth(&mut self, depth: usize) {
        self.max_cascade_depth = depth.clamp(1, MAX_CASCADE_DEPTH);
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            max_cascade_depth: DEFAULT_CASCADE_LIMIT,
            rng_seed: 12345,
        }
    }
}
