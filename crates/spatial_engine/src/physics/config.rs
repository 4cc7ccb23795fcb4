//! Physics settings

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::Vector3;

use super::verlet::HairConfig;

/// World-wide simulation settings
///
/// Every field has a default, so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration applied to every free point
    pub gravity: Vector3,
    /// Smallest step the world integrates, in seconds
    pub min_delta: f32,
    /// Largest step the world integrates, in seconds
    pub max_delta: f32,
    /// Relaxation passes for ropes added through [`World::add_rope`]
    ///
    /// [`World::add_rope`]: super::World::add_rope
    pub constraint_iterations: usize,
    /// Length of pointer rays cast from controller poses
    pub pointer_length: f32,
    /// Strand layout used by [`World::add_hair`]
    ///
    /// [`World::add_hair`]: super::World::add_hair
    pub hair: HairConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -9.81, 0.0),
            min_delta: 1.0 / 240.0,
            max_delta: 1.0 / 15.0,
            constraint_iterations: 4,
            pointer_length: 10.0,
            hair: HairConfig::default(),
        }
    }
}

impl Config for PhysicsConfig {}
