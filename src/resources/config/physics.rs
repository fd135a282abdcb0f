use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{GliderError, GRAVITY, PHYSICS_TIMESTEP};

/// Rigid-body integration settings shared by every dynamic body.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed physics step [s]
    pub timestep: f64,
    /// Gravitational acceleration in world space [m/s²]
    pub gravity: Vector3<f64>,
    /// Fraction of linear velocity removed per second
    pub linear_damping: f64,
    /// Fraction of angular velocity removed per second
    pub angular_damping: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: PHYSICS_TIMESTEP,
            gravity: Vector3::new(0.0, -GRAVITY, 0.0),
            linear_damping: 0.0,
            angular_damping: 0.05,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), GliderError> {
        if !(self.timestep > 0.0 && self.timestep.is_finite()) {
            return Err(GliderError::InvalidConfig(format!(
                "physics timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.linear_damping < 0.0 || self.angular_damping < 0.0 {
            return Err(GliderError::InvalidConfig(
                "damping must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
