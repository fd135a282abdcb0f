use bevy::prelude::*;
use nalgebra::Vector3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::utils::{
    SEA_LEVEL_AIR_DENSITY, TURBULENCE_TIME_SCALE_X, TURBULENCE_TIME_SCALE_Y,
    TURBULENCE_TIME_SCALE_Z,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Air density [kg/m³]
    pub air_density: f64,
    /// Constant wind in world space [m/s]
    pub wind_velocity: Vector3<f64>,
    pub turbulence_amplitude: f64,
    pub turbulence_frequency: f64,
    pub seed: u32,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            air_density: SEA_LEVEL_AIR_DENSITY,
            wind_velocity: Vector3::zeros(),
            turbulence_amplitude: 1.0,
            turbulence_frequency: 1.0,
            seed: 0,
        }
    }
}

/// Process-wide air model: base wind plus Perlin turbulence, and density.
///
/// Queries are pure functions of position and the elapsed simulation time;
/// the only mutation is [`Atmosphere::tick`].
#[derive(Resource)]
pub struct Atmosphere {
    config: AtmosphereConfig,
    perlin: Perlin,
    elapsed: f64,
}

impl Atmosphere {
    pub fn new(config: &AtmosphereConfig) -> Self {
        Self {
            config: config.clone(),
            perlin: Perlin::new(config.seed),
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &AtmosphereConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    /// Returns the configured density, not a gravitational value. Kept apart
    /// from [`Atmosphere::air_density_at`] so the two can diverge later.
    pub fn gravity_at(&self, _position: &Vector3<f64>) -> f64 {
        self.config.air_density
    }

    pub fn air_density_at(&self, _position: &Vector3<f64>) -> f64 {
        self.config.air_density
    }

    pub fn wind_at(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.config.wind_velocity + self.turbulence_at(position)
    }

    fn turbulence_at(&self, position: &Vector3<f64>) -> Vector3<f64> {
        let t = self.elapsed * self.config.turbulence_frequency;
        let sample = |phase: f64| {
            let offset = t * phase;
            self.perlin.get([
                offset + position.x,
                offset + position.y,
                offset + position.z,
            ])
        };

        Vector3::new(
            sample(TURBULENCE_TIME_SCALE_X),
            sample(TURBULENCE_TIME_SCALE_Y),
            sample(TURBULENCE_TIME_SCALE_Z),
        ) * self.config.turbulence_amplitude
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self::new(&AtmosphereConfig::default())
    }
}
