use bevy::prelude::*;

use crate::plugins::FlightSet;
use crate::resources::{Atmosphere, AtmosphereConfig, GroundConfig, GroundModel};
use crate::systems::atmosphere_tick_system;

/// Air and ground models shared by every body.
pub struct EnvironmentPlugin {
    pub atmosphere: AtmosphereConfig,
    pub ground: GroundConfig,
}

impl EnvironmentPlugin {
    pub fn new() -> Self {
        Self::with_config(AtmosphereConfig::default(), GroundConfig::default())
    }

    pub fn with_config(atmosphere: AtmosphereConfig, ground: GroundConfig) -> Self {
        Self { atmosphere, ground }
    }
}

impl Default for EnvironmentPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Atmosphere::new(&self.atmosphere))
            .insert_resource(GroundModel::new(&self.ground))
            .add_systems(
                FixedUpdate,
                atmosphere_tick_system.in_set(FlightSet::Environment),
            );
    }
}
