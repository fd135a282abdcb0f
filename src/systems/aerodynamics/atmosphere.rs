use bevy::prelude::*;

use crate::resources::{Atmosphere, PhysicsConfig};

/// Advances turbulence time by one physics step.
pub fn atmosphere_tick_system(mut atmosphere: ResMut<Atmosphere>, config: Res<PhysicsConfig>) {
    atmosphere.tick(config.timestep);
}
