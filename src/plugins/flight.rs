use bevy::prelude::*;

use crate::components::{CollisionEvent, GoalReachedEvent};
use crate::resources::{clear_input_edges_system, InputState, PhysicsConfig};
use crate::systems::{
    collision_detection_system, flight_control_system, flight_sensor_system, goal_zone_system,
    physics_integrator_system, wing_force_system,
};

/// Order of the fixed-step simulation
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum FlightSet {
    Environment,
    Sensors,
    Control,
    Aerodynamics,
    Integration,
    Contacts,
}

/// Wing aerodynamics, flight control and rigid-body integration on a fixed step.
pub struct FlightPlugin {
    pub physics: PhysicsConfig,
}

impl FlightPlugin {
    pub fn with_config(physics: PhysicsConfig) -> Self {
        Self { physics }
    }
}

impl Default for FlightPlugin {
    fn default() -> Self {
        Self::with_config(PhysicsConfig::default())
    }
}

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.physics.clone())
            .insert_resource(Time::<Fixed>::from_seconds(self.physics.timestep))
            .init_resource::<InputState>()
            .add_event::<CollisionEvent>()
            .add_event::<GoalReachedEvent>();

        app.configure_sets(
            FixedUpdate,
            (
                FlightSet::Environment,
                FlightSet::Sensors,
                FlightSet::Control,
                FlightSet::Aerodynamics,
                FlightSet::Integration,
                FlightSet::Contacts,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                flight_sensor_system.in_set(FlightSet::Sensors),
                flight_control_system.in_set(FlightSet::Control),
                wing_force_system.in_set(FlightSet::Aerodynamics),
                physics_integrator_system.in_set(FlightSet::Integration),
                (collision_detection_system, goal_zone_system)
                    .chain()
                    .in_set(FlightSet::Contacts),
            ),
        )
        .add_systems(Last, clear_input_edges_system);
    }
}
