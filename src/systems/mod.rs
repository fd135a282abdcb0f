pub mod aerodynamics;
mod collisions;
mod controller;
mod game;
pub mod physics;
mod score;

pub use aerodynamics::{atmosphere_tick_system, calculate_wing_forces, wing_force_system};
pub use collisions::{
    check_ground_contact, collision_detection_system, goal_zone_system, resolve_ground_contact,
};
pub use controller::{
    calculate_flight_control, flight_control_system, flight_sensor_system, lift_multiplier,
    update_flight_sensors, ControlInputs, ControlOutput,
};
pub use game::{apply_game_commands, game_state_system, ragdoll_lifetime_system};
pub use physics::{integrate_state, physics_integrator_system};
pub use score::score_system;
