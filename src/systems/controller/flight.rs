use bevy::log::warn_once;
use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{
    ControlTorques, FlightController, FlightControllerConfig, ForceMode, PhysicsComponent,
    SpatialComponent, Wing,
};
use crate::resources::{GroundModel, GroundProbe, InputState, PhysicsConfig, RayLayer};
use crate::utils::{angle_around_axis, clamp01, normalize_or_zero};

const ONE_OVER_180: f64 = 1.0 / 180.0;

/// Player commands after inversion and optional quadratic shaping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInputs {
    pub pitch: f64,
    pub roll: f64,
    pub stunt: bool,
}

impl ControlInputs {
    pub fn from_axes(
        config: &FlightControllerConfig,
        vertical: f64,
        horizontal: f64,
        stunt: bool,
    ) -> Self {
        let mut pitch = vertical.clamp(-1.0, 1.0) * if config.invert_pitch { -1.0 } else { 1.0 };
        let mut roll = horizontal.clamp(-1.0, 1.0) * if config.invert_roll { -1.0 } else { 1.0 };
        if config.quadratic_input_scaling {
            pitch *= pitch.abs();
            roll *= roll.abs();
        }
        Self { pitch, roll, stunt }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlOutput {
    pub torques: ControlTorques,
    pub local_angular_velocity: Vector3<f64>,
    /// Pitch input left after the attitude limits took their share
    pub effective_pitch_input: f64,
    pub effective_roll_input: f64,
}

/// Lift scaling from altitude: fades out between the falloff heights above
/// the level base once in flight, and grows near the terrain.
pub fn lift_multiplier(
    config: &FlightControllerConfig,
    in_flight: bool,
    altitude: f64,
    level_base_altitude: f64,
) -> f64 {
    let mut factor = 1.0;
    if in_flight {
        factor -= clamp01(
            (level_base_altitude - config.lift_falloff_start)
                / (config.lift_falloff_end - config.lift_falloff_start),
        );
    }
    factor += (1.0 - clamp01(altitude / config.ground_effect_start)) * config.max_ground_effect;
    factor
}

/// Refresh altitude, flight flag, lift multiplier and flight statistics.
///
/// A ray that hits nothing leaves the previous altitude in place.
pub fn update_flight_sensors<P: GroundProbe>(
    controller: &mut FlightController,
    probe: &P,
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    dt: f64,
) {
    let range = controller.config.raycast_distance;
    if let Some(distance) = probe.raycast_down(position, range, RayLayer::Terrain) {
        controller.altitude = distance;
    }
    if let Some(distance) = probe.raycast_down(position, range, RayLayer::LevelBase) {
        controller.level_base_altitude = distance;
    }

    if !controller.in_flight && controller.level_base_altitude < controller.config.lift_falloff_start
    {
        controller.in_flight = true;
    }

    controller.lift_multiplier = lift_multiplier(
        &controller.config,
        controller.in_flight,
        controller.altitude,
        controller.level_base_altitude,
    );

    // Unguarded: level flight divides by zero
    let horizontal_speed = (velocity.x * velocity.x + velocity.z * velocity.z).sqrt();
    controller.glide_ratio = horizontal_speed / -velocity.y;

    controller.acceleration = (velocity - controller.previous_velocity) / dt;
    controller.previous_velocity = *velocity;
}

/// Steering and fly-by-wire torques for one physics step.
///
/// Pitch and roll are about the body X and Y axes, yaw about world +Y.
/// `angular_velocity` is in the world frame; `relative_velocity` is the
/// airflow the wing saw on its last evaluation.
pub fn calculate_flight_control(
    config: &FlightControllerConfig,
    inputs: &ControlInputs,
    attitude: &UnitQuaternion<f64>,
    angular_velocity: &Vector3<f64>,
    relative_velocity: &Vector3<f64>,
) -> ControlOutput {
    let stunt = inputs.stunt;
    let mut input_pitch = inputs.pitch;
    let mut input_roll = inputs.roll;
    let input_pitch_strength = input_pitch.abs();
    let input_roll_strength = input_roll.abs();

    let mut pitch = 0.0;
    let mut roll = 0.0;
    let mut yaw = 0.0;

    let forward = attitude * Vector3::y();
    let right = attitude * Vector3::x();
    let down = attitude * Vector3::z();
    let horizontal_forward = normalize_or_zero(&Vector3::new(forward.x, 0.0, forward.z));

    let belly_to_ground_roll = angle_around_axis(&-Vector3::y(), &down, &forward);
    let belly_to_ground_pitch = angle_around_axis(&horizontal_forward, &forward, &right);

    let nose_to_idle_pitch = config.idle_pitch_angle - belly_to_ground_pitch;
    let nose_to_velocity_pitch = angle_around_axis(relative_velocity, &forward, &right);
    let nose_to_velocity_yaw = angle_around_axis(relative_velocity, &forward, &down);

    let local_angular_velocity = attitude.inverse_transform_vector(angular_velocity);

    if !stunt {
        let damping = config.limit_damping_factor;

        let roll_dampening = (belly_to_ground_roll.abs() - config.max_roll_angle)
            .clamp(0.0, config.roll_falloff)
            / config.roll_falloff;
        let rolling_outward = (belly_to_ground_roll > config.max_roll_angle
            && local_angular_velocity.y > 0.0)
            || (belly_to_ground_roll < -config.max_roll_angle && local_angular_velocity.y < 0.0);
        if rolling_outward {
            roll += -local_angular_velocity.y * roll_dampening * damping;
            input_roll *= 1.0 - roll_dampening;
        }

        let pitch_dampening_down = (belly_to_ground_pitch - config.max_down_pitch)
            .clamp(0.0, config.pitch_falloff)
            / config.pitch_falloff;
        let pitch_dampening_up = (nose_to_velocity_pitch + config.max_up_pitch)
            .clamp(-config.pitch_falloff, 0.0)
            / -config.pitch_falloff;

        if belly_to_ground_pitch > config.max_down_pitch && local_angular_velocity.x > 0.0 {
            pitch += -local_angular_velocity.x * pitch_dampening_down * damping;
            input_pitch *= 1.0 - pitch_dampening_down;
        }
        if nose_to_velocity_pitch < -config.max_up_pitch && local_angular_velocity.x < 0.0 {
            pitch += -local_angular_velocity.x * pitch_dampening_up * damping;
            input_pitch *= 1.0 - pitch_dampening_up;
        }
    }

    // Player input
    let (pitch_power, roll_power) = if stunt {
        (config.trick_pitch_power, config.trick_roll_power)
    } else {
        (config.input_pitch_power, config.input_roll_power)
    };
    pitch += input_pitch * pitch_power;
    roll += input_roll * roll_power;

    if !stunt {
        // Turn coordination
        yaw += -input_roll * config.input_yaw_power * 0.5;
        yaw += -belly_to_ground_roll * ONE_OVER_180 * config.input_yaw_power * 0.5;

        // Heading stability, suppressed by active input
        pitch += nose_to_idle_pitch
            * ONE_OVER_180
            * (1.0 - input_pitch_strength)
            * config.stability_pitch_power;
        roll += -belly_to_ground_roll
            * ONE_OVER_180
            * config.stability_roll_power
            * (1.0 - input_roll_strength);
        yaw += nose_to_velocity_yaw
            * ONE_OVER_180
            * (1.0 - input_roll_strength)
            * config.stability_yaw_power;
    }

    // Rate damping
    let pitch_scale = (1.0 - clamp01(input_pitch_strength)) * config.stability_factor;
    pitch += -local_angular_velocity.x * config.stability_pitch_power * pitch_scale;

    let roll_scale = (1.0 - clamp01(input_roll_strength)) * config.stability_factor;
    roll += -local_angular_velocity.y * config.stability_roll_power * roll_scale;
    yaw += -angular_velocity.y * config.stability_yaw_power * roll_scale;

    // Roll and yaw pull the nose down; cancel part of it
    if !stunt && pitch > 0.0 {
        pitch += (-roll.abs() - yaw.abs()) * (1.0 - input_pitch_strength);
    }

    ControlOutput {
        torques: ControlTorques { pitch, roll, yaw },
        local_angular_velocity,
        effective_pitch_input: input_pitch,
        effective_roll_input: input_roll,
    }
}

/// Altitude probes, lift multiplier and flight statistics.
pub fn flight_sensor_system(
    mut query: Query<(&mut FlightController, &mut Wing, &SpatialComponent)>,
    ground: Option<Res<GroundModel>>,
    physics_config: Res<PhysicsConfig>,
) {
    let Some(ground) = ground else {
        warn_once!("No ground model resource, altitudes are not updated");
        return;
    };

    for (mut controller, mut wing, spatial) in query.iter_mut() {
        if !controller.enabled {
            continue;
        }
        update_flight_sensors(
            &mut controller,
            &*ground,
            &spatial.position,
            &spatial.velocity,
            physics_config.timestep,
        );
        wing.lift_multiplier = controller.lift_multiplier;
    }
}

/// Applies steering torques as instantaneous angular velocity changes.
pub fn flight_control_system(
    mut query: Query<(
        &mut FlightController,
        &Wing,
        &SpatialComponent,
        &mut PhysicsComponent,
    )>,
    input: Res<InputState>,
) {
    for (mut controller, wing, spatial, mut physics) in query.iter_mut() {
        if !controller.enabled || physics.kinematic {
            continue;
        }

        let inputs =
            ControlInputs::from_axes(&controller.config, input.vertical, input.horizontal, input.jump_held);
        let output = calculate_flight_control(
            &controller.config,
            &inputs,
            &spatial.attitude,
            &spatial.angular_velocity,
            &wing.forces.relative_velocity,
        );

        let torques = output.torques;
        physics.add_torque(Vector3::new(0.0, torques.yaw, 0.0), ForceMode::VelocityChange);
        physics.add_torque(
            spatial.transform_direction(&Vector3::new(torques.pitch, torques.roll, 0.0)),
            ForceMode::VelocityChange,
        );

        controller.stunt = inputs.stunt;
        controller.local_angular_velocity = output.local_angular_velocity;
        controller.torques = torques;
    }
}
