use bevy::log::warn_once;
use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{PhysicsComponent, SpatialComponent, Wing, WingForces};
use crate::resources::Atmosphere;
use crate::utils::{angle_around_axis, clamp_angle, normalize_or_zero, project};

/// Aerodynamic force of a wing for one physics step.
///
/// `wind` and `air_density` are the atmosphere samples at the body position.
/// The body's forward axis is its local +Y and its right axis local +X; the
/// wing's up axis is local -Y.
pub fn calculate_wing_forces(
    wing: &Wing,
    spatial: &SpatialComponent,
    wind: &Vector3<f64>,
    air_density: f64,
) -> WingForces {
    let config = wing.config();

    let relative_velocity = spatial.velocity - wind;
    let true_airspeed = relative_velocity.norm();

    let forward = spatial.transform_direction(&Vector3::y());
    let right = spatial.transform_direction(&Vector3::x());
    let up = spatial.transform_direction(&-Vector3::y());
    let horizontal_right = Vector3::new(right.x, 0.0, right.z);

    let angle_of_attack_pitch = angle_around_axis(&forward, &relative_velocity, &right);
    let angle_of_attack_yaw = angle_around_axis(&right, &relative_velocity, &up);

    // Lift fades out when the wing is not aligned with the flight direction
    let side_falloff = config
        .side_falloff_curve
        .evaluate(clamp_angle(angle_of_attack_yaw + 90.0, -360.0, 360.0, 180.0));

    let dynamic_pressure = 0.5 * air_density * true_airspeed * true_airspeed;

    let lift_coefficient = config.lift_curve.evaluate(angle_of_attack_pitch) * side_falloff;
    let lift = dynamic_pressure * wing.surface_area() * lift_coefficient * wing.lift_multiplier;
    let lift_vector = normalize_or_zero(&relative_velocity.cross(&right)) * lift;

    let drag_coefficient = config.drag_curve.evaluate(angle_of_attack_pitch);
    let drag = dynamic_pressure * wing.surface_area() * drag_coefficient;
    let drag_vector = -normalize_or_zero(&relative_velocity) * drag;

    // Lateral damping; part of the skid is turned into forward speed
    let side_slip = project(&relative_velocity, &horizontal_right);
    let mut slip_correction = -side_slip * config.slip_damping;
    slip_correction += forward * slip_correction.norm() * config.slip_to_thrust;

    WingForces {
        relative_velocity,
        true_airspeed,
        angle_of_attack_pitch,
        angle_of_attack_yaw,
        side_falloff,
        air_density,
        lift_coefficient,
        lift,
        lift_vector,
        drag_coefficient,
        drag,
        drag_vector,
        side_slip,
        slip_correction,
        total_force: lift_vector + drag_vector + slip_correction,
        application_point: spatial.transform_point(&config.center_of_pressure),
    }
}

/// Applies wing forces at the centre of pressure of every enabled wing.
pub fn wing_force_system(
    mut query: Query<(&mut Wing, &SpatialComponent, &mut PhysicsComponent)>,
    atmosphere: Option<Res<Atmosphere>>,
) {
    let Some(atmosphere) = atmosphere else {
        warn_once!("No atmosphere resource, wings produce no force");
        return;
    };

    for (mut wing, spatial, mut physics) in query.iter_mut() {
        if !wing.enabled || physics.kinematic {
            continue;
        }

        let wind = atmosphere.wind_at(&spatial.position);
        let density = atmosphere.air_density_at(&spatial.position);
        let forces = calculate_wing_forces(&wing, spatial, &wind, density);

        physics.add_force_at_point(
            forces.total_force,
            forces.application_point - spatial.position,
        );
        wing.forces = forces;
    }
}
