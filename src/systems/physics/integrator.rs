use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{PhysicsComponent, SpatialComponent};
use crate::resources::PhysicsConfig;

/// Integrates every dynamic body over one physics step and clears its
/// accumulated forces. Kinematic bodies keep their pose and drop whatever
/// was applied to them.
pub fn physics_integrator_system(
    mut query: Query<(&mut PhysicsComponent, &mut SpatialComponent)>,
    config: Res<PhysicsConfig>,
) {
    for (mut physics, mut spatial) in query.iter_mut() {
        if !physics.kinematic {
            integrate_state(&physics, &mut spatial, &config);
        }
        physics.clear_forces();
    }
}

/// Semi-implicit Euler step.
///
/// Velocity changes are applied as-is; forces and torques are scaled by
/// mass and the world-frame inertia. Position and attitude advance with the
/// updated velocities.
pub fn integrate_state(
    physics: &PhysicsComponent,
    spatial: &mut SpatialComponent,
    config: &PhysicsConfig,
) {
    let dt = config.timestep;

    let acceleration = physics.net_force / physics.mass + config.gravity;
    spatial.velocity += acceleration * dt + physics.velocity_change;

    let rotation = spatial.attitude.to_rotation_matrix();
    let inertia_inv_world = rotation.matrix() * physics.inertia_inv * rotation.matrix().transpose();
    let angular_acceleration = inertia_inv_world * physics.net_torque;
    spatial.angular_velocity += angular_acceleration * dt + physics.angular_velocity_change;

    spatial.velocity *= damping_factor(config.linear_damping, dt);
    spatial.angular_velocity *= damping_factor(config.angular_damping, dt);

    spatial.position += spatial.velocity * dt;

    let delta: Vector3<f64> = spatial.angular_velocity * dt;
    if delta.norm_squared() > 0.0 {
        let step = UnitQuaternion::from_scaled_axis(delta);
        spatial.attitude = UnitQuaternion::new_normalize((step * spatial.attitude).into_inner());
    }
}

fn damping_factor(damping: f64, dt: f64) -> f64 {
    (1.0 - damping * dt).clamp(0.0, 1.0)
}
