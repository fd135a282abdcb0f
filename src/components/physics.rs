use bevy::prelude::*;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// How an applied force or torque changes the body's motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceMode {
    /// Continuous, integrated over the step and scaled by mass/inertia
    Force,
    /// Instantaneous velocity change, independent of mass/inertia
    VelocityChange,
}

/// Mass properties plus everything applied to the body during one physics step.
///
/// Forces and torques are accumulated in the inertial frame and cleared by
/// the integrator after each step.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsComponent {
    pub mass: f64,
    /// Body-frame inertia tensor
    pub inertia: Matrix3<f64>,
    pub inertia_inv: Matrix3<f64>,
    /// Held in place by its owner: no integration, no contacts
    pub kinematic: bool,
    pub net_force: Vector3<f64>,
    pub net_torque: Vector3<f64>,
    pub velocity_change: Vector3<f64>,
    pub angular_velocity_change: Vector3<f64>,
}

impl PhysicsComponent {
    pub fn new(mass: f64, inertia: Matrix3<f64>) -> Self {
        let inertia_inv = inertia.try_inverse().unwrap_or(Matrix3::identity());
        Self {
            mass,
            inertia,
            inertia_inv,
            kinematic: false,
            net_force: Vector3::zeros(),
            net_torque: Vector3::zeros(),
            velocity_change: Vector3::zeros(),
            angular_velocity_change: Vector3::zeros(),
        }
    }

    /// A unit-inertia point body (ragdoll parts)
    pub fn point_mass(mass: f64) -> Self {
        Self::new(mass, Matrix3::identity())
    }

    pub fn add_force(&mut self, force: Vector3<f64>, mode: ForceMode) {
        match mode {
            ForceMode::Force => self.net_force += force,
            ForceMode::VelocityChange => self.velocity_change += force,
        }
    }

    /// Force applied at a world point; `lever` is that point relative to the
    /// centre of mass.
    pub fn add_force_at_point(&mut self, force: Vector3<f64>, lever: Vector3<f64>) {
        self.net_force += force;
        self.net_torque += lever.cross(&force);
    }

    /// Torque about world axes
    pub fn add_torque(&mut self, torque: Vector3<f64>, mode: ForceMode) {
        match mode {
            ForceMode::Force => self.net_torque += torque,
            ForceMode::VelocityChange => self.angular_velocity_change += torque,
        }
    }

    pub fn clear_forces(&mut self) {
        self.net_force = Vector3::zeros();
        self.net_torque = Vector3::zeros();
        self.velocity_change = Vector3::zeros();
        self.angular_velocity_change = Vector3::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_at_point_produces_torque() {
        let mut physics = PhysicsComponent::point_mass(1.0);
        physics.add_force_at_point(Vector3::new(0.0, 10.0, 0.0), Vector3::new(2.0, 0.0, 0.0));

        assert_eq!(physics.net_force, Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(physics.net_torque, Vector3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn test_modes_accumulate_separately() {
        let mut physics = PhysicsComponent::point_mass(2.0);
        physics.add_force(Vector3::x(), ForceMode::Force);
        physics.add_force(Vector3::y(), ForceMode::VelocityChange);
        physics.add_torque(Vector3::z(), ForceMode::VelocityChange);

        assert_eq!(physics.net_force, Vector3::x());
        assert_eq!(physics.velocity_change, Vector3::y());
        assert_eq!(physics.angular_velocity_change, Vector3::z());

        physics.clear_forces();
        assert_eq!(physics.velocity_change, Vector3::zeros());
    }
}
