use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Component for storing spatial state of a rigid body (world Y up)
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct SpatialComponent {
    /// Position in world space [m]
    pub position: Vector3<f64>,

    /// Linear velocity in world space [m/s]
    pub velocity: Vector3<f64>,

    /// Attitude quaternion (rotation from body to world frame)
    pub attitude: UnitQuaternion<f64>,

    /// Angular velocity in world frame [rad/s]
    pub angular_velocity: Vector3<f64>,
}

impl Default for SpatialComponent {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl SpatialComponent {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            angular_velocity,
        }
    }

    /// Create a resting body at a specific pose
    pub fn at_pose(position: Vector3<f64>, attitude: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            attitude,
            ..Default::default()
        }
    }

    /// Body-frame direction expressed in world space
    pub fn transform_direction(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.attitude * local
    }

    /// World-space direction expressed in the body frame
    pub fn inverse_transform_direction(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.attitude.inverse() * world
    }

    /// Body-frame point expressed in world space
    pub fn transform_point(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.position + self.attitude * local
    }
}
