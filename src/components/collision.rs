use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Contact data captured at the moment a body hits something.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionInfo {
    /// Point of impact in world space
    pub contact_point: Vector3<f64>,
    /// Surface normal at the contact, pointing away from the surface
    pub normal: Vector3<f64>,
    /// Velocity of the other collider relative to the body
    pub relative_velocity: Vector3<f64>,
    pub penetration_depth: f64,
}

#[derive(Event, Debug, Clone)]
pub struct CollisionEvent {
    /// Entity that collided
    pub entity: Entity,
    pub info: CollisionInfo,
}

/// A player body entered the goal zone.
#[derive(Event, Debug, Clone, Copy)]
pub struct GoalReachedEvent {
    pub entity: Entity,
}

#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollisionComponent {
    /// Contact radius around the body origin
    pub radius: f64,
    /// Whether the body is currently in contact; events fire on contact enter only
    #[serde(skip)]
    pub has_collided: bool,
    #[serde(skip)]
    pub collision_count: u32,
    /// Time of last collision
    #[serde(skip)]
    pub last_collision_time: f64,
    /// Share of tangential velocity kept while resting on the ground
    pub friction: f64,
}

impl Default for CollisionComponent {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CollisionComponent {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            has_collided: false,
            collision_count: 0,
            last_collision_time: 0.0,
            friction: 0.9,
        }
    }

    pub fn reset(&mut self) {
        self.has_collided = false;
        self.collision_count = 0;
        self.last_collision_time = 0.0;
    }

    pub fn clear_contact(&mut self) {
        self.has_collided = false;
    }

    pub fn register_collision(&mut self, time: f64) {
        self.has_collided = true;
        self.collision_count += 1;
        self.last_collision_time = time;
    }
}
