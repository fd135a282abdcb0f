use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::resources::GoalZone;
use crate::state::Pose;
use crate::utils::{
    GliderError, CRASH_NORMAL_REBOUND, CRASH_VELOCITY_SCALE, LAUNCH_SPEED, START_JUMP_DURATION,
};

/// Where the player appears at the start of every round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPoint {
    pub position: Vector3<f64>,
    /// XYZ Euler angles [deg]
    pub rotation_degrees: Vector3<f64>,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        // Belly down, nose towards +Z
        Self {
            position: Vector3::new(0.0, 180.0, 0.0),
            rotation_degrees: Vector3::new(90.0, 0.0, 0.0),
        }
    }
}

impl SpawnPoint {
    pub fn pose(&self) -> Pose {
        Pose::from_euler_degrees(self.position, self.rotation_degrees)
    }
}

/// Timing and tuning of the game flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameFlowConfig {
    pub spawn: Option<SpawnPoint>,
    pub goal_zone: Option<GoalZone>,
    /// Screen fade duration [s]
    pub fade_time: f64,
    /// Length of the take-off clip; Flying starts when it ends [s]
    pub start_jump_duration: f64,
    /// Launch speed along spawn up + forward [m/s]
    pub launch_speed: f64,
    pub crash_normal_rebound: f64,
    pub crash_velocity_scale: f64,
}

impl Default for GameFlowConfig {
    fn default() -> Self {
        Self {
            spawn: Some(SpawnPoint::default()),
            goal_zone: Some(GoalZone::new(
                Vector3::new(-60.0, -20.0, 2400.0),
                Vector3::new(60.0, 120.0, 2500.0),
            )),
            fade_time: 1.0,
            start_jump_duration: START_JUMP_DURATION,
            launch_speed: LAUNCH_SPEED,
            crash_normal_rebound: CRASH_NORMAL_REBOUND,
            crash_velocity_scale: CRASH_VELOCITY_SCALE,
        }
    }
}

impl GameFlowConfig {
    pub fn validate(&self) -> Result<(), GliderError> {
        if self.fade_time <= 0.0 {
            return Err(GliderError::InvalidConfig(
                "fade_time must be positive".to_string(),
            ));
        }
        if self.start_jump_duration < 0.0 {
            return Err(GliderError::InvalidConfig(
                "start_jump_duration must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mass properties of the player body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// [kg]
    pub mass: f64,
    /// Principal moments of inertia about body X, Y, Z [kg·m²]
    pub inertia: Vector3<f64>,
    /// Contact radius [m]
    pub collision_radius: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mass: 80.0,
            inertia: Vector3::new(22.0, 6.0, 26.0),
            collision_radius: 0.5,
        }
    }
}

impl PlayerConfig {
    pub fn inertia_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_diagonal(&self.inertia)
    }

    pub fn validate(&self) -> Result<(), GliderError> {
        if self.mass <= 0.0 || self.inertia.iter().any(|i| *i <= 0.0) {
            return Err(GliderError::InvalidConfig(
                "player mass and inertia must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagdollConfig {
    pub parts: usize,
    pub part_mass: f64,
    pub part_radius: f64,
    /// Seconds before a ragdoll is removed
    pub lifetime: f64,
}

impl Default for RagdollConfig {
    fn default() -> Self {
        Self {
            parts: 11,
            part_mass: 6.0,
            part_radius: 0.15,
            lifetime: 10.0,
        }
    }
}

impl RagdollConfig {
    pub fn validate(&self) -> Result<(), GliderError> {
        if self.parts == 0 {
            return Err(GliderError::InvalidConfig(
                "a ragdoll needs at least one part".to_string(),
            ));
        }
        Ok(())
    }
}
