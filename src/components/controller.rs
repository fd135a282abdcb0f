use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::GliderError;

/// Tuning of the fly-by-wire controller. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightControllerConfig {
    pub invert_pitch: bool,
    pub invert_roll: bool,
    /// Square the input axes (sign preserved) for finer control near centre
    pub quadratic_input_scaling: bool,

    pub input_pitch_power: f64,
    pub input_roll_power: f64,
    pub input_yaw_power: f64,

    pub trick_pitch_power: f64,
    pub trick_roll_power: f64,

    pub stability_pitch_power: f64,
    pub stability_roll_power: f64,
    pub stability_yaw_power: f64,
    pub stability_factor: f64,

    /// Level-base altitude where lift starts to fade [m]
    pub lift_falloff_start: f64,
    /// Level-base altitude where lift is gone [m]
    pub lift_falloff_end: f64,

    /// Terrain altitude below which ground effect kicks in [m]
    pub ground_effect_start: f64,
    pub max_ground_effect: f64,

    pub max_down_pitch: f64,
    pub max_up_pitch: f64,
    pub pitch_falloff: f64,
    pub max_roll_angle: f64,
    pub roll_falloff: f64,
    pub limit_damping_factor: f64,

    /// Nose-up attitude the heading stabiliser pulls towards
    pub idle_pitch_angle: f64,
    /// Reach of the altitude rays [m]
    pub raycast_distance: f64,
}

impl Default for FlightControllerConfig {
    fn default() -> Self {
        Self {
            invert_pitch: true,
            invert_roll: true,
            quadratic_input_scaling: false,
            input_pitch_power: 0.2,
            input_roll_power: 0.2,
            input_yaw_power: 0.1,
            trick_pitch_power: 0.35,
            trick_roll_power: 0.35,
            stability_pitch_power: 0.2,
            stability_roll_power: 0.2,
            stability_yaw_power: 0.1,
            stability_factor: 0.5,
            lift_falloff_start: 200.0,
            lift_falloff_end: 300.0,
            ground_effect_start: 6.0,
            max_ground_effect: 0.5,
            max_down_pitch: 40.0,
            max_up_pitch: 50.0,
            pitch_falloff: 20.0,
            max_roll_angle: 50.0,
            roll_falloff: 30.0,
            limit_damping_factor: 0.3,
            idle_pitch_angle: 8.0,
            raycast_distance: 2000.0,
        }
    }
}

impl FlightControllerConfig {
    pub fn validate(&self) -> Result<(), GliderError> {
        if self.lift_falloff_end <= self.lift_falloff_start {
            return Err(GliderError::InvalidConfig(format!(
                "lift_falloff_end ({}) must exceed lift_falloff_start ({})",
                self.lift_falloff_end, self.lift_falloff_start
            )));
        }
        if self.ground_effect_start <= 0.0 {
            return Err(GliderError::InvalidConfig(
                "ground_effect_start must be positive".to_string(),
            ));
        }
        if self.pitch_falloff <= 0.0 || self.roll_falloff <= 0.0 {
            return Err(GliderError::InvalidConfig(
                "pitch_falloff and roll_falloff must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Torques produced by one controller evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlTorques {
    /// About the body X axis
    pub pitch: f64,
    /// About the body Y (forward) axis
    pub roll: f64,
    /// About the world vertical axis
    pub yaw: f64,
}

/// Per-body controller state derived every physics tick.
#[derive(Component, Debug, Clone)]
pub struct FlightController {
    pub config: FlightControllerConfig,
    pub enabled: bool,
    pub altitude: f64,
    pub level_base_altitude: f64,
    /// Set once the body has been below the lift falloff start; never cleared
    pub in_flight: bool,
    pub stunt: bool,
    /// Angular velocity in the body frame [rad/s]
    pub local_angular_velocity: Vector3<f64>,
    /// Finite-difference acceleration; noisy
    pub acceleration: Vector3<f64>,
    pub glide_ratio: f64,
    pub lift_multiplier: f64,
    pub torques: ControlTorques,
    pub previous_velocity: Vector3<f64>,
}

impl FlightController {
    pub fn new(config: FlightControllerConfig) -> Result<Self, GliderError> {
        config.validate()?;
        Ok(Self {
            config,
            enabled: true,
            altitude: 0.0,
            level_base_altitude: 0.0,
            in_flight: false,
            stunt: false,
            local_angular_velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            glide_ratio: 0.0,
            lift_multiplier: 1.0,
            torques: ControlTorques::default(),
            previous_velocity: Vector3::zeros(),
        })
    }
}
