use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{Curve, GliderError};

/// Static description of an aerodynamic surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingConfig {
    /// Span [m]
    pub span: f64,
    /// Chord [m]
    pub chord: f64,
    /// Lift coefficient against pitch angle of attack [deg]
    pub lift_curve: Curve,
    /// Profile drag coefficient against pitch angle of attack [deg]
    pub drag_curve: Curve,
    /// Lift attenuation against wrapped yaw angle of attack [deg]
    pub side_falloff_curve: Curve,
    /// Body-frame point where the aerodynamic force acts [m]
    pub center_of_pressure: Vector3<f64>,
    /// Counter-force per m/s of horizontal side slip
    pub slip_damping: f64,
    /// Share of the slip counter-force redirected along the forward axis
    pub slip_to_thrust: f64,
}

impl Default for WingConfig {
    fn default() -> Self {
        Self {
            span: 3.0,
            chord: 1.2,
            lift_curve: Curve::glider_lift(),
            drag_curve: Curve::glider_drag(),
            side_falloff_curve: Curve::constant(1.0),
            center_of_pressure: Vector3::new(0.0, -0.05, 0.0),
            slip_damping: 25.0,
            slip_to_thrust: 0.65,
        }
    }
}

impl WingConfig {
    pub fn validate(&self) -> Result<(), GliderError> {
        if !(self.span > 0.0 && self.chord > 0.0) {
            return Err(GliderError::InvalidConfig(format!(
                "wing dimensions must be positive, got {} x {}",
                self.span, self.chord
            )));
        }
        Ok(())
    }

    /// Surface area from the wing dimensions (a triangular planform).
    pub fn surface_area(&self) -> f64 {
        self.span * self.chord / 2.0
    }

    /// Angle in whole degrees within [0, 90) where the lift curve peaks.
    ///
    /// The first maximum wins on ties.
    pub fn find_stall_angle(&self) -> f64 {
        let mut best_angle = 0.0;
        let mut best_lift = f64::NEG_INFINITY;
        for degree in 0..90 {
            let angle = degree as f64;
            let lift = self.lift_curve.evaluate(angle);
            if lift > best_lift {
                best_lift = lift;
                best_angle = angle;
            }
        }
        best_angle
    }
}

/// Per-tick aerodynamic outputs of a wing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WingForces {
    pub relative_velocity: Vector3<f64>,
    pub true_airspeed: f64,
    /// Degrees
    pub angle_of_attack_pitch: f64,
    /// Degrees
    pub angle_of_attack_yaw: f64,
    pub side_falloff: f64,
    pub air_density: f64,
    pub lift_coefficient: f64,
    pub lift: f64,
    pub lift_vector: Vector3<f64>,
    pub drag_coefficient: f64,
    pub drag: f64,
    pub drag_vector: Vector3<f64>,
    pub side_slip: Vector3<f64>,
    pub slip_correction: Vector3<f64>,
    /// Sum of lift, drag and slip correction [N, world frame]
    pub total_force: Vector3<f64>,
    /// World-space application point
    pub application_point: Vector3<f64>,
}

/// Aerodynamic surface attached 1:1 to a flight body.
#[derive(Component, Debug, Clone)]
pub struct Wing {
    config: WingConfig,
    surface_area: f64,
    stall_angle: f64,
    /// Lift scaling set by the flight controller each tick (ground effect, altitude falloff)
    pub lift_multiplier: f64,
    pub enabled: bool,
    pub forces: WingForces,
}

impl Wing {
    pub fn new(config: WingConfig) -> Result<Self, GliderError> {
        config.validate()?;
        let surface_area = config.surface_area();
        let stall_angle = config.find_stall_angle();

        Ok(Self {
            config,
            surface_area,
            stall_angle,
            lift_multiplier: 1.0,
            enabled: true,
            forces: WingForces::default(),
        })
    }

    pub fn config(&self) -> &WingConfig {
        &self.config
    }

    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    /// Stall angle computed once when the wing was built
    pub fn stall_angle(&self) -> f64 {
        self.stall_angle
    }

    /// How far the current pitch angle of attack is past the stall angle, in degrees.
    pub fn stall_margin(&self) -> f64 {
        (self.forces.angle_of_attack_pitch - self.stall_angle).clamp(0.0, 90.0)
    }
}
