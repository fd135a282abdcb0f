use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{clamp01, lerp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub max_multiplier: f64,
    /// Altitude above terrain at which the multiplier bottoms out at 1
    pub multiplier_start_height: f64,
    pub multiplier_smooth_time: f64,
    /// Local angular speed [rad/s] a stunt must exceed to score
    pub stunt_speed_threshold: f64,
    pub altitude_offset: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            max_multiplier: 16.0,
            multiplier_start_height: 128.0,
            multiplier_smooth_time: 1.0,
            stunt_speed_threshold: 4.0,
            altitude_offset: 2.0,
        }
    }
}

/// Flight values the score model samples each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreSample {
    pub altitude: f64,
    pub angular_speed: f64,
    pub stunt: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct ScoreState {
    config: ScoreConfig,
    score: f64,
    previous_score: f64,
    multiplier: f64,
    previous_multiplier: f64,
}

impl ScoreState {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            score: 0.0,
            previous_score: 0.0,
            multiplier: 1.0,
            previous_multiplier: 1.0,
        }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Score as shown to the player
    pub fn score(&self) -> i64 {
        self.score.round() as i64
    }

    pub fn raw_score(&self) -> f64 {
        self.score
    }

    pub fn previous_score(&self) -> i64 {
        self.previous_score.round() as i64
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max_multiplier(&self) -> f64 {
        self.config.max_multiplier
    }

    /// Multiplier the current altitude is worth before smoothing.
    pub fn target_multiplier(&self, altitude: f64) -> f64 {
        let height_fraction =
            clamp01((altitude + self.config.altitude_offset) / self.config.multiplier_start_height);
        1.0 + (1.0 - height_fraction) * (self.config.max_multiplier - 1.0)
    }

    pub fn update(&mut self, sample: &ScoreSample, dt: f64) {
        let target = self.target_multiplier(sample.altitude);
        self.multiplier = lerp(
            self.previous_multiplier,
            target,
            self.config.multiplier_smooth_time * dt,
        );
        self.previous_multiplier = self.multiplier;

        if sample.stunt && sample.angular_speed > self.config.stunt_speed_threshold {
            self.score +=
                (sample.angular_speed - self.config.stunt_speed_threshold) * dt * self.multiplier;
        }
    }

    pub fn add_score(&mut self, amount: f64) {
        self.score += amount * self.multiplier;
    }

    pub fn set_multiplier(&mut self, amount: f64) {
        self.multiplier = amount.clamp(0.0, self.config.max_multiplier);
        self.previous_multiplier = self.multiplier;
    }

    /// Snapshot the finished run and start a fresh one.
    pub fn reset_for_spawn(&mut self) {
        self.previous_score = self.score;
        self.score = 0.0;
        self.multiplier = 1.0;
        self.previous_multiplier = 1.0;
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(ScoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_multiplier_saturates() {
        let score = ScoreState::default();

        assert_relative_eq!(score.target_multiplier(-2.0), 16.0);
        assert_relative_eq!(score.target_multiplier(-500.0), 16.0);
        assert_relative_eq!(score.target_multiplier(126.0), 1.0);
        assert_relative_eq!(score.target_multiplier(5000.0), 1.0);
        assert_relative_eq!(score.target_multiplier(62.0), 8.5);
    }

    #[test]
    fn test_multiplier_smooths_towards_target() {
        let mut score = ScoreState::default();
        let low = ScoreSample {
            altitude: -2.0,
            ..Default::default()
        };

        score.update(&low, 0.1);
        assert_relative_eq!(score.multiplier(), 1.0 + 15.0 * 0.1);

        for _ in 0..100 {
            score.update(&low, 0.1);
        }
        assert_relative_eq!(score.multiplier(), 16.0, epsilon = 1e-3);
    }

    #[test]
    fn test_stunt_scoring_requires_speed_and_stunt() {
        let mut score = ScoreState::default();
        let high = 1000.0;

        score.update(
            &ScoreSample {
                altitude: high,
                angular_speed: 10.0,
                stunt: false,
            },
            0.5,
        );
        assert_relative_eq!(score.raw_score(), 0.0);

        score.update(
            &ScoreSample {
                altitude: high,
                angular_speed: 3.0,
                stunt: true,
            },
            0.5,
        );
        assert_relative_eq!(score.raw_score(), 0.0);

        score.update(
            &ScoreSample {
                altitude: high,
                angular_speed: 6.0,
                stunt: true,
            },
            0.5,
        );
        assert_relative_eq!(score.raw_score(), 2.0 * 0.5 * 1.0);
    }

    #[test]
    fn test_add_score_uses_multiplier() {
        let mut score = ScoreState::default();
        score.set_multiplier(4.0);
        score.add_score(250.0);
        assert_eq!(score.score(), 1000);

        score.set_multiplier(99.0);
        assert_relative_eq!(score.multiplier(), 16.0);
        score.set_multiplier(-3.0);
        assert_relative_eq!(score.multiplier(), 0.0);
    }

    #[test]
    fn test_reset_for_spawn_snapshots_previous() {
        let mut score = ScoreState::default();
        score.set_multiplier(2.0);
        score.add_score(500.0);
        assert_eq!(score.score(), 1000);

        score.reset_for_spawn();
        assert_eq!(score.score(), 0);
        assert_eq!(score.previous_score(), 1000);
        assert_relative_eq!(score.multiplier(), 1.0);

        // Respawning again without scoring keeps the invariant
        score.reset_for_spawn();
        assert_eq!(score.previous_score(), 0);
        assert_relative_eq!(score.multiplier(), 1.0);
    }
}
