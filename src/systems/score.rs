use bevy::prelude::*;

use crate::components::{FlightController, PhysicsComponent, Player};
use crate::resources::{ScoreSample, ScoreState};

/// Samples the flying player once per frame.
pub fn score_system(
    query: Query<(&FlightController, &PhysicsComponent), With<Player>>,
    score: Option<ResMut<ScoreState>>,
    time: Res<Time>,
) {
    let Some(mut score) = score else {
        return;
    };

    for (controller, physics) in query.iter() {
        if physics.kinematic || !controller.enabled {
            continue;
        }

        let sample = ScoreSample {
            altitude: controller.altitude,
            angular_speed: controller.local_angular_velocity.norm(),
            stunt: controller.stunt,
        };
        score.update(&sample, time.delta_secs_f64());
    }
}
