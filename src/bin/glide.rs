use std::{env, time::Duration};

use bevy::{log::LogPlugin, prelude::*, time::TimeUpdateStrategy};
use serde::Serialize;

use glider::{
    components::{Player, SpatialComponent},
    plugins::GliderPlugins,
    resources::{GameConfig, InputAction, InputState, ScoreState},
    state::{GameStateId, GameStateMachine},
};

/// Frame on which the scripted jump is pressed
const JUMP_FRAME: u64 = 10;
const DEFAULT_SECONDS: f64 = 60.0;

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    seconds: f64,
    states: Vec<GameStateId>,
    final_state: Option<GameStateId>,
    score: i64,
    previous_score: i64,
    player_position: Option<[f64; 3]>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default(),
    };
    let seconds = match args.next() {
        Some(value) => value.parse::<f64>()?,
        None => DEFAULT_SECONDS,
    };

    let timestep = config.physics.timestep;
    let seed = config.seed;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            timestep,
        )))
        .add_plugins(GliderPlugins::with_config(config));

    let frames = (seconds / timestep).ceil() as u64;
    let mut ran = 0;
    for frame in 0..frames {
        if let Some(mut input) = app.world_mut().get_resource_mut::<InputState>() {
            script_input(&mut input, frame);
        }
        app.update();
        ran = frame + 1;

        if app.should_exit().is_some() {
            info!("Run ended by quit request");
            break;
        }
    }

    let summary = summarize(&mut app, seed, ran, timestep);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Taps jump once: pressed on [`JUMP_FRAME`], released on the next frame so
/// the flight does not run in stunt mode.
fn script_input(input: &mut InputState, frame: u64) {
    if frame == JUMP_FRAME {
        input.press(InputAction::Jump);
    } else if frame == JUMP_FRAME + 1 {
        input.release(InputAction::Jump);
    }
}

fn summarize(app: &mut App, seed: u64, frames: u64, timestep: f64) -> RunSummary {
    let world = app.world_mut();
    let player_position = world
        .query_filtered::<&SpatialComponent, With<Player>>()
        .iter(world)
        .next()
        .map(|spatial| [spatial.position.x, spatial.position.y, spatial.position.z]);

    let (states, final_state) = world
        .get_resource::<GameStateMachine>()
        .map(|machine| (machine.history().to_vec(), machine.current()))
        .unwrap_or_default();
    let (score, previous_score) = world
        .get_resource::<ScoreState>()
        .map(|score| (score.score(), score.previous_score()))
        .unwrap_or_default();

    RunSummary {
        seed,
        frames,
        seconds: frames as f64 * timestep,
        states,
        final_state,
        score,
        previous_score,
        player_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_taps_jump_once() {
        let mut input = InputState::default();
        script_input(&mut input, JUMP_FRAME - 1);
        assert!(!input.jump_held);

        script_input(&mut input, JUMP_FRAME);
        assert!(input.jump_held);
        assert!(input.just_pressed(InputAction::Jump));
        input.clear_edges();

        for frame in JUMP_FRAME + 1..JUMP_FRAME + 100 {
            script_input(&mut input, frame);
            assert!(!input.jump_held);
            assert!(!input.just_pressed(InputAction::Jump));
        }
    }
}
