use bevy::app::{PluginGroupBuilder, RunFixedMainLoop, RunFixedMainLoopSystem};
use bevy::prelude::*;

use crate::plugins::{CameraPlugin, EnvironmentPlugin, FlightPlugin};
use crate::resources::{GameConfig, PlayerRegistry, ScoreState};
use crate::state::{GameStateId, GameStateMachine};
use crate::systems::{
    apply_game_commands, game_state_system, ragdoll_lifetime_system, score_system,
};
use crate::utils::{GliderError, RngManager};

/// Runs the per-frame game flow on top of the flight simulation. The frame
/// pass runs before the physics steps of the same frame.
pub struct GamePlugin {
    pub config: GameConfig,
}

impl GamePlugin {
    pub fn with_config(config: GameConfig) -> Self {
        Self { config }
    }

    fn build_machine(&self) -> Result<GameStateMachine, GliderError> {
        let mut machine = GameStateMachine::new(self.config.game.clone())?;
        machine.start(GameStateId::Start)?;
        Ok(machine)
    }
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(RngManager::new(self.config.seed))
            .insert_resource(ScoreState::new(self.config.score.clone()))
            .init_resource::<PlayerRegistry>();

        match self.build_machine() {
            Ok(machine) => {
                app.insert_resource(machine.goal_zone().clone())
                    .insert_resource(machine);
            }
            Err(e) => error!("Game flow disabled: {}", e),
        }

        app.add_systems(
            RunFixedMainLoop,
            (
                score_system,
                game_state_system,
                apply_game_commands,
                ragdoll_lifetime_system,
            )
                .chain()
                .in_set(RunFixedMainLoopSystem::BeforeFixedMainLoop),
        );
    }
}

/// Everything a session needs, configured from one [`GameConfig`].
pub struct GliderPlugins {
    pub config: GameConfig,
}

impl GliderPlugins {
    pub fn with_config(config: GameConfig) -> Self {
        Self { config }
    }
}

impl PluginGroup for GliderPlugins {
    fn build(self) -> PluginGroupBuilder {
        let config = self.config;
        PluginGroupBuilder::start::<Self>()
            .add(EnvironmentPlugin::with_config(
                config.atmosphere.clone(),
                config.ground.clone(),
            ))
            .add(FlightPlugin::with_config(config.physics.clone()))
            .add(CameraPlugin)
            .add(GamePlugin::with_config(config))
    }
}
