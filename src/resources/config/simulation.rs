use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{GameFlowConfig, PhysicsConfig, PlayerConfig, RagdollConfig};
use crate::components::{FlightControllerConfig, WingConfig};
use crate::resources::{AtmosphereConfig, GroundConfig, ScoreConfig};
use crate::utils::GliderError;

/// Everything needed to set up a session, as read from YAML.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Master seed for every random stream
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub atmosphere: AtmosphereConfig,
    pub ground: GroundConfig,
    pub wing: WingConfig,
    pub controller: FlightControllerConfig,
    pub score: ScoreConfig,
    pub game: GameFlowConfig,
    pub player: PlayerConfig,
    pub ragdoll: RagdollConfig,
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GliderError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GliderError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GliderError> {
        self.physics.validate()?;
        self.wing.validate()?;
        self.controller.validate()?;
        self.game.validate()?;
        self.player.validate()?;
        self.ragdoll.validate()?;
        Ok(())
    }
}
