use std::io;
use thiserror::Error;

use crate::state::GameStateId;

#[derive(Error, Debug)]
pub enum GliderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    #[error("Missing required reference: {0}")]
    MissingReference(String),

    #[error("No state registered for {0:?}")]
    UnknownState(GameStateId),
}
