pub mod game;
pub mod physics;
pub mod simulation;

pub use game::{GameFlowConfig, PlayerConfig, RagdollConfig, SpawnPoint};
pub use physics::PhysicsConfig;
pub use simulation::GameConfig;
