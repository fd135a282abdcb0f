pub mod atmosphere;
pub mod config;
pub mod ground;
pub mod input;
pub mod registry;
pub mod score;

pub use atmosphere::{Atmosphere, AtmosphereConfig};
pub use config::{GameConfig, GameFlowConfig, PhysicsConfig, PlayerConfig, RagdollConfig, SpawnPoint};
pub use ground::{GoalZone, GroundConfig, GroundModel, GroundProbe, RayLayer, TerrainShape};
pub use input::{clear_input_edges_system, InputAction, InputState};
pub use registry::PlayerRegistry;
pub use score::{ScoreConfig, ScoreSample, ScoreState};
