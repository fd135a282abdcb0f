pub mod camera;
pub mod collision;
pub mod controller;
pub mod physics;
pub mod player;
pub mod spatial;
pub mod wing;

pub use camera::{CameraComponent, CameraFollowMode};
pub use collision::{CollisionComponent, CollisionEvent, CollisionInfo, GoalReachedEvent};
pub use controller::{ControlTorques, FlightController, FlightControllerConfig};
pub use physics::{ForceMode, PhysicsComponent};
pub use player::{Player, PlayerPresentation, Ragdoll};
pub use spatial::SpatialComponent;
pub use wing::{Wing, WingConfig, WingForces};
