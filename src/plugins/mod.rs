mod camera;
mod environment;
mod flight;
mod game;

pub use camera::CameraPlugin;
pub use environment::EnvironmentPlugin;
pub use flight::{FlightPlugin, FlightSet};
pub use game::{GamePlugin, GliderPlugins};
