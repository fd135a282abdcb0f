pub mod components;
pub mod plugins;
pub mod resources;
pub mod state;
pub mod systems;
pub mod utils;
