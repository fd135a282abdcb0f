use bevy::prelude::*;

use crate::components::CameraComponent;

/// Spawns the player camera rig the game flow steers.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Player Camera"), CameraComponent::default()));
}
