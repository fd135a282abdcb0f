use bevy::prelude::*;

use crate::state::AnimationMode;

/// What the player camera is doing this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraFollowMode {
    /// Playing its own animation, or standing still
    #[default]
    Free,
    /// Chasing the current player
    Follow,
    /// Looking at a crashed or finished body
    Crash { target: Entity },
}

/// Player camera rig. Framing itself is left to the presenter; this tracks
/// which mode the game flow asked for.
#[derive(Component, Debug, Clone, Default)]
pub struct CameraComponent {
    pub follow_enabled: bool,
    pub crash_target: Option<Entity>,
    pub animation: Option<(String, AnimationMode)>,
}

impl CameraComponent {
    pub fn mode(&self) -> CameraFollowMode {
        match self.crash_target {
            Some(target) => CameraFollowMode::Crash { target },
            None if self.follow_enabled => CameraFollowMode::Follow,
            None => CameraFollowMode::Free,
        }
    }
}
