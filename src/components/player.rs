use bevy::prelude::*;

use crate::state::{AnimationMode, PlayerHandle};

/// Marks the body the game flow currently controls.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub handle: PlayerHandle,
}

/// Presentation flags of a player body, driven by game commands.
#[derive(Component, Debug, Clone)]
pub struct PlayerPresentation {
    /// Hidden bodies take no part in simulation or contacts
    pub active: bool,
    /// Whether the procedural animation controller owns the pose
    pub animation_driven: bool,
    /// Clips currently playing
    pub animations: Vec<(String, AnimationMode)>,
}

impl Default for PlayerPresentation {
    fn default() -> Self {
        Self {
            active: true,
            animation_driven: false,
            animations: Vec::new(),
        }
    }
}

impl PlayerPresentation {
    pub fn play(&mut self, clip: &str, mode: AnimationMode) {
        self.animations.retain(|(name, _)| name != clip);
        self.animations.push((clip.to_string(), mode));
    }

    /// Stop one clip, or all of them
    pub fn stop(&mut self, clip: Option<&str>) {
        match clip {
            Some(clip) => self.animations.retain(|(name, _)| name != clip),
            None => self.animations.clear(),
        }
    }

    pub fn is_playing(&self, clip: &str) -> bool {
        self.animations.iter().any(|(name, _)| name == clip)
    }
}

/// One rigid part of a ragdoll. Parts of the same ragdoll share `group`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ragdoll {
    pub group: u64,
    pub age: f64,
    pub lifetime: f64,
}

impl Ragdoll {
    pub fn new(group: u64, lifetime: f64) -> Self {
        Self {
            group,
            age: 0.0,
            lifetime,
        }
    }

    /// Advance the age; true once the part has outlived its lifetime.
    pub fn age_by(&mut self, dt: f64) -> bool {
        self.age += dt;
        self.age >= self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_replaces_same_clip() {
        let mut presentation = PlayerPresentation::default();
        presentation.play("startidle", AnimationMode::Loop);
        presentation.play("startjump", AnimationMode::Once);
        presentation.play("startidle", AnimationMode::Loop);
        assert_eq!(presentation.animations.len(), 2);

        presentation.stop(Some("startjump"));
        assert!(!presentation.is_playing("startjump"));
        assert!(presentation.is_playing("startidle"));

        presentation.stop(None);
        assert!(presentation.animations.is_empty());
    }

    #[test]
    fn test_ragdoll_expires() {
        let mut part = Ragdoll::new(1, 10.0);
        assert!(!part.age_by(9.5));
        assert!(part.age_by(0.5));
    }
}
