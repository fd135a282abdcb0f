use std::collections::HashMap;

use bevy::prelude::*;

use crate::state::PlayerHandle;

/// Maps player handles issued by the game flow to their entities.
#[derive(Resource, Debug, Default)]
pub struct PlayerRegistry {
    entities: HashMap<PlayerHandle, Entity>,
    current: Option<PlayerHandle>,
    /// First part of the most recent ragdoll; the crash camera looks at it
    pub last_ragdoll: Option<Entity>,
}

impl PlayerRegistry {
    pub fn insert(&mut self, handle: PlayerHandle, entity: Entity) {
        self.entities.insert(handle, entity);
        self.current = Some(handle);
    }

    pub fn remove(&mut self, handle: PlayerHandle) -> Option<Entity> {
        if self.current == Some(handle) {
            self.current = None;
        }
        self.entities.remove(&handle)
    }

    pub fn get(&self, handle: PlayerHandle) -> Option<Entity> {
        self.entities.get(&handle).copied()
    }

    pub fn current_handle(&self) -> Option<PlayerHandle> {
        self.current
    }

    pub fn current_entity(&self) -> Option<Entity> {
        self.current.and_then(|handle| self.get(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removing_current_clears_it() {
        let mut registry = PlayerRegistry::default();
        let entity = Entity::from_raw(3);
        registry.insert(PlayerHandle(1), entity);
        assert_eq!(registry.current_entity(), Some(entity));

        assert_eq!(registry.remove(PlayerHandle(1)), Some(entity));
        assert_eq!(registry.current_entity(), None);
        assert_eq!(registry.remove(PlayerHandle(1)), None);
    }
}
