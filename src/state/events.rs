use std::collections::{BTreeSet, HashMap};

use crate::components::CollisionInfo;
use crate::state::GameStateId;

/// Gameplay notifications routed to the active state.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The current player body hit something
    PlayerCollision(CollisionInfo),
    /// The player entered the goal zone
    PlayerFinished,
    FadeInDone,
    FadeOutDone,
}

/// Event channels, in the order they are dispatched within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    PlayerCollision,
    PlayerFinished,
    FadeOutDone,
    FadeInDone,
}

impl EventKind {
    pub const DISPATCH_ORDER: [EventKind; 4] = [
        EventKind::PlayerCollision,
        EventKind::PlayerFinished,
        EventKind::FadeOutDone,
        EventKind::FadeInDone,
    ];
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PlayerCollision(_) => EventKind::PlayerCollision,
            GameEvent::PlayerFinished => EventKind::PlayerFinished,
            GameEvent::FadeInDone => EventKind::FadeInDone,
            GameEvent::FadeOutDone => EventKind::FadeOutDone,
        }
    }
}

/// Observer lists owned by the event sources, plus events waiting for dispatch.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, BTreeSet<GameStateId>>,
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub fn subscribe(&mut self, kind: EventKind, subscriber: GameStateId) {
        self.subscribers.entry(kind).or_default().insert(subscriber);
    }

    pub fn unsubscribe(&mut self, kind: EventKind, subscriber: GameStateId) {
        if let Some(set) = self.subscribers.get_mut(&kind) {
            set.remove(&subscriber);
        }
    }

    /// Drop every subscription `subscriber` holds.
    pub fn unsubscribe_all(&mut self, subscriber: GameStateId) {
        for set in self.subscribers.values_mut() {
            set.remove(&subscriber);
        }
    }

    pub fn is_subscribed(&self, kind: EventKind, subscriber: GameStateId) -> bool {
        self.subscribers
            .get(&kind)
            .is_some_and(|set| set.contains(&subscriber))
    }

    pub fn subscribers(&self, kind: EventKind) -> Vec<GameStateId> {
        self.subscribers
            .get(&kind)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Take all pending events, stably ordered by [`EventKind::DISPATCH_ORDER`].
    pub fn drain_ordered(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending);
        events.sort_by_key(GameEvent::kind);
        events
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn collision() -> GameEvent {
        GameEvent::PlayerCollision(CollisionInfo {
            contact_point: Vector3::zeros(),
            normal: Vector3::y(),
            relative_velocity: Vector3::new(0.0, 10.0, 0.0),
            penetration_depth: 0.1,
        })
    }

    #[test]
    fn test_collision_dispatched_before_finish() {
        let mut bus = EventBus::default();
        bus.publish(GameEvent::FadeOutDone);
        bus.publish(GameEvent::PlayerFinished);
        bus.publish(collision());

        let kinds: Vec<EventKind> = bus.drain_ordered().iter().map(GameEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::PlayerCollision,
                EventKind::PlayerFinished,
                EventKind::FadeOutDone
            ]
        );
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_unsubscribe_all_releases_every_channel() {
        let mut bus = EventBus::default();
        bus.subscribe(EventKind::PlayerCollision, GameStateId::Flying);
        bus.subscribe(EventKind::PlayerFinished, GameStateId::Flying);
        bus.subscribe(EventKind::FadeOutDone, GameStateId::Crashed);

        bus.unsubscribe_all(GameStateId::Flying);

        assert!(!bus.is_subscribed(EventKind::PlayerCollision, GameStateId::Flying));
        assert!(!bus.is_subscribed(EventKind::PlayerFinished, GameStateId::Flying));
        assert_eq!(
            bus.subscribers(EventKind::FadeOutDone),
            vec![GameStateId::Crashed]
        );
    }
}
