use std::collections::HashMap;

use bevy::log::{debug, error, info, warn};
use bevy::prelude::Resource;

use crate::resources::{GameFlowConfig, GoalZone};
use crate::state::{
    default_states, FrameInput, GameCommand, GameContext, GameEvent, GameState, GameStateId, Phase,
};
use crate::utils::GliderError;

/// Upper bound on transitions chained from a single hook
const MAX_CHAINED_TRANSITIONS: usize = 8;
/// Number of most recent states kept in the history
pub const HISTORY_LIMIT: usize = 32;

/// Runs exactly one game state at a time and routes events to it.
#[derive(Resource)]
pub struct GameStateMachine {
    states: HashMap<GameStateId, Box<dyn GameState>>,
    current: Option<GameStateId>,
    context: GameContext,
    goal_zone: GoalZone,
    history: Vec<GameStateId>,
}

impl GameStateMachine {
    pub fn new(config: GameFlowConfig) -> Result<Self, GliderError> {
        Self::with_states(config, default_states())
    }

    /// Build a machine from an explicit state set. Fails if the spawn point
    /// or goal zone is not configured.
    pub fn with_states(
        config: GameFlowConfig,
        states: Vec<Box<dyn GameState>>,
    ) -> Result<Self, GliderError> {
        let Some(spawn) = config.spawn.as_ref().map(|s| s.pose()) else {
            error!("There is no player spawn point configured");
            return Err(GliderError::MissingReference("player spawn point".to_string()));
        };
        let Some(goal_zone) = config.goal_zone.clone() else {
            error!("There is no goal zone configured");
            return Err(GliderError::MissingReference("goal zone".to_string()));
        };

        let states = states.into_iter().map(|s| (s.id(), s)).collect();
        Ok(Self {
            states,
            current: None,
            context: GameContext::new(config, spawn),
            goal_zone,
            history: Vec::new(),
        })
    }

    /// Enter the first state.
    pub fn start(&mut self, initial: GameStateId) -> Result<(), GliderError> {
        self.change_state(initial)?;
        self.settle()
    }

    pub fn current(&self) -> Option<GameStateId> {
        self.current
    }

    pub fn current_phase(&self) -> Phase {
        self.current
            .and_then(|id| self.states.get(&id))
            .map_or(Phase::Inactive, |s| s.phase())
    }

    pub fn phase_of(&self, id: GameStateId) -> Option<Phase> {
        self.states.get(&id).map(|s| s.phase())
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn goal_zone(&self) -> &GoalZone {
        &self.goal_zone
    }

    /// The last [`HISTORY_LIMIT`] states entered, oldest first
    pub fn history(&self) -> &[GameStateId] {
        &self.history
    }

    /// Queue an event for dispatch on the next tick.
    pub fn notify(&mut self, event: GameEvent) {
        self.context.bus.publish(event);
    }

    pub fn drain_commands(&mut self) -> Vec<GameCommand> {
        self.context.take_commands()
    }

    /// Exit the current state, release its subscriptions and enter `target`.
    pub fn change_state(&mut self, target: GameStateId) -> Result<(), GliderError> {
        if !self.states.contains_key(&target) {
            return Err(GliderError::UnknownState(target));
        }

        let previous = self.current.take();
        if let Some(id) = previous {
            if let Some(state) = self.states.get_mut(&id) {
                state.set_phase(Phase::Exiting);
                state.on_exit(&mut self.context);
            }
            self.context.bus.unsubscribe_all(id);
            if let Some(ignored) = self.context.take_transition() {
                warn!("Ignoring transition to {:?} requested while exiting {:?}", ignored, id);
            }
        }

        self.current = Some(target);
        let state = self
            .states
            .get_mut(&target)
            .ok_or(GliderError::UnknownState(target))?;
        state.set_phase(Phase::Entering);
        state.on_enter(&mut self.context);

        if let Some(id) = previous.filter(|id| *id != target) {
            if let Some(state) = self.states.get_mut(&id) {
                state.set_phase(Phase::Inactive);
            }
        }

        info!("Game state {:?} -> {:?}", previous, target);
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(target);
        Ok(())
    }

    /// Perform transitions requested by the hook that just ran.
    fn settle(&mut self) -> Result<(), GliderError> {
        for _ in 0..MAX_CHAINED_TRANSITIONS {
            match self.context.take_transition() {
                Some(target) => self.change_state(target)?,
                None => return Ok(()),
            }
        }
        warn!("Too many chained state transitions, stopping at {:?}", self.current);
        Ok(())
    }

    /// Advance the game flow by `dt` seconds.
    ///
    /// Order within a tick: fader, promotion of a freshly entered state to
    /// Updating, queued events (collision, goal, fader), then the current
    /// state's update. A state entered during this tick does not update
    /// until the next one.
    pub fn tick(&mut self, dt: f64, input: FrameInput) -> Result<(), GliderError> {
        self.context.clock += dt;
        self.context.input = input;

        if let Some(event) = self.context.fader.tick(dt) {
            self.context.bus.publish(event);
        }

        if let Some(state) = self.current.and_then(|id| self.states.get_mut(&id)) {
            if state.phase() == Phase::Entering {
                state.set_phase(Phase::Updating);
            }
        }

        for event in self.context.bus.drain_ordered() {
            let Some(id) = self.current else {
                break;
            };
            if !self.context.bus.is_subscribed(event.kind(), id) {
                debug!("No subscriber for {:?} in {:?}", event.kind(), id);
                continue;
            }
            if let Some(state) = self.states.get_mut(&id) {
                state.on_event(&event, &mut self.context);
            }
            self.settle()?;
        }

        if let Some(state) = self.current.and_then(|id| self.states.get_mut(&id)) {
            if state.phase() == Phase::Updating {
                state.update(&mut self.context);
            }
        }
        self.settle()?;

        self.context.input = FrameInput::default();
        Ok(())
    }
}

impl std::fmt::Debug for GameStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStateMachine")
            .field("current", &self.current)
            .field("phase", &self.current_phase())
            .field("clock", &self.context.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CollisionInfo;
    use crate::resources::SpawnPoint;
    use crate::state::{EventKind, IntroState, StartState};
    use nalgebra::Vector3;
    use pretty_assertions::assert_eq;

    const DT: f64 = 0.02;

    fn config() -> GameFlowConfig {
        GameFlowConfig {
            spawn: Some(SpawnPoint::default()),
            goal_zone: Some(GoalZone::new(
                Vector3::new(-10.0, -10.0, 990.0),
                Vector3::new(10.0, 10.0, 1010.0),
            )),
            ..Default::default()
        }
    }

    fn started() -> GameStateMachine {
        let mut machine = GameStateMachine::new(config()).unwrap();
        machine.start(GameStateId::Start).unwrap();
        machine
    }

    fn jump() -> FrameInput {
        FrameInput {
            jump_pressed: true,
            ..Default::default()
        }
    }

    fn collision() -> GameEvent {
        GameEvent::PlayerCollision(CollisionInfo {
            contact_point: Vector3::zeros(),
            normal: Vector3::y(),
            relative_velocity: Vector3::new(0.0, 12.0, -30.0),
            penetration_depth: 0.05,
        })
    }

    fn fly(machine: &mut GameStateMachine) {
        machine.tick(DT, jump()).unwrap();
        machine.tick(0.95, FrameInput::default()).unwrap();
        assert_eq!(machine.current(), Some(GameStateId::Flying));
    }

    #[test]
    fn test_missing_spawn_is_fatal() {
        let result = GameStateMachine::new(GameFlowConfig {
            spawn: None,
            ..config()
        });
        assert!(matches!(result, Err(GliderError::MissingReference(_))));

        let result = GameStateMachine::new(GameFlowConfig {
            goal_zone: None,
            ..config()
        });
        assert!(matches!(result, Err(GliderError::MissingReference(_))));
    }

    #[test]
    fn test_unknown_state() {
        let states: Vec<Box<dyn GameState>> =
            vec![Box::new(IntroState::default()), Box::new(StartState::default())];
        let mut machine = GameStateMachine::with_states(config(), states).unwrap();

        assert!(matches!(
            machine.change_state(GameStateId::Flying),
            Err(GliderError::UnknownState(GameStateId::Flying))
        ));
    }

    #[test]
    fn test_entering_promoted_to_updating_on_next_tick() {
        let mut machine = started();
        assert_eq!(machine.current_phase(), Phase::Entering);

        machine.tick(DT, FrameInput::default()).unwrap();
        assert_eq!(machine.current_phase(), Phase::Updating);
    }

    #[test]
    fn test_jump_reaches_flying_after_delay_exactly_once() {
        let mut machine = started();
        machine.tick(DT, jump()).unwrap();
        let jumped_at = machine.context().clock;

        let mut flying_at = None;
        for _ in 0..200 {
            // Mashing jump must not re-arm or speed up the take-off
            machine.tick(DT, jump()).unwrap();
            if flying_at.is_none() && machine.current() == Some(GameStateId::Flying) {
                flying_at = Some(machine.context().clock);
            }
        }

        let elapsed = flying_at.unwrap() - jumped_at;
        assert!(elapsed >= 0.9 - 1e-9, "flying after {elapsed}s");
        assert!(elapsed < 0.9 + DT + 1e-9, "flying after {elapsed}s");
        let entered_flying = machine
            .history()
            .iter()
            .filter(|id| **id == GameStateId::Flying)
            .count();
        assert_eq!(entered_flying, 1);
    }

    #[test]
    fn test_not_flying_before_delay() {
        let mut machine = started();
        machine.tick(DT, jump()).unwrap();

        machine.tick(0.89, FrameInput::default()).unwrap();
        assert_eq!(machine.current(), Some(GameStateId::Start));

        machine.tick(DT, FrameInput::default()).unwrap();
        assert_eq!(machine.current(), Some(GameStateId::Flying));
    }

    #[test]
    fn test_collision_beats_finish_in_same_tick() {
        let mut machine = started();
        fly(&mut machine);

        machine.notify(GameEvent::PlayerFinished);
        machine.notify(collision());
        machine.tick(DT, FrameInput::default()).unwrap();

        assert_eq!(machine.current(), Some(GameStateId::Crashed));
        assert!(!machine.history().contains(&GameStateId::Finished));
        assert!(machine.context().crash_info.is_some());
    }

    #[test]
    fn test_subscriptions_released_on_exit() {
        let mut machine = started();
        fly(&mut machine);
        let bus = &machine.context().bus;
        assert!(bus.is_subscribed(EventKind::PlayerCollision, GameStateId::Flying));

        machine.notify(collision());
        machine.tick(DT, FrameInput::default()).unwrap();

        let bus = &machine.context().bus;
        assert!(!bus.is_subscribed(EventKind::PlayerCollision, GameStateId::Flying));
        assert!(!bus.is_subscribed(EventKind::PlayerFinished, GameStateId::Flying));
        assert!(bus.is_subscribed(EventKind::FadeOutDone, GameStateId::Crashed));
        assert_eq!(machine.phase_of(GameStateId::Flying), Some(Phase::Inactive));
    }

    #[test]
    fn test_crash_fades_out_then_respawns() {
        let mut machine = started();
        fly(&mut machine);
        let first_player = machine.context().player();
        machine.drain_commands();

        machine.notify(collision());
        machine.tick(DT, FrameInput::default()).unwrap();
        let commands = machine.drain_commands();
        assert!(commands
            .iter()
            .any(|c| matches!(c, GameCommand::SpawnRagdoll { .. })));

        // Fade time is one second
        for _ in 0..60 {
            machine.tick(DT, FrameInput::default()).unwrap();
        }
        assert_eq!(machine.current(), Some(GameStateId::Start));
        assert_ne!(machine.context().player(), first_player);

        let commands = machine.drain_commands();
        assert!(commands.contains(&GameCommand::DespawnPlayer {
            handle: first_player.unwrap()
        }));
    }

    #[test]
    fn test_finish_fades_out_then_respawns() {
        let mut machine = started();
        fly(&mut machine);

        machine.notify(GameEvent::PlayerFinished);
        machine.tick(DT, FrameInput::default()).unwrap();
        assert_eq!(machine.current(), Some(GameStateId::Finished));

        for _ in 0..60 {
            machine.tick(DT, FrameInput::default()).unwrap();
        }
        assert_eq!(machine.current(), Some(GameStateId::Start));
    }

    #[test]
    fn test_reset_and_quit_while_flying() {
        let mut machine = started();
        fly(&mut machine);
        machine.drain_commands();

        machine
            .tick(
                DT,
                FrameInput {
                    quit_pressed: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(machine.drain_commands().contains(&GameCommand::Quit));

        machine
            .tick(
                DT,
                FrameInput {
                    reset_pressed: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(machine.current(), Some(GameStateId::Start));
    }

    #[test]
    fn test_history_keeps_latest_states() {
        let mut machine = started();
        let reset = FrameInput {
            reset_pressed: true,
            ..Default::default()
        };
        for _ in 0..HISTORY_LIMIT {
            fly(&mut machine);
            machine.tick(DT, reset).unwrap();
        }

        let history = machine.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.last(), Some(&GameStateId::Start));
        assert_eq!(history[history.len() - 2], GameStateId::Flying);
    }

    #[test]
    fn test_events_outside_flying_are_dropped() {
        let mut machine = started();
        machine.notify(collision());
        machine.tick(DT, FrameInput::default()).unwrap();
        assert_eq!(machine.current(), Some(GameStateId::Start));
    }
}
