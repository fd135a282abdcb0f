use bevy::log::{error, info};
use serde::{Deserialize, Serialize};

use crate::state::{
    AnimationMode, AnimationTarget, CameraTarget, EventKind, GameCommand, GameContext, GameEvent,
};
use crate::utils::{project, ANIM_CAMERA_IDLE, ANIM_START_IDLE, ANIM_START_JUMP};
use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameStateId {
    Intro,
    Start,
    Flying,
    Crashed,
    Finished,
}

/// Lifecycle of a state. A state is Entering from its entry hook until the
/// next tick, Updating while it runs per-tick logic, and Exiting during its
/// exit hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Inactive,
    Entering,
    Updating,
    Exiting,
}

/// One node of the game flow. Hooks get the shared context and request
/// transitions through it; the machine performs them after the hook returns.
pub trait GameState: Send + Sync {
    fn id(&self) -> GameStateId;
    fn phase(&self) -> Phase;
    fn set_phase(&mut self, phase: Phase);

    fn on_enter(&mut self, _ctx: &mut GameContext) {}
    fn update(&mut self, _ctx: &mut GameContext) {}
    fn on_exit(&mut self, _ctx: &mut GameContext) {}
    fn on_event(&mut self, _event: &GameEvent, _ctx: &mut GameContext) {}
}

macro_rules! impl_phase {
    () => {
        fn phase(&self) -> Phase {
            self.phase
        }

        fn set_phase(&mut self, phase: Phase) {
            self.phase = phase;
        }
    };
}

/// Placeholder before the first round; does nothing.
#[derive(Debug, Default)]
pub struct IntroState {
    phase: Phase,
}

impl GameState for IntroState {
    fn id(&self) -> GameStateId {
        GameStateId::Intro
    }

    impl_phase!();
}

/// Player waits on the launch platform until the jump button is pressed.
#[derive(Debug, Default)]
pub struct StartState {
    phase: Phase,
    jump_deadline: Option<f64>,
}

impl StartState {
    pub fn jump_deadline(&self) -> Option<f64> {
        self.jump_deadline
    }
}

impl GameState for StartState {
    fn id(&self) -> GameStateId {
        GameStateId::Start
    }

    impl_phase!();

    fn on_enter(&mut self, ctx: &mut GameContext) {
        info!("Entering start state");
        self.jump_deadline = None;

        ctx.spawn_player();
        ctx.push(GameCommand::SetPlayerSimulation(false));
        ctx.push(GameCommand::SetAnimationDriven(false));
        ctx.push(GameCommand::SetCameraFollow(false));
        ctx.push(GameCommand::SetCrashCamera(None));
        ctx.push(GameCommand::PlayAnimation {
            target: AnimationTarget::Player,
            clip: ANIM_START_IDLE.to_string(),
            mode: AnimationMode::Loop,
        });
        ctx.push(GameCommand::PlayAnimation {
            target: AnimationTarget::Camera,
            clip: ANIM_CAMERA_IDLE.to_string(),
            mode: AnimationMode::Loop,
        });
        ctx.fader.fade_in();
    }

    fn update(&mut self, ctx: &mut GameContext) {
        match self.jump_deadline {
            None if ctx.input.jump_pressed => {
                ctx.push(GameCommand::PlayAnimation {
                    target: AnimationTarget::Player,
                    clip: ANIM_START_JUMP.to_string(),
                    mode: AnimationMode::Once,
                });
                self.jump_deadline = Some(ctx.clock + ctx.config.start_jump_duration);
            }
            Some(deadline) if ctx.clock >= deadline => {
                ctx.request_transition(GameStateId::Flying);
            }
            _ => {}
        }
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        info!("Exiting start state");
        self.jump_deadline = None;

        ctx.push(GameCommand::SetPlayerSimulation(true));
        ctx.push(GameCommand::StopAnimation {
            target: AnimationTarget::Player,
            clip: Some(ANIM_START_JUMP.to_string()),
        });
        ctx.push(GameCommand::SetAnimationDriven(true));
        ctx.push(GameCommand::SetCameraFollow(true));

        let velocity = (ctx.spawn.up() + ctx.spawn.forward()) * ctx.config.launch_speed;
        ctx.push(GameCommand::LaunchPlayer { velocity });

        ctx.push(GameCommand::StopAnimation {
            target: AnimationTarget::Camera,
            clip: None,
        });
    }
}

#[derive(Debug, Default)]
pub struct FlyingState {
    phase: Phase,
}

impl GameState for FlyingState {
    fn id(&self) -> GameStateId {
        GameStateId::Flying
    }

    impl_phase!();

    fn on_enter(&mut self, ctx: &mut GameContext) {
        info!("Entering flying state");
        ctx.bus.subscribe(EventKind::PlayerCollision, self.id());
        ctx.bus.subscribe(EventKind::PlayerFinished, self.id());
    }

    fn update(&mut self, ctx: &mut GameContext) {
        if ctx.input.reset_pressed {
            ctx.request_transition(GameStateId::Start);
        }
        if ctx.input.quit_pressed {
            ctx.push(GameCommand::Quit);
        }
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        info!("Exiting flying state");
        ctx.bus.unsubscribe(EventKind::PlayerCollision, self.id());
        ctx.bus.unsubscribe(EventKind::PlayerFinished, self.id());
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) {
        match event {
            GameEvent::PlayerCollision(info) => {
                ctx.crash_info = Some(*info);
                ctx.request_transition(GameStateId::Crashed);
            }
            GameEvent::PlayerFinished => {
                if self.phase == Phase::Exiting {
                    return;
                }
                ctx.request_transition(GameStateId::Finished);
            }
            _ => {}
        }
    }
}

/// Velocity handed to the ragdoll after an impact: the negated impact
/// velocity with its normal part reflected slightly, halved.
pub fn crash_launch_velocity(
    relative_velocity: &Vector3<f64>,
    normal: &Vector3<f64>,
    normal_rebound: f64,
    scale: f64,
) -> Vector3<f64> {
    let velocity = -relative_velocity;
    let on_normal = project(&velocity, normal);
    (velocity - on_normal * normal_rebound) * scale
}

#[derive(Debug, Default)]
pub struct CrashedState {
    phase: Phase,
}

impl GameState for CrashedState {
    fn id(&self) -> GameStateId {
        GameStateId::Crashed
    }

    impl_phase!();

    fn on_enter(&mut self, ctx: &mut GameContext) {
        info!("Entering crashed state");
        ctx.push(GameCommand::SetCameraFollow(false));
        ctx.push(GameCommand::SetPlayerActive(false));

        let velocity = match ctx.crash_info {
            Some(info) => crash_launch_velocity(
                &info.relative_velocity,
                &info.normal,
                ctx.config.crash_normal_rebound,
                ctx.config.crash_velocity_scale,
            ),
            None => {
                error!("Crashed without collision info, ragdoll starts at rest");
                Vector3::zeros()
            }
        };
        ctx.push(GameCommand::SpawnRagdoll { velocity });
        ctx.push(GameCommand::SetCrashCamera(Some(CameraTarget::Ragdoll)));

        ctx.bus.subscribe(EventKind::FadeOutDone, self.id());
        ctx.fader.fade_out();
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) {
        if *event == GameEvent::FadeOutDone {
            ctx.despawn_player();
            ctx.request_transition(GameStateId::Start);
        }
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        ctx.bus.unsubscribe(EventKind::FadeOutDone, self.id());
    }
}

/// The player reached the goal zone.
#[derive(Debug, Default)]
pub struct FinishedState {
    phase: Phase,
}

impl GameState for FinishedState {
    fn id(&self) -> GameStateId {
        GameStateId::Finished
    }

    impl_phase!();

    fn on_enter(&mut self, ctx: &mut GameContext) {
        info!("Entering finished state");
        ctx.push(GameCommand::SetCameraFollow(false));
        ctx.push(GameCommand::SetCrashCamera(Some(CameraTarget::Player)));

        ctx.bus.subscribe(EventKind::FadeOutDone, self.id());
        ctx.fader.fade_out();
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) {
        if *event == GameEvent::FadeOutDone {
            ctx.despawn_player();
            ctx.request_transition(GameStateId::Start);
        }
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        ctx.bus.unsubscribe(EventKind::FadeOutDone, self.id());
    }
}

pub fn default_states() -> Vec<Box<dyn GameState>> {
    vec![
        Box::new(IntroState::default()),
        Box::new(StartState::default()),
        Box::new(FlyingState::default()),
        Box::new(CrashedState::default()),
        Box::new(FinishedState::default()),
    ]
}
