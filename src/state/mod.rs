mod context;
mod events;
mod fader;
mod machine;
mod states;

pub use context::{
    AnimationMode, AnimationTarget, CameraTarget, FrameInput, GameCommand, GameContext,
    PlayerHandle, Pose,
};
pub use events::{EventBus, EventKind, GameEvent};
pub use fader::{FadeMode, ScreenFader};
pub use machine::GameStateMachine;
pub use states::{
    crash_launch_velocity, default_states, CrashedState, FinishedState, FlyingState, GameState,
    GameStateId, IntroState, Phase, StartState,
};
