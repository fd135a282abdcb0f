use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::components::CollisionInfo;
use crate::resources::GameFlowConfig;
use crate::state::{EventBus, GameStateId, ScreenFader};

/// Identifies one spawned player body. A fresh handle is issued on every
/// (re)spawn so stale events from a destroyed body can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerHandle(pub u64);

/// World pose of a spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Pose from XYZ Euler angles in degrees
    pub fn from_euler_degrees(position: Vector3<f64>, rotation_degrees: Vector3<f64>) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(
            rotation_degrees.x.to_radians(),
            rotation_degrees.y.to_radians(),
            rotation_degrees.z.to_radians(),
        );
        Self { position, rotation }
    }

    /// Local +Y in world space
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// Local +Z in world space
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vector3::zeros(), UnitQuaternion::identity())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationMode {
    Loop,
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationTarget {
    Player,
    Camera,
}

/// What the crash camera looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraTarget {
    Player,
    Ragdoll,
}

/// Requests from the game states to the host that owns bodies, animation
/// and the camera. Applied in order after each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    SpawnPlayer { handle: PlayerHandle, pose: Pose },
    DespawnPlayer { handle: PlayerHandle },
    SetPlayerActive(bool),
    /// Toggles flight control, the wing and dynamic physics of the player together
    SetPlayerSimulation(bool),
    /// Whether the procedural animation controller drives the player pose
    SetAnimationDriven(bool),
    SetCameraFollow(bool),
    SetCrashCamera(Option<CameraTarget>),
    PlayAnimation {
        target: AnimationTarget,
        clip: String,
        mode: AnimationMode,
    },
    /// Stop one clip, or everything on the target when `clip` is `None`
    StopAnimation {
        target: AnimationTarget,
        clip: Option<String>,
    },
    /// Instantaneous velocity change on the player body
    LaunchPlayer { velocity: Vector3<f64> },
    /// Ragdoll at the player's pose; each part gets `velocity` plus jitter
    SpawnRagdoll { velocity: Vector3<f64> },
    Quit,
}

/// Button edges seen by the state machine during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub jump_pressed: bool,
    pub reset_pressed: bool,
    pub quit_pressed: bool,
}

/// Shared state handed to every state hook.
#[derive(Debug)]
pub struct GameContext {
    pub config: GameFlowConfig,
    /// Spawn transform, resolved when the machine is built
    pub spawn: Pose,
    /// Seconds since the machine started
    pub clock: f64,
    pub fader: ScreenFader,
    pub bus: EventBus,
    pub input: FrameInput,
    /// Contact that ended the last flight
    pub crash_info: Option<CollisionInfo>,
    player: Option<PlayerHandle>,
    next_handle: u64,
    commands: Vec<GameCommand>,
    pending_transition: Option<GameStateId>,
}

impl GameContext {
    pub fn new(config: GameFlowConfig, spawn: Pose) -> Self {
        let fader = ScreenFader::new(config.fade_time);
        Self {
            config,
            spawn,
            clock: 0.0,
            fader,
            bus: EventBus::default(),
            input: FrameInput::default(),
            crash_info: None,
            player: None,
            next_handle: 0,
            commands: Vec::new(),
            pending_transition: None,
        }
    }

    pub fn player(&self) -> Option<PlayerHandle> {
        self.player
    }

    /// Spawn a new player at the spawn pose, replacing any current one.
    pub fn spawn_player(&mut self) -> PlayerHandle {
        self.despawn_player();

        self.next_handle += 1;
        let handle = PlayerHandle(self.next_handle);
        self.player = Some(handle);
        self.push(GameCommand::SpawnPlayer {
            handle,
            pose: self.spawn,
        });
        handle
    }

    pub fn despawn_player(&mut self) {
        if let Some(handle) = self.player.take() {
            self.push(GameCommand::DespawnPlayer { handle });
        }
    }

    pub fn push(&mut self, command: GameCommand) {
        self.commands.push(command);
    }

    pub fn take_commands(&mut self) -> Vec<GameCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn commands(&self) -> &[GameCommand] {
        &self.commands
    }

    /// Ask the machine to switch state once the running hook returns.
    /// The last request wins.
    pub fn request_transition(&mut self, target: GameStateId) {
        self.pending_transition = Some(target);
    }

    pub(crate) fn take_transition(&mut self) -> Option<GameStateId> {
        self.pending_transition.take()
    }
}
