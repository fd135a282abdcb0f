use bevy::prelude::*;
use nalgebra::Vector3;
use rand_chacha::ChaCha8Rng;

use crate::components::{
    CameraComponent, CollisionComponent, CollisionEvent, FlightController, ForceMode,
    GoalReachedEvent, PhysicsComponent, Player, PlayerPresentation, Ragdoll, SpatialComponent,
    Wing,
};
use crate::resources::{GameConfig, InputAction, InputState, PlayerRegistry, ScoreState};
use crate::state::{
    AnimationTarget, CameraTarget, FrameInput, GameCommand, GameEvent, GameStateMachine,
    PlayerHandle, Pose,
};
use crate::utils::{random_in_unit_sphere, RngManager};

/// Feeds contact and goal events of the current player into the game flow
/// and advances it by one frame.
pub fn game_state_system(
    machine: Option<ResMut<GameStateMachine>>,
    registry: Res<PlayerRegistry>,
    input: Res<InputState>,
    time: Res<Time>,
    mut collisions: EventReader<CollisionEvent>,
    mut goals: EventReader<GoalReachedEvent>,
) {
    let Some(mut machine) = machine else {
        return;
    };
    let player = registry.current_entity();

    for event in collisions.read() {
        if Some(event.entity) == player {
            machine.notify(GameEvent::PlayerCollision(event.info));
        }
    }
    for event in goals.read() {
        if Some(event.entity) == player {
            machine.notify(GameEvent::PlayerFinished);
        }
    }

    let frame = FrameInput {
        jump_pressed: input.just_pressed(InputAction::Jump),
        reset_pressed: input.just_pressed(InputAction::Reset),
        quit_pressed: input.just_pressed(InputAction::Quit),
    };
    if let Err(e) = machine.tick(time.delta_secs_f64(), frame) {
        error!("Game flow tick failed: {}", e);
    }
}

/// Carries out the commands the game states issued this frame.
///
/// Runs exclusively so a player spawned by one command can be configured by
/// the commands that follow it.
pub fn apply_game_commands(
    world: &mut World,
    mut ragdoll_rng: Local<Option<ChaCha8Rng>>,
    mut ragdoll_groups: Local<u64>,
) {
    let Some(pending) = world
        .get_resource_mut::<GameStateMachine>()
        .map(|mut machine| machine.drain_commands())
    else {
        return;
    };
    if pending.is_empty() {
        return;
    }

    let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();

    for command in pending {
        debug!("Applying {:?}", command);
        match command {
            GameCommand::SpawnPlayer { handle, pose } => spawn_player(world, &config, handle, pose),
            GameCommand::DespawnPlayer { handle } => {
                let entity = world
                    .get_resource_mut::<PlayerRegistry>()
                    .and_then(|mut registry| registry.remove(handle));
                if let Some(entity) = entity {
                    world.despawn(entity);
                }
            }
            GameCommand::SetPlayerActive(active) => {
                if let Some(entity) = current_player(world) {
                    if let Some(mut presentation) = world.get_mut::<PlayerPresentation>(entity) {
                        presentation.active = active;
                    }
                    set_player_simulation(world, entity, active);
                }
            }
            GameCommand::SetPlayerSimulation(enabled) => {
                if let Some(entity) = current_player(world) {
                    set_player_simulation(world, entity, enabled);
                }
            }
            GameCommand::SetAnimationDriven(driven) => {
                if let Some(entity) = current_player(world) {
                    if let Some(mut presentation) = world.get_mut::<PlayerPresentation>(entity) {
                        presentation.animation_driven = driven;
                    }
                }
            }
            GameCommand::SetCameraFollow(follow) => {
                for mut camera in world.query::<&mut CameraComponent>().iter_mut(world) {
                    camera.follow_enabled = follow;
                }
            }
            GameCommand::SetCrashCamera(target) => {
                let entity = world
                    .get_resource::<PlayerRegistry>()
                    .and_then(|registry| match target {
                        Some(CameraTarget::Player) => registry.current_entity(),
                        Some(CameraTarget::Ragdoll) => registry.last_ragdoll,
                        None => None,
                    });
                for mut camera in world.query::<&mut CameraComponent>().iter_mut(world) {
                    camera.crash_target = entity;
                }
            }
            GameCommand::PlayAnimation { target, clip, mode } => match target {
                AnimationTarget::Player => {
                    if let Some(entity) = current_player(world) {
                        if let Some(mut presentation) = world.get_mut::<PlayerPresentation>(entity)
                        {
                            presentation.play(&clip, mode);
                        }
                    }
                }
                AnimationTarget::Camera => {
                    for mut camera in world.query::<&mut CameraComponent>().iter_mut(world) {
                        camera.animation = Some((clip.clone(), mode));
                    }
                }
            },
            GameCommand::StopAnimation { target, clip } => match target {
                AnimationTarget::Player => {
                    if let Some(entity) = current_player(world) {
                        if let Some(mut presentation) = world.get_mut::<PlayerPresentation>(entity)
                        {
                            presentation.stop(clip.as_deref());
                        }
                    }
                }
                AnimationTarget::Camera => {
                    for mut camera in world.query::<&mut CameraComponent>().iter_mut(world) {
                        let matches = match (&clip, &camera.animation) {
                            (Some(clip), Some((playing, _))) => clip == playing,
                            _ => true,
                        };
                        if matches {
                            camera.animation = None;
                        }
                    }
                }
            },
            GameCommand::LaunchPlayer { velocity } => {
                if let Some(entity) = current_player(world) {
                    if let Some(mut physics) = world.get_mut::<PhysicsComponent>(entity) {
                        physics.add_force(velocity, ForceMode::VelocityChange);
                    }
                }
            }
            GameCommand::SpawnRagdoll { velocity } => {
                let rng = ragdoll_rng.get_or_insert_with(|| {
                    world
                        .get_resource::<RngManager>()
                        .cloned()
                        .unwrap_or_default()
                        .get_rng("ragdoll")
                });
                *ragdoll_groups += 1;
                spawn_ragdoll(world, &config, rng, *ragdoll_groups, velocity);
            }
            GameCommand::Quit => {
                info!("Quit requested");
                world.send_event(AppExit::Success);
            }
        }
    }
}

/// Removes ragdoll parts that have outlived their lifetime.
pub fn ragdoll_lifetime_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Ragdoll)>,
    time: Res<Time>,
) {
    let dt = time.delta_secs_f64();
    for (entity, mut ragdoll) in query.iter_mut() {
        if ragdoll.age_by(dt) {
            commands.entity(entity).despawn();
        }
    }
}

fn current_player(world: &World) -> Option<Entity> {
    world.get_resource::<PlayerRegistry>()?.current_entity()
}

fn spawn_player(world: &mut World, config: &GameConfig, handle: PlayerHandle, pose: Pose) {
    let wing = match Wing::new(config.wing.clone()) {
        Ok(wing) => wing,
        Err(e) => {
            error!("Cannot build the player wing: {}", e);
            return;
        }
    };
    let controller = match FlightController::new(config.controller.clone()) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Cannot build the flight controller: {}", e);
            return;
        }
    };

    let entity = world
        .spawn((
            Name::new(format!("Player {}", handle.0)),
            Player { handle },
            PlayerPresentation::default(),
            SpatialComponent::at_pose(pose.position, pose.rotation),
            PhysicsComponent::new(config.player.mass, config.player.inertia_matrix()),
            CollisionComponent::new(config.player.collision_radius),
            wing,
            controller,
        ))
        .id();
    info!("Spawned player {:?} as {:?}", handle, entity);

    if let Some(mut registry) = world.get_resource_mut::<PlayerRegistry>() {
        registry.insert(handle, entity);
    }
    if let Some(mut score) = world.get_resource_mut::<ScoreState>() {
        score.reset_for_spawn();
    }
}

/// Flight control, the wing and dynamic physics go on and off together.
fn set_player_simulation(world: &mut World, entity: Entity, enabled: bool) {
    if let Some(mut physics) = world.get_mut::<PhysicsComponent>(entity) {
        physics.kinematic = !enabled;
        physics.clear_forces();
    }
    if let Some(mut wing) = world.get_mut::<Wing>(entity) {
        wing.enabled = enabled;
    }
    if let Some(mut controller) = world.get_mut::<FlightController>(entity) {
        controller.enabled = enabled;
    }
    if !enabled {
        if let Some(mut spatial) = world.get_mut::<SpatialComponent>(entity) {
            spatial.velocity = Vector3::zeros();
            spatial.angular_velocity = Vector3::zeros();
        }
    }
}

fn spawn_ragdoll(
    world: &mut World,
    config: &GameConfig,
    rng: &mut ChaCha8Rng,
    group: u64,
    velocity: Vector3<f64>,
) {
    let Some(origin) = current_player(world)
        .and_then(|entity| world.get::<SpatialComponent>(entity))
        .cloned()
    else {
        warn!("No player to replace with a ragdoll");
        return;
    };

    let ragdoll = &config.ragdoll;
    let mut first = None;
    for part in 0..ragdoll.parts {
        let offset = random_in_unit_sphere(rng) * ragdoll.part_radius * 2.0;
        let mut spatial = SpatialComponent::at_pose(origin.position + offset, origin.attitude);
        spatial.velocity = velocity + random_in_unit_sphere(rng);

        let entity = world
            .spawn((
                Name::new(format!("Ragdoll {group} part {part}")),
                Ragdoll::new(group, ragdoll.lifetime),
                spatial,
                PhysicsComponent::point_mass(ragdoll.part_mass),
                CollisionComponent::new(ragdoll.part_radius),
            ))
            .id();
        first.get_or_insert(entity);
    }

    if let Some(mut registry) = world.get_resource_mut::<PlayerRegistry>() {
        registry.last_ragdoll = first;
    }
    debug!("Spawned ragdoll {} with {} parts", group, ragdoll.parts);
}
