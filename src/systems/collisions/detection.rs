use std::collections::HashSet;

use bevy::log::warn_once;
use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{
    CollisionComponent, CollisionEvent, CollisionInfo, GoalReachedEvent, PhysicsComponent, Player,
    SpatialComponent,
};
use crate::resources::{GoalZone, GroundModel};

/// Contact between a sphere of `radius` around the body and the terrain.
pub fn check_ground_contact(
    ground: &GroundModel,
    spatial: &SpatialComponent,
    radius: f64,
) -> Option<CollisionInfo> {
    let position = spatial.position;
    let height = ground.terrain_height(position.x, position.z);
    let penetration_depth = radius - (position.y - height);
    if penetration_depth <= 0.0 {
        return None;
    }

    Some(CollisionInfo {
        contact_point: Vector3::new(position.x, height, position.z),
        normal: ground.terrain_normal(position.x, position.z),
        // Ground is static
        relative_velocity: -spatial.velocity,
        penetration_depth,
    })
}

/// Push the body out of the ground, stop motion into it and apply friction.
pub fn resolve_ground_contact(spatial: &mut SpatialComponent, info: &CollisionInfo, friction: f64) {
    spatial.position.y += info.penetration_depth;

    let into_ground = spatial.velocity.dot(&info.normal);
    if into_ground < 0.0 {
        spatial.velocity -= info.normal * into_ground;
    }
    let normal_part = info.normal * spatial.velocity.dot(&info.normal);
    spatial.velocity = normal_part + (spatial.velocity - normal_part) * friction;
    spatial.angular_velocity *= friction;
}

/// Ground contacts for every dynamic body. An event is sent when a contact
/// begins; the body stays in contact until it separates again.
pub fn collision_detection_system(
    mut query: Query<(
        Entity,
        &mut SpatialComponent,
        &PhysicsComponent,
        &mut CollisionComponent,
    )>,
    ground: Option<Res<GroundModel>>,
    time: Res<Time>,
    mut collision_events: EventWriter<CollisionEvent>,
) {
    let Some(ground) = ground else {
        warn_once!("No ground model resource, contacts are not detected");
        return;
    };

    for (entity, mut spatial, physics, mut collision) in query.iter_mut() {
        if physics.kinematic {
            continue;
        }

        let Some(info) = check_ground_contact(&ground, &spatial, collision.radius) else {
            collision.clear_contact();
            continue;
        };

        if !collision.has_collided {
            collision.register_collision(time.elapsed_secs_f64());
            debug!("Ground contact for {:?} at {:?}", entity, info.contact_point);
            collision_events.send(CollisionEvent { entity, info });
        }
        resolve_ground_contact(&mut spatial, &info, collision.friction);
    }
}

/// Raises [`GoalReachedEvent`] when a player body enters the goal zone.
pub fn goal_zone_system(
    query: Query<(Entity, &SpatialComponent, &PhysicsComponent), With<Player>>,
    goal: Option<Res<GoalZone>>,
    mut inside: Local<HashSet<Entity>>,
    mut goal_events: EventWriter<GoalReachedEvent>,
) {
    let Some(goal) = goal else {
        return;
    };

    let bodies = query.iter().map(|(entity, spatial, physics)| {
        (entity, !physics.kinematic && goal.contains(&spatial.position))
    });
    for entity in track_goal_entries(&mut inside, bodies) {
        info!("Player {:?} reached the goal", entity);
        goal_events.send(GoalReachedEvent { entity });
    }
}

/// Updates the set of bodies inside the goal zone and returns those that
/// just entered it. Bodies missing from `bodies` are forgotten.
fn track_goal_entries(
    inside: &mut HashSet<Entity>,
    bodies: impl Iterator<Item = (Entity, bool)>,
) -> Vec<Entity> {
    let mut present = HashSet::new();
    let mut entered = Vec::new();
    for (entity, in_zone) in bodies {
        if in_zone {
            present.insert(entity);
            if !inside.contains(&entity) {
                entered.push(entity);
            }
        }
    }
    *inside = present;
    entered
}
