mod common;

use approx::assert_relative_eq;
use glider::components::{
    CollisionComponent, FlightController, FlightControllerConfig, PhysicsComponent,
    SpatialComponent, Wing, WingConfig,
};
use nalgebra::{UnitQuaternion, Vector3};

use crate::common::TestAppBuilder;

/// Belly down, nose along +Z
fn level() -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(std::f64::consts::FRAC_PI_2, 0.0, 0.0)
}

fn glider(position: Vector3<f64>, velocity: Vector3<f64>) -> impl bevy::prelude::Bundle {
    let mut spatial = SpatialComponent::at_pose(position, level());
    spatial.velocity = velocity;
    (
        spatial,
        PhysicsComponent::new(80.0, nalgebra::Matrix3::from_diagonal(&Vector3::new(22.0, 6.0, 26.0))),
        CollisionComponent::new(0.5),
        Wing::new(WingConfig::default()).unwrap(),
        FlightController::new(FlightControllerConfig::default()).unwrap(),
    )
}

fn ballistic(position: Vector3<f64>, velocity: Vector3<f64>) -> impl bevy::prelude::Bundle {
    let mut spatial = SpatialComponent::at_pose(position, level());
    spatial.velocity = velocity;
    (spatial, PhysicsComponent::point_mass(80.0))
}

#[test]
fn test_lift_slows_descent() {
    let mut app = TestAppBuilder::new().without_game_flow().build();
    let start = Vector3::new(0.0, 1000.0, 0.0);
    let velocity = Vector3::new(0.0, 0.0, 40.0);

    let glider = app.spawn(glider(start, velocity));
    let stone = app.spawn(ballistic(start + Vector3::new(50.0, 0.0, 0.0), velocity));

    app.run_seconds(1.0);

    let glider_drop = start.y - app.get::<SpatialComponent>(glider).unwrap().position.y;
    let stone_drop = start.y - app.get::<SpatialComponent>(stone).unwrap().position.y;

    assert!(stone_drop > 4.5, "ballistic body fell {stone_drop} m");
    assert!(
        glider_drop < stone_drop,
        "glider fell {glider_drop} m, ballistic body {stone_drop} m"
    );
    assert!(app.get::<SpatialComponent>(glider).unwrap().position.z > 30.0);
}

#[test]
fn test_lift_grows_with_square_of_airspeed() {
    let mut app = TestAppBuilder::new().without_game_flow().build();

    let slow = app.spawn(glider(
        Vector3::new(0.0, 1000.0, 0.0),
        Vector3::new(0.0, 0.0, 20.0),
    ));
    let fast = app.spawn(glider(
        Vector3::new(100.0, 1000.0, 0.0),
        Vector3::new(0.0, 0.0, 40.0),
    ));

    // Forces of the first step come from the spawn state
    app.run_steps(1);

    let slow_lift = app.get::<Wing>(slow).unwrap().forces.lift;
    let fast_lift = app.get::<Wing>(fast).unwrap().forces.lift;
    assert!(slow_lift > 0.0);
    assert_relative_eq!(fast_lift / slow_lift, 4.0, max_relative = 1e-9);
}

#[test]
fn test_body_comes_to_rest_on_ground() {
    let mut app = TestAppBuilder::new().without_game_flow().build();
    let stone = app.spawn((
        SpatialComponent::at_pose(Vector3::new(0.0, 3.0, 0.0), level()),
        PhysicsComponent::point_mass(10.0),
        CollisionComponent::new(0.5),
    ));

    app.run_seconds(3.0);

    let spatial = app.get::<SpatialComponent>(stone).unwrap();
    assert_relative_eq!(spatial.position.y, 0.5, epsilon = 0.05);
    assert!(spatial.velocity.norm() < 0.5);
    assert_eq!(
        app.get::<CollisionComponent>(stone).unwrap().collision_count,
        1
    );
}

#[test]
fn test_ground_effect_boosts_lift_multiplier() {
    let mut app = TestAppBuilder::new().without_game_flow().build();
    let low = app.spawn(glider(
        Vector3::new(0.0, 2.0, 0.0),
        Vector3::new(0.0, 0.0, 30.0),
    ));

    app.run_steps(1);

    let controller = app.get::<FlightController>(low).unwrap();
    assert!(controller.in_flight);
    assert!(controller.lift_multiplier > 1.0);
    assert_relative_eq!(
        app.get::<Wing>(low).unwrap().lift_multiplier,
        controller.lift_multiplier
    );
}
