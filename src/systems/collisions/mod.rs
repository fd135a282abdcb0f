mod detection;

pub use detection::{
    check_ground_contact, collision_detection_system, goal_zone_system, resolve_ground_contact,
};
