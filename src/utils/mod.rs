pub mod constants;
pub mod curve;
pub mod errors;
pub mod math;
pub mod rng;

pub use constants::*;
pub use curve::{Curve, Keyframe};
pub use errors::*;
pub use math::*;
pub use rng::{random_in_unit_sphere, RngManager};
