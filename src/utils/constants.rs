pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const SEA_LEVEL_AIR_DENSITY: f64 = 1.293; // kg/m^3, dry air at 0 °C

// Per-axis time scaling of the turbulence noise lookups
pub const TURBULENCE_TIME_SCALE_X: f64 = 0.1365143;
pub const TURBULENCE_TIME_SCALE_Y: f64 = 1.21688;
pub const TURBULENCE_TIME_SCALE_Z: f64 = 2.5564;

pub const PHYSICS_TIMESTEP: f64 = 1.0 / 50.0; // s
pub const START_JUMP_DURATION: f64 = 0.9; // s, length of the take-off clip
pub const LAUNCH_SPEED: f64 = 20.0; // m/s along spawn up + forward
pub const CRASH_NORMAL_REBOUND: f64 = 1.1;
pub const CRASH_VELOCITY_SCALE: f64 = 0.5;

pub const ANIM_START_IDLE: &str = "startidle";
pub const ANIM_START_JUMP: &str = "startjump";
pub const ANIM_CAMERA_IDLE: &str = "cameraIdle";
