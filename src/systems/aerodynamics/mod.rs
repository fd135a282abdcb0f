mod atmosphere;
mod force_calculator;

pub use atmosphere::atmosphere_tick_system;
pub use force_calculator::{calculate_wing_forces, wing_force_system};
