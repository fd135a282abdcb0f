mod integrator;

pub use integrator::{integrate_state, physics_integrator_system};
