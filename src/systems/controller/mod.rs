mod flight;

pub use flight::{
    calculate_flight_control, flight_control_system, flight_sensor_system, lift_multiplier,
    update_flight_sensors, ControlInputs, ControlOutput,
};
