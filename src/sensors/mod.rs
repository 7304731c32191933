//! # Sensors
//!
//! A sensor observes part of the vehicle and reacts to what it sees. The door sensor is the only one.

pub mod door_sensor;

pub use door_sensor::DoorSensor;

use crate::errors::DoorSensorResult;

/// Common surface of every sensor, used by the bootstrapper to run and shut down observation
pub trait Sensor {
    /// A short human-readable name
    fn name(&self) -> &str;

    /// What the sensor observes
    fn describe(&self) -> String;

    /// Begins observing
    fn start_observation(&mut self) -> DoorSensorResult<()>;

    /// Stops observing; state is kept for a later restart
    fn stop_observation(&mut self);
}
