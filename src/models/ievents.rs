//! # Door Sensor Event Definitions

//! The events accepted by the door sensor's state machine. Events carry no payload: the door raises
//! `DoorOpened` and `DoorClosed`, the black hole detection engine raises `BlackHoleDetected`.

use serde::{Deserialize, Serialize};
use derive_more::FromStr;

/// Represents the stimuli that can be fired into the door state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromStr)]
pub enum SensorEvent {
    /// A black hole was detected near the vehicle
    BlackHoleDetected,
    /// The door reported that it opened
    DoorOpened,
    /// The door reported that it closed
    DoorClosed,
}

impl SensorEvent {
    /// All events, in declaration order
    pub const ALL: [SensorEvent; 3] = [
        SensorEvent::BlackHoleDetected,
        SensorEvent::DoorOpened,
        SensorEvent::DoorClosed,
    ];
}
