//! # Door Sensor State Enums

//! This module defines the states of the door sensor's hierarchical state machine together with the two
//! dimensions they are composed from: the operating `Mode` and the `DoorStatus`.

use serde::{Deserialize, Serialize};
use derive_more::FromStr;

/// Represents every state of the door sensor's state machine, composite and leaf alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromStr)]
pub enum SensorState {
    /// Composite state holding the door states while no black hole has been detected.
    NormalMode,
    /// Composite state holding the door states once a black hole has been detected.
    PanicMode,
    /// The door is open and the sensor operates normally.
    DoorOpenInNormalMode,
    /// The door is closed and the sensor operates normally.
    DoorClosedInNormalMode,
    /// The door is open after a black hole was detected.
    DoorOpenInPanicMode,
    /// The door is closed after a black hole was detected.
    DoorClosedInPanicMode,
}

impl SensorState {
    /// All states, composites first.
    pub const ALL: [SensorState; 6] = [
        SensorState::NormalMode,
        SensorState::PanicMode,
        SensorState::DoorOpenInNormalMode,
        SensorState::DoorClosedInNormalMode,
        SensorState::DoorOpenInPanicMode,
        SensorState::DoorClosedInPanicMode,
    ];

    /// The four leaf states.
    pub const LEAVES: [SensorState; 4] = [
        SensorState::DoorClosedInNormalMode,
        SensorState::DoorOpenInNormalMode,
        SensorState::DoorClosedInPanicMode,
        SensorState::DoorOpenInPanicMode,
    ];

    /// Returns the leaf state for the given mode and door status
    pub fn leaf(mode: Mode, status: DoorStatus) -> Self {
        match (mode, status) {
            (Mode::Normal, DoorStatus::Open) => SensorState::DoorOpenInNormalMode,
            (Mode::Normal, DoorStatus::Closed) => SensorState::DoorClosedInNormalMode,
            (Mode::Panic, DoorStatus::Open) => SensorState::DoorOpenInPanicMode,
            (Mode::Panic, DoorStatus::Closed) => SensorState::DoorClosedInPanicMode,
        }
    }

    /// Returns the composite state representing `mode`
    pub fn composite(mode: Mode) -> Self {
        match mode {
            Mode::Normal => SensorState::NormalMode,
            Mode::Panic => SensorState::PanicMode,
        }
    }

    /// Returns `true` for the mode composites, which are never active on their own
    pub fn is_composite(&self) -> bool {
        matches!(self, SensorState::NormalMode | SensorState::PanicMode)
    }

    /// The mode a state belongs to. Composites report the mode they represent.
    pub fn mode(&self) -> Mode {
        match self {
            SensorState::NormalMode
            | SensorState::DoorOpenInNormalMode
            | SensorState::DoorClosedInNormalMode => Mode::Normal,
            SensorState::PanicMode
            | SensorState::DoorOpenInPanicMode
            | SensorState::DoorClosedInPanicMode => Mode::Panic,
        }
    }

    /// The door status of a leaf state, `None` for composites
    pub fn door_status(&self) -> Option<DoorStatus> {
        match self {
            SensorState::DoorOpenInNormalMode | SensorState::DoorOpenInPanicMode => Some(DoorStatus::Open),
            SensorState::DoorClosedInNormalMode | SensorState::DoorClosedInPanicMode => Some(DoorStatus::Closed),
            SensorState::NormalMode | SensorState::PanicMode => None,
        }
    }
}

/// Represents the two mutually exclusive operating modes of the sensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy, Serialize, Deserialize, FromStr)]
pub enum Mode {
    /// No black hole has been detected yet.
    Normal,
    /// A black hole has been detected. There is no way back.
    Panic,
}

/// Represents the position of the observed door.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy, Serialize, Deserialize, FromStr)]
pub enum DoorStatus {
    /// The door is open.
    Open,
    /// The door is closed.
    Closed,
}
