use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::models::istates::{DoorStatus, Mode, SensorState};

/// A remembered leaf of a composite state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The composite state owning the history
    pub composite: SensorState,
    /// The state resumed when the composite is re-entered without a target
    pub last_active: SensorState,
}

/// A point-in-time view of a door state machine, used for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// The active leaf, `None` before the machine was started for the first time
    pub current_state: Option<SensorState>,
    /// The mode derived from the active leaf
    pub mode: Option<Mode>,
    /// The door status derived from the active leaf
    pub door_status: Option<DoorStatus>,
    /// Whether a black hole has ever been detected
    pub in_panic_mode: bool,
    /// Whether the machine currently accepts events
    pub running: bool,
    /// History values of every composite visited so far
    pub history: Vec<HistoryEntry>,
    /// When the snapshot was taken
    pub taken_at: NaiveDateTime,
}
