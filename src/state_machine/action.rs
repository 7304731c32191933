use serde::{Deserialize, Serialize};
use crate::errors::DoorSensorResult;

/// The side effects the door state machine can attach to transitions and state entries/exits.
///
/// Actions are plain data so a definition can be inspected and compared; an `ActionExecutor`
/// gives them their meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorAction {
    LogDoorOpenedInNormalMode,
    LogDoorClosedInNormalMode,
    LogDoorOpenedInPanicMode,
    LogDoorClosedInPanicMode,
    LogBlackHoleDetected,
    SetInPanicModeFlag,
    /// Resolves the destination level from the panic flag and dispatches travel to it
    DetermineTargetLevel,
}

impl SensorAction {
    /// The status line written by a logging action, `None` for the other actions
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            SensorAction::LogDoorOpenedInNormalMode => Some("door is open!"),
            SensorAction::LogDoorClosedInNormalMode => Some("door is closed!"),
            SensorAction::LogDoorOpenedInPanicMode => Some("door is open! PANIC!!!"),
            SensorAction::LogDoorClosedInPanicMode => Some("door is closed! PANIC!!!"),
            SensorAction::LogBlackHoleDetected => Some("black hole detected! PANIC!!!"),
            SensorAction::SetInPanicModeFlag | SensorAction::DetermineTargetLevel => None,
        }
    }
}

/// Carries out the actions requested by a running `StateMachine`
pub trait ActionExecutor {
    /// Executes a single action. Errors are collected by the machine and returned from the dispatch.
    fn execute(&mut self, action: SensorAction) -> DoorSensorResult<()>;
}
