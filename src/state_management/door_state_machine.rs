use std::sync::Arc;
use tracing::info;
use crate::errors::DoorSensorResult;
use crate::models::{local_now, DoorStatus, MachineSnapshot, Mode, SensorEvent, SensorState};
use crate::services::{LevelResolver, StatusLogger, TravelCoordinator};
use crate::state_machine::{
    ActionExecutor, FireOutcome, HistoryType, SensorAction, StateMachine, StateMachineDefinition,
};

/// Tracks the door's open/closed status in normal and panic mode and dispatches travel whenever the
/// door closes.
///
/// The machine is synchronous: `fire` runs every exit, transition and entry action, including the calls
/// into the collaborators, before it returns. Callers serialize their events (see `DoorSensor`).
pub struct DoorStateMachine {
    machine: StateMachine,
    actions: DoorActions,
}

/// Executes the door sensor's actions against the injected collaborators
struct DoorActions {
    status_logger: Arc<dyn StatusLogger>,
    travel_coordinator: Arc<dyn TravelCoordinator>,
    level_resolver: Arc<dyn LevelResolver>,
    in_panic_mode: bool,
}

impl DoorStateMachine {
    /// Creates the machine from the door sensor's transition table.
    ///
    /// # Returns
    ///
    /// * `Ok(DoorStateMachine)` - not started yet
    /// * `Err(DoorSensorError::DefinitionError)` if the table is inconsistent
    pub fn new(
        status_logger: Arc<dyn StatusLogger>,
        travel_coordinator: Arc<dyn TravelCoordinator>,
        level_resolver: Arc<dyn LevelResolver>,
    ) -> DoorSensorResult<Self> {
        let graph = Self::definition().build()?;
        Ok(Self {
            machine: StateMachine::new(graph),
            actions: DoorActions {
                status_logger,
                travel_coordinator,
                level_resolver,
                in_panic_mode: false,
            },
        })
    }

    /// The door sensor's hierarchy and transition table
    pub fn definition() -> StateMachineDefinition {
        let mut definition = StateMachineDefinition::new();

        definition.define_hierarchy_on(SensorState::NormalMode)
            .with_history_type(HistoryType::Deep)
            .with_initial_sub_state(SensorState::DoorClosedInNormalMode)
            .with_sub_state(SensorState::DoorOpenInNormalMode);

        definition.define_hierarchy_on(SensorState::PanicMode)
            .with_history_type(HistoryType::Deep)
            .with_initial_sub_state(SensorState::DoorClosedInPanicMode)
            .with_sub_state(SensorState::DoorOpenInPanicMode);

        definition.in_state(SensorState::DoorClosedInNormalMode)
            .on(SensorEvent::BlackHoleDetected).goto(SensorState::DoorClosedInPanicMode)
            .on(SensorEvent::DoorOpened).goto(SensorState::DoorOpenInNormalMode)
                .execute(SensorAction::LogDoorOpenedInNormalMode);

        definition.in_state(SensorState::DoorOpenInNormalMode)
            .on(SensorEvent::BlackHoleDetected).goto(SensorState::DoorOpenInPanicMode)
            .on(SensorEvent::DoorClosed).goto(SensorState::DoorClosedInNormalMode)
                .execute(SensorAction::DetermineTargetLevel)
                .execute(SensorAction::LogDoorClosedInNormalMode);

        definition.in_state(SensorState::DoorClosedInPanicMode)
            .on(SensorEvent::DoorOpened).goto(SensorState::DoorOpenInPanicMode)
                .execute(SensorAction::LogDoorOpenedInPanicMode);

        definition.in_state(SensorState::DoorOpenInPanicMode)
            .on(SensorEvent::DoorClosed).goto(SensorState::DoorClosedInPanicMode)
                .execute(SensorAction::DetermineTargetLevel)
                .execute(SensorAction::LogDoorClosedInPanicMode);

        definition.in_state(SensorState::PanicMode)
            .execute_on_entry(SensorAction::LogBlackHoleDetected)
            .execute_on_entry(SensorAction::SetInPanicModeFlag)
            .on(SensorEvent::BlackHoleDetected);

        definition.initialize(SensorState::NormalMode);
        definition
    }

    /// Enters `DoorClosedInNormalMode` on the first call, resumes the frozen state afterwards
    pub fn start(&mut self) -> DoorSensorResult<()> {
        self.machine.start(&mut self.actions)
    }

    /// Stops accepting events. State, history and the panic flag are kept.
    pub fn stop(&mut self) {
        self.machine.stop();
    }

    /// Dispatches `event`; events the active state does not handle are ignored
    pub fn fire(&mut self, event: SensorEvent) -> DoorSensorResult<FireOutcome> {
        self.machine.fire(event, &mut self.actions)
    }

    pub fn notify_door_opened(&mut self) -> DoorSensorResult<FireOutcome> {
        self.fire(SensorEvent::DoorOpened)
    }

    pub fn notify_door_closed(&mut self) -> DoorSensorResult<FireOutcome> {
        self.fire(SensorEvent::DoorClosed)
    }

    pub fn notify_black_hole_detected(&mut self) -> DoorSensorResult<FireOutcome> {
        self.fire(SensorEvent::BlackHoleDetected)
    }

    /// Moves to `target` outside the transition table. A mode composite resumes its remembered leaf.
    pub fn transition_to(&mut self, target: SensorState) -> DoorSensorResult<FireOutcome> {
        self.machine.transition_to(target, &mut self.actions)
    }

    pub fn current_state(&self) -> Option<SensorState> {
        self.machine.current_state()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.current_state().map(|state| state.mode())
    }

    pub fn door_status(&self) -> Option<DoorStatus> {
        self.current_state().and_then(|state| state.door_status())
    }

    pub fn in_panic_mode(&self) -> bool {
        self.actions.in_panic_mode
    }

    pub fn is_running(&self) -> bool {
        self.machine.is_running()
    }

    /// The leaf `composite` resumes when re-entered without a target
    pub fn history_of(&self, composite: SensorState) -> Option<SensorState> {
        self.machine.history_of(composite)
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            current_state: self.current_state(),
            mode: self.mode(),
            door_status: self.door_status(),
            in_panic_mode: self.in_panic_mode(),
            running: self.is_running(),
            history: self.machine.history_entries(),
            taken_at: local_now(),
        }
    }
}

impl DoorActions {
    fn log(&self, message: &str) {
        self.status_logger.log(message);
        info!("{}", message);
    }

    fn determine_target_level(&self) -> DoorSensorResult<()> {
        let level = self.level_resolver.resolve(self.in_panic_mode)?;
        self.travel_coordinator.travel_to(level)
    }
}

impl ActionExecutor for DoorActions {
    fn execute(&mut self, action: SensorAction) -> DoorSensorResult<()> {
        match action {
            SensorAction::SetInPanicModeFlag => {
                self.in_panic_mode = true;
                Ok(())
            }
            SensorAction::DetermineTargetLevel => self.determine_target_level(),
            SensorAction::LogDoorOpenedInNormalMode
            | SensorAction::LogDoorClosedInNormalMode
            | SensorAction::LogDoorOpenedInPanicMode
            | SensorAction::LogDoorClosedInPanicMode
            | SensorAction::LogBlackHoleDetected => {
                if let Some(message) = action.status_message() {
                    self.log(message);
                }
                Ok(())
            }
        }
    }
}
