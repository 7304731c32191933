#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use parking_lot::Mutex;
use vhpt_door_sensor::errors::{DoorSensorError, DoorSensorResult};
use vhpt_door_sensor::services::{LevelResolver, StatusLogger, TravelCoordinator};
use vhpt_door_sensor::state_management::DoorStateMachine;

pub const NORMAL_LEVEL: i32 = 42;
pub const PANIC_LEVEL: i32 = 1;

/// A collaborator call observed by the fakes, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Log(String),
    Resolve(bool),
    TravelTo(i32),
}

#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.calls().into_iter().filter_map(|call| match call {
            Call::Log(message) => Some(message),
            _ => None,
        }).collect()
    }

    pub fn travels(&self) -> Vec<i32> {
        self.calls().into_iter().filter_map(|call| match call {
            Call::TravelTo(level) => Some(level),
            _ => None,
        }).collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }
}

pub struct RecordingLogger(pub Arc<Recorder>);

impl StatusLogger for RecordingLogger {
    fn log(&self, message: &str) {
        self.0.record(Call::Log(message.to_string()));
    }
}

pub struct RecordingTravelCoordinator {
    pub recorder: Arc<Recorder>,
    pub fail: bool,
}

impl TravelCoordinator for RecordingTravelCoordinator {
    fn travel_to(&self, level: i32) -> DoorSensorResult<()> {
        self.recorder.record(Call::TravelTo(level));
        if self.fail {
            return Err(DoorSensorError::TravelError(format!("vehicle unreachable for level {}", level)));
        }
        Ok(())
    }
}

pub struct RecordingLevelResolver {
    pub recorder: Arc<Recorder>,
    pub fail: bool,
}

impl LevelResolver for RecordingLevelResolver {
    fn resolve(&self, in_panic_mode: bool) -> DoorSensorResult<i32> {
        self.recorder.record(Call::Resolve(in_panic_mode));
        if self.fail {
            return Err(DoorSensorError::ResolutionError("no policy configured".to_string()));
        }
        Ok(if in_panic_mode { PANIC_LEVEL } else { NORMAL_LEVEL })
    }
}

pub fn machine_with(fail_resolve: bool, fail_travel: bool) -> (DoorStateMachine, Arc<Recorder>) {
    let recorder = Recorder::new();
    let machine = DoorStateMachine::new(
        Arc::new(RecordingLogger(Arc::clone(&recorder))),
        Arc::new(RecordingTravelCoordinator { recorder: Arc::clone(&recorder), fail: fail_travel }),
        Arc::new(RecordingLevelResolver { recorder: Arc::clone(&recorder), fail: fail_resolve }),
    ).expect("door state machine definition is valid");
    (machine, recorder)
}

pub fn machine() -> (DoorStateMachine, Arc<Recorder>) {
    machine_with(false, false)
}

pub fn started_machine() -> (DoorStateMachine, Arc<Recorder>) {
    let (mut machine, recorder) = machine();
    machine.start().unwrap();
    (machine, recorder)
}

/// A fresh directory under the system temp dir, unique per test name and process
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vhpt-door-sensor-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
