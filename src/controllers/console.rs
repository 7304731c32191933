//! Console stand-in for the door hardware and the black hole detection engine.
//!
//! Each line read from the input is one signal: `open`, `close` or `blackhole` (the event names
//! `DoorOpened`, `DoorClosed` and `BlackHoleDetected` are accepted as well). `status` prints a snapshot
//! of the state machine, `quit` ends the input.

use std::io::BufRead;
use std::str::FromStr;
use tokio::sync::watch;
use tracing::{info, warn};
use crate::errors::{DoorSensorError, DoorSensorResult};
use crate::models::{MachineSnapshot, SensorEvent};
use crate::state_management::EventDispatcher;

/// A single line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCommand {
    Signal(SensorEvent),
    Status,
    Quit,
}

impl FromStr for SignalCommand {
    type Err = DoorSensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = s.trim();
        match command.to_ascii_lowercase().as_str() {
            "open" | "opened" => Ok(SignalCommand::Signal(SensorEvent::DoorOpened)),
            "close" | "closed" => Ok(SignalCommand::Signal(SensorEvent::DoorClosed)),
            "blackhole" | "black-hole" | "panic" => Ok(SignalCommand::Signal(SensorEvent::BlackHoleDetected)),
            "status" => Ok(SignalCommand::Status),
            "quit" | "exit" => Ok(SignalCommand::Quit),
            _ => SensorEvent::from_str(command)
                .map(SignalCommand::Signal)
                .map_err(|_| DoorSensorError::InvalidSignal(command.to_string())),
        }
    }
}

/// Reads signal commands line by line and forwards them to the door sensor.
///
/// Reading is blocking; run the source on its own thread, never on a Tokio worker.
pub struct ConsoleSignalSource<R> {
    reader: R,
    dispatcher: EventDispatcher,
    snapshots: Option<watch::Receiver<MachineSnapshot>>,
}

impl<R: BufRead> ConsoleSignalSource<R> {
    pub fn new(reader: R, dispatcher: EventDispatcher) -> Self {
        Self { reader, dispatcher, snapshots: None }
    }

    /// Enables the `status` command
    pub fn with_snapshots(mut self, snapshots: watch::Receiver<MachineSnapshot>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    /// Forwards signals until `quit` or the end of input
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - the number of signals forwarded
    /// * `Err(DoorSensorError)` if reading fails or the door sensor is gone
    pub fn run(mut self) -> DoorSensorResult<usize> {
        let mut forwarded = 0;
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<SignalCommand>() {
                Ok(SignalCommand::Signal(event)) => {
                    info!("Console signal: {:?}", event);
                    self.dispatcher.blocking_dispatch_event(event)?;
                    forwarded += 1;
                }
                Ok(SignalCommand::Status) => self.report_status()?,
                Ok(SignalCommand::Quit) => break,
                Err(e) => warn!("Ignoring console input: {}", e),
            }
        }
        info!("Console input closed after {} signals", forwarded);
        Ok(forwarded)
    }

    fn report_status(&self) -> DoorSensorResult<()> {
        match &self.snapshots {
            Some(snapshots) => {
                let snapshot = snapshots.borrow().clone();
                info!("Door sensor status: {}", serde_json::to_string(&snapshot)?);
            }
            None => warn!("Status is not available on this console"),
        }
        Ok(())
    }
}
