use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info};
use crate::errors::{DoorSensorError, DoorSensorResult};
use crate::models::local_now;

/// Receives the destination level computed when the door closes
pub trait TravelCoordinator: Send + Sync {
    /// Requests travel to the absolute destination `level`
    fn travel_to(&self, level: i32) -> DoorSensorResult<()>;
}

/// A travel request handed to the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelCommand {
    /// The destination level
    pub level: i32,
    /// When the door sensor requested the travel
    pub requested_at: NaiveDateTime,
}

/// Sends travel commands over a bounded channel.
///
/// The state machine is synchronous, so commands are enqueued with `try_send`: a full or closed
/// channel is reported as `DoorSensorError::TravelError` and the command is not retried.
#[derive(Debug, Clone)]
pub struct TravelDispatcher {
    sender: mpsc::Sender<TravelCommand>,
}

impl TravelDispatcher {
    pub fn new(sender: mpsc::Sender<TravelCommand>) -> Self {
        Self { sender }
    }

    /// Creates a dispatcher together with the receiving end of its channel
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TravelCommand>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }

    pub fn is_channel_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

impl TravelCoordinator for TravelDispatcher {
    fn travel_to(&self, level: i32) -> DoorSensorResult<()> {
        let command = TravelCommand { level, requested_at: local_now() };
        info!("Dispatching travel to level {}", level);
        self.sender.try_send(command).map_err(|e| {
            let reason = match e {
                TrySendError::Full(_) => "travel queue is full",
                TrySendError::Closed(_) => "travel queue is closed",
            };
            error!("Failed to dispatch travel to level {}: {}", level, reason);
            DoorSensorError::TravelError(format!("level {}: {}", level, reason))
        })
    }
}

/// Consumes travel commands and hands them to the vehicle
pub struct TravelCommandProcessor {
    receiver: mpsc::Receiver<TravelCommand>,
    processed: u64,
    last_level: Option<i32>,
}

impl TravelCommandProcessor {
    pub fn new(receiver: mpsc::Receiver<TravelCommand>) -> Self {
        Self {
            receiver,
            processed: 0,
            last_level: None,
        }
    }

    /// Processes commands until every dispatcher has been dropped
    ///
    /// # Returns
    ///
    /// The number of commands processed over the lifetime of the processor
    pub async fn run(&mut self) -> DoorSensorResult<u64> {
        while let Some(command) = self.receiver.recv().await {
            self.process_command(command);
        }
        info!("Travel command channel closed after {} commands", self.processed);
        Ok(self.processed)
    }

    /// Processes every command already waiting in the channel without blocking
    pub fn process_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(command) = self.receiver.try_recv() {
            self.process_command(command);
            count += 1;
        }
        count
    }

    fn process_command(&mut self, command: TravelCommand) {
        info!("Travelling to level {} (requested at {})", command.level, command.requested_at);
        self.processed += 1;
        self.last_level = Some(command.level);
    }

    pub fn processed_commands(&self) -> u64 {
        self.processed
    }

    pub fn last_level(&self) -> Option<i32> {
        self.last_level
    }
}
