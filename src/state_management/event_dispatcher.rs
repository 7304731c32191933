use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use crate::errors::{DoorSensorError, DoorSensorResult};
use crate::models::SensorEvent;
use tracing::{debug, error};

/// Serializes signals from independent sources onto the door sensor's event channel.
///
/// The door and the black hole detection engine each hold a clone; the door sensor owns the single
/// receiving end, so the state machine only ever sees one event at a time.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    /// The sender end of the door sensor's event channel.
    event_sender: mpsc::Sender<SensorEvent>,
}

impl EventDispatcher {
    /// Creates a new `EventDispatcher`.
    ///
    /// # Arguments
    ///
    /// * `event_sender` - The sender end of the door sensor's event channel.
    pub fn new(event_sender: mpsc::Sender<SensorEvent>) -> Self {
        Self { event_sender }
    }

    /// Dispatches an event, waiting for room in the channel if necessary.
    ///
    /// # Returns
    ///
    /// A `DoorSensorResult` indicating success or failure of the dispatch operation.
    pub async fn dispatch_event(&self, event: SensorEvent) -> DoorSensorResult<()> {
        debug!("Dispatching event: {:?}", event);
        self.event_sender.send(event).await
            .map_err(|e| {
                error!("Failed to dispatch event: {:?}", e);
                DoorSensorError::ChannelSendError(format!("Failed to dispatch event: {}", e))
            })
    }

    /// Dispatches an event without waiting, for callers outside an async context.
    pub fn try_dispatch_event(&self, event: SensorEvent) -> DoorSensorResult<()> {
        debug!("Dispatching event: {:?}", event);
        self.event_sender.try_send(event).map_err(|e| {
            let reason = match e {
                TrySendError::Full(_) => "event channel is full",
                TrySendError::Closed(_) => "event channel is closed",
            };
            error!("Failed to dispatch event {:?}: {}", event, reason);
            DoorSensorError::ChannelSendError(format!("Failed to dispatch {:?}: {}", event, reason))
        })
    }

    /// Dispatches an event from a plain thread, blocking while the channel is full.
    ///
    /// Must not be called from within an async context.
    pub fn blocking_dispatch_event(&self, event: SensorEvent) -> DoorSensorResult<()> {
        debug!("Dispatching event: {:?}", event);
        self.event_sender.blocking_send(event).map_err(DoorSensorError::from)
    }

    pub async fn notify_door_opened(&self) -> DoorSensorResult<()> {
        self.dispatch_event(SensorEvent::DoorOpened).await
    }

    pub async fn notify_door_closed(&self) -> DoorSensorResult<()> {
        self.dispatch_event(SensorEvent::DoorClosed).await
    }

    pub async fn notify_black_hole_detected(&self) -> DoorSensorResult<()> {
        self.dispatch_event(SensorEvent::BlackHoleDetected).await
    }

    /// Checks if the event channel is still open and able to send events.
    pub fn is_channel_open(&self) -> bool {
        !self.event_sender.is_closed()
    }
}
