use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};
use crate::errors::DoorSensorResult;
use crate::models::{MachineSnapshot, SensorEvent};
use crate::sensors::Sensor;
use crate::state_machine::FireOutcome;
use crate::state_management::{DoorStateMachine, EventDispatcher, SensorLifecycle};

/// Observes a door and feeds its signals, together with black hole detections, into a `DoorStateMachine`.
///
/// Signals arrive through the sensor's own bounded channel; `run` is the single consumer, which is
/// what serializes the independent event sources onto the synchronous machine.
pub struct DoorSensor {
    machine: DoorStateMachine,
    receiver: mpsc::Receiver<SensorEvent>,
    lifecycle: Arc<SensorLifecycle>,
    snapshots: watch::Sender<MachineSnapshot>,
}

impl DoorSensor {
    /// Creates a new `DoorSensor`.
    ///
    /// # Arguments
    ///
    /// * `machine` - The state machine tracking the door
    /// * `event_buffer` - The number of signals that may wait for the machine
    ///
    /// # Returns
    ///
    /// The sensor and the dispatcher event sources use to reach it. Clone the dispatcher for every source;
    /// the loop in `run` ends once all of them are dropped.
    pub fn new(machine: DoorStateMachine, event_buffer: usize) -> (Self, EventDispatcher) {
        let (event_sender, receiver) = mpsc::channel(event_buffer.max(1));
        let (snapshots, _) = watch::channel(machine.snapshot());
        (Self {
            machine,
            receiver,
            lifecycle: Arc::new(SensorLifecycle::new()),
            snapshots,
        }, EventDispatcher::new(event_sender))
    }

    /// Subscribes to the machine's snapshot, republished after every processed event
    pub fn subscribe(&self) -> watch::Receiver<MachineSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish_snapshot(&self) {
        self.snapshots.send_replace(self.machine.snapshot());
    }

    pub fn lifecycle(&self) -> Arc<SensorLifecycle> {
        Arc::clone(&self.lifecycle)
    }

    pub fn machine(&self) -> &DoorStateMachine {
        &self.machine
    }

    /// Feeds events into the state machine until shutdown is triggered or every dispatcher is gone.
    ///
    /// Collaborator failures are logged and do not end the loop. Events still queued when the loop ends
    /// are processed before returning.
    pub async fn run(&mut self) -> DoorSensorResult<()> {
        info!("Starting {}", self.name());
        let lifecycle = Arc::clone(&self.lifecycle);

        loop {
            let event = tokio::select! {
                _ = lifecycle.wait_for_shutdown() => None,
                event = self.receiver.recv() => event,
            };
            match event {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        let drained = self.process_pending();
        info!("{} stopped ({} queued events processed on shutdown)", self.name(), drained);
        Ok(())
    }

    /// Processes every event already waiting in the channel without blocking
    pub fn process_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.handle_event(event);
            count += 1;
        }
        count
    }

    fn handle_event(&mut self, event: SensorEvent) {
        match self.machine.fire(event) {
            Ok(FireOutcome::Transitioned { from, to }) => debug!("{:?}: {:?} -> {:?}", event, from, to),
            Ok(outcome) => debug!("{:?}: {:?}", event, outcome),
            Err(e) => error!("Error while processing {:?}: {}", event, e),
        }
        self.publish_snapshot();
    }
}

impl Sensor for DoorSensor {
    fn name(&self) -> &str {
        "Door sensor"
    }

    fn describe(&self) -> String {
        "The door sensor detects opening and closing of doors".to_string()
    }

    fn start_observation(&mut self) -> DoorSensorResult<()> {
        info!("{}: starting observation", self.name());
        let result = self.machine.start();
        self.publish_snapshot();
        result
    }

    fn stop_observation(&mut self) {
        info!("{}: stopping observation", self.name());
        self.machine.stop();
        self.publish_snapshot();
    }
}
