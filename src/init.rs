use std::sync::Arc;
use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;
use crate::config::Settings;
use crate::models::MachineSnapshot;
use crate::sensors::{DoorSensor, Sensor};
use crate::services::{
    AsyncStatusLogger, FileStatusLogger, LevelResolver, PolicyLevelResolver, StatusLogger,
    TravelCommandProcessor, TravelCoordinator, TravelDispatcher,
};
use crate::state_management::{DoorStateMachine, EventDispatcher};

/// Everything the application needs once the door sensor is wired up
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub door_sensor: DoorSensor,
    pub event_dispatcher: EventDispatcher,
    pub status_logger: Arc<AsyncStatusLogger>,
    pub travel_processor: TravelCommandProcessor,
}

/// Builds the door sensor and its collaborators from `settings`.
///
/// Must be called from within a Tokio runtime: the asynchronous status logger spawns its worker here.
pub fn initialize(settings: Arc<Settings>) -> Result<AppContext> {
    let file_logger = FileStatusLogger::new(&settings.status_log.path)
        .with_context(|| format!("Failed to open status log {:?}", settings.status_log.path))?;
    let status_logger = Arc::new(AsyncStatusLogger::new(
        Arc::new(file_logger),
        settings.status_log.queue_capacity,
    ));

    let (travel_dispatcher, travel_receiver) = TravelDispatcher::channel(settings.travel.command_buffer);
    let travel_processor = TravelCommandProcessor::new(travel_receiver);
    let level_resolver = PolicyLevelResolver::from_settings(&settings.travel);

    let machine = DoorStateMachine::new(
        Arc::clone(&status_logger) as Arc<dyn StatusLogger>,
        Arc::new(travel_dispatcher) as Arc<dyn TravelCoordinator>,
        Arc::new(level_resolver) as Arc<dyn LevelResolver>,
    )?;
    let (door_sensor, event_dispatcher) = DoorSensor::new(machine, settings.sensor.event_buffer);
    info!("{} initialized: {}", door_sensor.name(), door_sensor.describe());

    Ok(AppContext {
        settings,
        door_sensor,
        event_dispatcher,
        status_logger,
        travel_processor,
    })
}

impl AppContext {
    /// Starts observation of every sensor
    pub fn run(&mut self) -> Result<watch::Receiver<MachineSnapshot>> {
        self.door_sensor.start_observation()?;
        Ok(self.door_sensor.subscribe())
    }
}

/// Stops observation and drains the status log
pub async fn shutdown(mut door_sensor: DoorSensor, status_logger: &AsyncStatusLogger) -> Result<()> {
    door_sensor.process_pending();
    door_sensor.stop_observation();
    drop(door_sensor);
    status_logger.shutdown().await?;
    info!("Shutdown complete");
    Ok(())
}
