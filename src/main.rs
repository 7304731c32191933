use std::io::BufReader;
use std::sync::Arc;
use anyhow::Result;
use tokio::signal::ctrl_c;
use tokio::sync::oneshot;
use tracing::{error, info};
use vhpt_door_sensor::config::Settings;
use vhpt_door_sensor::controllers::ConsoleSignalSource;
use vhpt_door_sensor::init::{self, AppContext};
use vhpt_door_sensor::utils::logging;

/// The main entry point of the VHPT door sensor
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

/// The core logic of the door sensor application
///
/// 1. Loads application settings from configuration files
/// 2. Initializes the logging system
/// 3. Wires the door sensor, its state machine and the collaborators
/// 4. Starts observation and spawns the sensor loop and the travel command processor
/// 5. Reads door and black hole signals from the console until input ends or ctrl-c is pressed
/// 6. Stops observation and drains the status log
async fn run() -> Result<()> {
    let settings = Arc::new(Settings::new()?);
    let _guard = logging::init_logger(&settings.logging.level, settings.logging.path.clone())?;

    let mut context = init::initialize(Arc::clone(&settings))?;
    let snapshots = context.run()?;
    let AppContext { mut door_sensor, event_dispatcher, status_logger, mut travel_processor, .. } = context;

    let lifecycle = door_sensor.lifecycle();
    let sensor_task = tokio::spawn(async move {
        if let Err(e) = door_sensor.run().await {
            error!("Door sensor error: {:?}", e);
        }
        door_sensor
    });
    let travel_task = tokio::spawn(async move { travel_processor.run().await });

    let (console_done, console_finished) = oneshot::channel();
    let console = ConsoleSignalSource::new(BufReader::new(std::io::stdin()), event_dispatcher)
        .with_snapshots(snapshots);
    std::thread::spawn(move || {
        if let Err(e) = console.run() {
            error!("Console input error: {}", e);
        }
        let _ = console_done.send(());
    });

    tokio::select! {
        _ = console_finished => info!("Console input finished. Shutting down..."),
        _ = ctrl_c() => info!("Received shutdown signal. Shutting down gracefully..."),
    }

    lifecycle.trigger_shutdown();
    let door_sensor = sensor_task.await?;
    init::shutdown(door_sensor, &status_logger).await?;

    match tokio::time::timeout(std::time::Duration::from_secs(5), travel_task).await {
        Ok(result) => info!("Travel processor finished after {} commands", result??),
        Err(_) => error!("Travel processor did not finish in time"),
    }
    Ok(())
}
