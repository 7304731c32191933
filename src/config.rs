//! # Configuration Management

//! This module handles the configuration loading for the VHPT door sensor.
//! It leverages the `config` crate to read settings from the following sources:

//! * YAML configuration files (default.yaml plus an optional file named after the run mode)
//! * Environment variables

//! The core of this module is the `Settings` struct, which encapsulates all the configuration settings required by the application.

use serde::{Deserialize, Serialize};
use config::{Config, Environment, File};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use crate::errors::DoorSensorError;

/// Represents the complete set of configuration settings for the door sensor.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Settings for diagnostic logging
    pub logging: LoggingSettings,
    /// Settings for the status log written by the door sensor
    pub status_log: StatusLogSettings,
    /// The travel policy and travel command plumbing
    pub travel: TravelPolicySettings,
    /// Settings of the door sensor itself
    pub sensor: SensorSettings,
}

/// Holds the configuration settings for application logging
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingSettings {
    /// The default logging filter (e.g., "info", "debug"), overridden by `RUST_LOG`
    pub level: String,
    /// The directory path where log files will be stored (optional)
    pub path: Option<PathBuf>,
}

/// Holds the configuration of the status log
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StatusLogSettings {
    /// The file status lines are appended to
    pub path: PathBuf,
    /// The number of status lines that may wait for the background writer
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Holds the policy deciding where the passenger travels when the door closes
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TravelPolicySettings {
    /// The destination level in normal mode
    pub normal_level: Option<i32>,
    /// The destination level once a black hole was detected
    pub panic_level: Option<i32>,
    /// Whether a detected black hole redirects travel to the panic level
    #[serde(default = "default_true")]
    pub panic_mode_enabled: bool,
    /// The number of travel commands that may wait for the vehicle
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

/// Holds the configuration of the door sensor
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SensorSettings {
    /// The number of door and black hole signals that may wait for the state machine
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_command_buffer() -> usize {
    16
}

fn default_event_buffer() -> usize {
    100
}

fn default_true() -> bool {
    true
}

/// # Settings Initialization
impl Settings {
    /// Loads the application settings.
    ///
    /// The `CONFIG_DIR` environment variable selects the directory holding the YAML files (defaults to "src/config"),
    /// `RUN_MODE` selects the environment-specific file (defaults to "development").
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)`: If the settings were loaded and constructed successfully
    /// * `Err(DoorSensorError)`: If there was an error during the loading or construction process
    pub fn new() -> Result<Self, DoorSensorError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "src/config".into());
        Self::load_from(&config_dir, &run_mode)
    }

    /// Loads settings from `config_dir`, in order of precedence:
    ///
    /// 1. `default.yaml`
    /// 2. `<run_mode>.yaml` (optional)
    /// 3. Environment variables prefixed with `APP` (e.g., `APP__TRAVEL__PANIC_LEVEL`)
    pub fn load_from(config_dir: &str, run_mode: &str) -> Result<Self, DoorSensorError> {
        debug!("Run Mode: {:?}, Config Dir: {:?}", run_mode, config_dir);

        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/default", config_dir)))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut s: Self = s.try_deserialize::<Settings>()
            .map_err(DoorSensorError::from)?;

        let current_dir = env::current_dir()?;
        if let Some(ref mut path) = s.logging.path {
            *path = current_dir.join(path.clone());
        }
        s.status_log.path = current_dir.join(&s.status_log.path);

        debug!("{:#?}", s);
        Ok(s)
    }
}
