//! # Door Sensor Errors
//! This module defines the `DoorSensorError` enum, which encapsulates all potential errors that can occur within the VHPT door sensor.
//! Ignored events are not errors: only definition problems, collaborator failures and the ambient plumbing surface here.

use thiserror::Error;
use std::io;
use tokio::sync::mpsc::error::SendError;

#[derive(Error, Debug)]
pub enum DoorSensorError {
    /// Represents errors arising from misconfigurations or invalid settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents an incomplete or inconsistent state machine definition.
    #[error("State machine definition error: {0}")]
    DefinitionError(String),

    /// Represents a level policy that cannot answer for the requested mode.
    #[error("Level resolution error: {0}")]
    ResolutionError(String),

    /// Represents a travel command that could not be delivered.
    #[error("Travel dispatch error: {0}")]
    TravelError(String),

    /// Represents a console signal that names no known event.
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during serialization or deserialization of data.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Represents errors when waiting for tasks to complete.
    #[error("Task join error: {0}")]
    TaskJoinError(String),

    /// Represents errors when sending data over a channel.
    #[error("Channel send error: {0}")]
    ChannelSendError(String),
}

impl<T> From<SendError<T>> for DoorSensorError {
    fn from(err: SendError<T>) -> Self {
        DoorSensorError::ChannelSendError(err.to_string())
    }
}

impl From<config::ConfigError> for DoorSensorError {
    fn from(err: config::ConfigError) -> Self {
        DoorSensorError::ConfigError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DoorSensorError {
    fn from(err: tokio::task::JoinError) -> Self {
        DoorSensorError::TaskJoinError(err.to_string())
    }
}

pub type DoorSensorResult<T> = Result<T, DoorSensorError>;
