//! # VHPT Door Sensor
//!
//! Tracks a vehicle door's open/closed status in normal and panic mode with a hierarchical state
//! machine and dispatches travel to a destination level whenever the door closes.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod init;
pub mod models;
pub mod sensors;
pub mod services;
pub mod state_machine;
pub mod state_management;
pub mod utils;
