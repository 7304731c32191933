//! # Hierarchical State Machine
//!
//! A small table-driven state machine engine with composite states and history.
//! `definition` holds the fluent builder, `graph` the validated static structure
//! and `machine` the runtime that dispatches events.

pub mod action;
pub mod definition;
pub mod graph;
pub mod machine;

pub use action::{ActionExecutor, SensorAction};
pub use definition::StateMachineDefinition;
pub use graph::{HistoryType, StateGraph};
pub use machine::{FireOutcome, StateMachine};
