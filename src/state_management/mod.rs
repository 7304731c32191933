pub mod door_state_machine;
pub mod event_dispatcher;
pub mod sensor_lifecycle;

pub use door_state_machine::DoorStateMachine;
pub use event_dispatcher::EventDispatcher;
pub use sensor_lifecycle::SensorLifecycle;
