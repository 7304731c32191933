pub mod status_logger;
pub mod async_status_logger;
pub mod travel;
pub mod level_resolver;

pub use status_logger::{FileStatusLogger, StatusLogger};
pub use async_status_logger::AsyncStatusLogger;
pub use travel::{TravelCommand, TravelCommandProcessor, TravelCoordinator, TravelDispatcher};
pub use level_resolver::{LevelResolver, PolicyLevelResolver};
