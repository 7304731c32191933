pub mod console;

pub use console::{ConsoleSignalSource, SignalCommand};
