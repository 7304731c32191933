//! # Status Logging
//!
//! The door sensor reports every state change as a human-readable status line. `StatusLogger` is the
//! capability injected into the state machine; `FileStatusLogger` appends those lines to a file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use parking_lot::Mutex;
use tracing::error;
use crate::errors::DoorSensorResult;

/// Records human-readable status lines
pub trait StatusLogger: Send + Sync {
    /// Appends `message`. Implementations handle their own failures and never panic for valid strings.
    fn log(&self, message: &str);

    /// Pushes buffered lines to their destination
    fn flush(&self) {}
}

/// Appends timestamped status lines to a file
pub struct FileStatusLogger {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileStatusLogger {
    /// Opens `path` for appending, creating the file and its parent directories if needed
    ///
    /// # Returns
    ///
    /// * `Ok(FileStatusLogger)` if the file could be opened
    /// * `Err(DoorSensorError::IoError)` otherwise
    pub fn new(path: impl AsRef<Path>) -> DoorSensorResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusLogger for FileStatusLogger {
    fn log(&self, message: &str) {
        let line = format!("{} {}", chrono::Local::now().to_rfc3339(), message);
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{}", line) {
            error!("Failed to write status line to {:?}: {}", self.path, e);
        }
    }

    fn flush(&self) {
        if let Err(e) = self.writer.lock().flush() {
            error!("Failed to flush status log {:?}: {}", self.path, e);
        }
    }
}

impl Drop for FileStatusLogger {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}
