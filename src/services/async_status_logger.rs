use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use crate::errors::DoorSensorResult;
use crate::services::status_logger::StatusLogger;

/// Forwards status lines to another `StatusLogger` from a background worker.
///
/// `log` only enqueues into a bounded channel and never waits; when the queue is full the line is
/// dropped and counted. The decorated logger runs on a blocking worker thread, so slow disks never
/// stall the state machine.
pub struct AsyncStatusLogger {
    sender: Mutex<Option<mpsc::Sender<String>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    decorated: Arc<dyn StatusLogger>,
    dropped: AtomicU64,
}

impl AsyncStatusLogger {
    /// Creates the decorator and spawns its worker. Must be called from within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `decorated` - The logger receiving the lines
    /// * `capacity` - The number of lines that can wait in the queue
    pub fn new(decorated: Arc<dyn StatusLogger>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<String>(capacity.max(1));
        let consumer = Arc::clone(&decorated);
        let worker = tokio::task::spawn_blocking(move || {
            while let Some(message) = receiver.blocking_recv() {
                consumer.log(&message);
            }
        });

        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            decorated,
            dropped: AtomicU64::new(0),
        }
    }

    /// The number of lines that were discarded because the queue was full or already closed
    pub fn dropped_messages(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }

    /// Completes the queue, waits until every queued line was delivered and flushes the decorated logger.
    ///
    /// Lines logged afterwards are dropped. Calling `shutdown` twice is harmless.
    pub async fn shutdown(&self) -> DoorSensorResult<()> {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker.await?;
            self.decorated.flush();
            info!("Status logger drained ({} lines dropped)", self.dropped_messages());
        }
        Ok(())
    }

    fn record_drop(&self, reason: &str, message: &str) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
        warn!("Status line dropped ({}): {}", reason, message);
    }
}

impl StatusLogger for AsyncStatusLogger {
    fn log(&self, message: &str) {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(sender) => match sender.try_send(message.to_string()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => self.record_drop("queue full", message),
                Err(TrySendError::Closed(_)) => self.record_drop("worker stopped", message),
            },
            None => self.record_drop("logger shut down", message),
        }
    }

    fn flush(&self) {
        self.decorated.flush();
    }
}
