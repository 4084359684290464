//! Bounded event channel between the batch task and its observer.

use tokio::sync::mpsc;

use crate::config::PipelineConfig;

/// Create a bounded channel pair with the configured buffer size.
///
/// When the buffer is full the runner waits for the observer to catch up,
/// so a slow consumer cannot make events pile up without bound.
pub fn bounded_channel<T>(config: &PipelineConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.event_buffer.max(1))
}

/// Sending half that tolerates a departed receiver.
///
/// The batch keeps running after its observer goes away; the first failed
/// send is logged and later events are dropped silently.
pub struct EventSink<T> {
    sender: mpsc::Sender<T>,
    closed: bool,
}

impl<T> EventSink<T> {
    pub fn new(sender: mpsc::Sender<T>) -> Self {
        Self {
            sender,
            closed: false,
        }
    }

    /// Deliver an event, waiting for buffer space.
    pub async fn emit(&mut self, event: T) {
        if self.closed {
            return;
        }
        if self.sender.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped, continuing without observer");
            self.closed = true;
        }
    }
}
