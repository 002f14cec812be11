//! Non-blocking hand-off of click events to the background worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_sink::ClickSink;
use crate::domain::click_worker::run_click_worker;

/// Entry point of the click tracker used by the redirect path.
///
/// [`ClickTracker::track`] never waits and never fails: the event is queued
/// with `try_send`, and if the queue is full or closed the click is dropped
/// with a warning. Delivery happens on the worker spawned by
/// [`ClickTracker::spawn`].
#[derive(Clone)]
pub struct ClickTracker {
    sender: mpsc::Sender<ClickEvent>,
}

impl ClickTracker {
    /// Wraps an existing queue. The caller owns the receiving side.
    pub fn new(sender: mpsc::Sender<ClickEvent>) -> Self {
        Self { sender }
    }

    /// Creates the queue and spawns the delivery worker on the current runtime.
    pub fn spawn(
        sink: Arc<dyn ClickSink>,
        capacity: usize,
        concurrency: usize,
        timeout: Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_click_worker(receiver, sink, concurrency, timeout));
        Self { sender }
    }

    /// Queues a click for delivery without waiting.
    pub fn track(&self, event: ClickEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(link_id = event.link_id, "Click queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(link_id = event.link_id, "Click queue closed, dropping event");
            }
        }
    }

    /// Returns true once the worker has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently available in the queue.
    pub fn available_capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Total queue size.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}
