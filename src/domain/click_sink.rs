//! Analytics sink interface for click events.

use crate::domain::click_event::ClickEvent;
use async_trait::async_trait;
use std::time::Duration;

/// Delivery failures. These stay inside the click tracker and are only logged.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("analytics request failed: {0}")]
    Transport(String),

    #[error("analytics endpoint rejected the event with status {0}")]
    Rejected(u16),

    #[error("analytics delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Destination for click events.
///
/// Implementations must be thread-safe. Delivery is at-most-once: the worker
/// never retries a failed call.
///
/// # Implementations
///
/// - [`crate::infrastructure::analytics::UmamiSink`] - Umami event API over HTTP
/// - [`crate::infrastructure::analytics::NullSink`] - Discards events (tracking disabled)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickSink: Send + Sync {
    /// Delivers a single click event.
    async fn send(&self, event: ClickEvent) -> Result<(), TrackingError>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}
