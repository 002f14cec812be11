//! No-op click sink for disabled tracking.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_sink::{ClickSink, TrackingError};

/// A sink that accepts and forgets every event.
///
/// Selected when `TRACKING_ENABLED=false` or Umami is not configured.
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        debug!("Using NullSink (click tracking disabled)");
        Self
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClickSink for NullSink {
    async fn send(&self, _event: ClickEvent) -> Result<(), TrackingError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
