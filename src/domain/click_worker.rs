//! Background worker delivering click events to an analytics sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_sink::{ClickSink, TrackingError};

/// Drains the click queue until every sender is dropped.
///
/// Each event is delivered on its own task so a slow sink never stalls the
/// queue; at most `concurrency` deliveries are in flight. Every delivery is
/// bounded by `timeout`.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    sink: Arc<dyn ClickSink>,
    concurrency: usize,
    timeout: Duration,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let sink = sink.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let _ = deliver(sink.as_ref(), event, timeout).await;
        });
    }

    debug!("Click queue closed, worker exiting");
}

/// Delivers one event, logging and swallowing any failure.
pub async fn deliver(
    sink: &dyn ClickSink,
    event: ClickEvent,
    timeout: Duration,
) -> Result<(), TrackingError> {
    let link_id = event.link_id;

    let result = match tokio::time::timeout(timeout, sink.send(event)).await {
        Ok(result) => result,
        Err(_) => Err(TrackingError::Timeout(timeout)),
    };

    match &result {
        Ok(()) => debug!(link_id, sink = sink.name(), "Click delivered"),
        Err(e) => warn!(link_id, sink = sink.name(), error = %e, "Click dropped"),
    }

    result
}
