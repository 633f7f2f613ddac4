//! Event log sink.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and emits one structured log line per received
//! [`ValidationEvent`]. It runs as a long-lived background task and shuts
//! down gracefully when the bus sender is dropped.

use tokio::sync::broadcast;

use crate::bus::ValidationEvent;

/// Background service that logs every published event.
pub struct EventLog;

impl EventLog {
    /// Run the logging loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and logs
    /// every event it receives. The loop exits when the channel is closed
    /// (i.e. the [`EventBus`](crate::bus::EventBus) is dropped). A lagged
    /// receiver skips the missed events with a warning; the publishing side
    /// is never affected.
    pub async fn run(mut receiver: broadcast::Receiver<ValidationEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_type = %event.event_type,
                        doc_id = event.doc_id.as_deref(),
                        schema_id = event.schema_id.as_deref(),
                        payload = %event.payload,
                        "Validation event"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log lagged, some events were not recorded");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event log shutting down");
                    break;
                }
            }
        }
    }
}
