//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for
//! [`ValidationEvent`]s. It is designed to be shared via `Arc<EventBus>`
//! across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event names published by the validation service.
pub mod event_types {
    pub const VALIDATION_STARTED: &str = "validation.started";
    pub const VALIDATION_COMPLETED: &str = "validation.completed";
    pub const VALIDATION_FAILED: &str = "validation.failed";
}

// ---------------------------------------------------------------------------
// ValidationEvent
// ---------------------------------------------------------------------------

/// A validation lifecycle event.
///
/// Constructed via [`ValidationEvent::new`] and enriched with the builder
/// methods [`with_doc`](ValidationEvent::with_doc),
/// [`with_schema`](ValidationEvent::with_schema), and
/// [`with_payload`](ValidationEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationEvent {
    /// Dot-separated event name, e.g. `"validation.completed"`.
    pub event_type: String,

    /// Document the event concerns, when applicable.
    pub doc_id: Option<String>,

    /// Schema involved, when applicable.
    pub schema_id: Option<String>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ValidationEvent {
    /// Create a new event with only the required `event_type`.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            doc_id: None,
            schema_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the document the event concerns.
    pub fn with_doc(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Attach the schema involved.
    pub fn with_schema(mut self, schema_id: impl Into<String>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ValidationEvent`].
///
/// # Usage
///
/// ```rust
/// use fieldgate_events::bus::{event_types, EventBus, ValidationEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ValidationEvent::new(event_types::VALIDATION_STARTED));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ValidationEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// publication never blocks and never fails the caller.
    pub fn publish(&self, event: ValidationEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ValidationEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
