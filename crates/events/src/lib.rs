//! Fieldgate event bus and logging infrastructure.
//!
//! Building blocks for the validation lifecycle event stream:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ValidationEvent`] — the canonical event envelope.
//! - [`EventLog`] — background subscriber that writes every event to the
//!   structured log.
//!
//! Publication is fire-and-forget by design: a full buffer or an absent
//! subscriber never blocks or fails the publishing request.

pub mod bus;
pub mod log;

pub use bus::{EventBus, ValidationEvent};
pub use log::EventLog;
