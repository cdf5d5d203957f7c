//! Telemetry and structured logging for voxrelay.
//!
//! Console + rolling NDJSON file output, secret redaction, and structured bot events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{BotEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
