//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Counters
//! - Typed events
//! - Best-effort diagnostic hook for request/query dumps
//!
//! Observability is read-only: nothing here can fail a request.
//!
//! # Usage
//!
//! ```ignore
//! use datatables::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ColumnDropped, &[("column", "password")]);
//! ```

mod diagnostics;
mod events;
mod logger;
mod metrics;

pub use diagnostics::DiagnosticHook;
pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event == Event::QueryFailed {
        Severity::Error
    } else if event.is_client_anomaly() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log an event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
