//! Observability for OpenFlight
//!
//! Structured JSON logging. Logs are synchronous and one line per event;
//! observability failure must never take the service down.

mod logger;

pub use logger::{Logger, Severity};
