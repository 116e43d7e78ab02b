//! Observability subsystem.
//!
//! Structured `tracing` events from every subsystem, collected by the
//! subscriber installed in `logging.rs`. Each HTTP request is wrapped in a
//! `TraceLayer` span and carries an `x-request-id`.

pub mod logging;

pub use logging::init_logging;
