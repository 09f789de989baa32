//! Observability subsystem.
//!
//! Structured logging via `tracing`; every subsystem emits events and the
//! subscriber is initialized once at startup.

pub mod logging;
