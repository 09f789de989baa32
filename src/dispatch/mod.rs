//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Buffered request + fresh DispatchState
//!     → dispatcher.rs (attempt loop: select backend, enforce budgets)
//!     → forwarder.rs (rebuild upstream request, send via hyper client)
//!     → Success: response passed through unchanged
//!     → Failure: retry same backend with backoff, then mark dead and
//!       escalate to a new backend
//! ```
//!
//! # Design Decisions
//! - Retry/attempt counters travel explicitly in DispatchState, never in
//!   ambient request context
//! - The Forwarder is a trait object so tests can script failures
//! - The request body is buffered once so every retry replays it

pub mod dispatcher;
pub mod forwarder;

pub use dispatcher::{DispatchOutcome, DispatchState, Dispatcher};
pub use forwarder::{ForwardError, Forwarder, HttpForwarder, ProxyRequest};
