//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives at dispatcher
//!     → registry.rs (select_next: rotate cursor, skip dead backends)
//!     → backend.rs (forward via the backend's Forwarder)
//!     → Response returned, or failure reported back to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Backend membership is fixed after startup; only liveness changes
//! - The rotation cursor is private to the registry and atomic
//! - Per-backend liveness is an atomic bool, so selection never takes a lock

pub mod backend;
pub mod registry;

pub use backend::Backend;
pub use registry::BackendRegistry;
