//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (prober.rs)
//!     → Sequential sweep over the registry, in registration order
//!     → TCP-connect probe per backend, bounded by a timeout
//!     → mark_status(address, reachable)
//! ```
//!
//! # Design Decisions
//! - The sweep is sequential, so a cycle can take N x timeout when every
//!   backend is unreachable
//! - Probe failures only flip liveness; they never abort the sweep
//! - Liveness is also written by the dispatcher on forwarding failure;
//!   last writer wins

pub mod prober;

pub use prober::HealthProber;
