//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) and/or CLI flags
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, backend URL parsing)
//!     → BalancerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - A malformed backend address is fatal before serving starts

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::BalancerConfig;
pub use schema::HealthCheckConfig;
pub use schema::ListenerConfig;
pub use schema::RetryConfig;
