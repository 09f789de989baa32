//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ordered list of backend base URLs (scheme + host[:port]).
    pub backends: Vec<String>,

    /// Health probe settings.
    pub health_check: HealthCheckConfig,

    /// Retry/attempt escalation settings.
    pub retries: RetryConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Whether the background prober runs at all.
    pub enabled: bool,

    /// Seconds between sweeps.
    pub interval_secs: u64,

    /// Per-probe connect timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 120,
            timeout_secs: 2,
        }
    }
}

/// Retry/attempt escalation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Backend-selection cycles allowed per request.
    pub attempt_limit: u32,

    /// Forwarding retries against the same backend before it is marked
    /// dead.
    pub retry_limit: u32,

    /// Fixed pause between retries, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempt_limit: 3,
            retry_limit: 3,
            backoff_ms: 10,
        }
    }
}
