//! Active health probing.
//!
//! # Responsibilities
//! - Periodically probe every backend's reachability
//! - Update registry liveness from probe results

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;
use url::Url;

use crate::config::schema::HealthCheckConfig;
use crate::load_balancer::registry::BackendRegistry;

/// Periodic background prober that keeps backend liveness current.
pub struct HealthProber {
    registry: Arc<BackendRegistry>,
    interval: Duration,
    probe_timeout: Duration,
}

impl HealthProber {
    pub fn new(registry: Arc<BackendRegistry>, config: &HealthCheckConfig) -> Self {
        Self {
            registry,
            interval: Duration::from_secs(config.interval_secs),
            probe_timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Run the probe loop until the task is dropped.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            timeout_secs = self.probe_timeout.as_secs(),
            "health prober starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            ticker.tick().await;
            tracing::debug!("starting health check sweep");
            self.sweep().await;
            tracing::debug!("health check sweep completed");
        }
    }

    /// One full sweep over the registry, in registration order.
    async fn sweep(&self) {
        for backend in self.registry.backends() {
            let alive = probe(backend.url(), self.probe_timeout).await;
            self.registry.mark_status(backend.url(), alive);
            tracing::info!(
                backend = %backend.url(),
                status = if alive { "up" } else { "down" },
                "health probe"
            );
        }
    }
}

/// TCP-connect reachability probe: succeeds if a connection can be
/// established within the timeout.
async fn probe(url: &Url, timeout: Duration) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let Some(port) = url.port_or_known_default() else {
        return false;
    };

    match time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(error)) => {
            tracing::warn!(backend = %url, error = %error, "backend unreachable");
            false
        }
        Err(_) => {
            tracing::warn!(backend = %url, "health probe timed out");
            false
        }
    }
}
