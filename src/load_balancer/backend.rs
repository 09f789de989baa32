//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track liveness (written by both the health prober and the dispatcher)
//! - Own the Forwarder that carries traffic to this server

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::body::Body;
use axum::http::Response;
use url::Url;

use crate::dispatch::forwarder::{ForwardError, Forwarder, ProxyRequest};

/// A single upstream server.
///
/// The address and forwarder are fixed at registration; only the liveness
/// flag changes afterwards. Liveness is written concurrently by the health
/// prober and the dispatcher's failure path, so it is atomic.
pub struct Backend {
    url: Url,
    alive: AtomicBool,
    forwarder: Box<dyn Forwarder>,
}

impl Backend {
    /// Create a backend, initially alive.
    pub fn new(url: Url, forwarder: Box<dyn Forwarder>) -> Self {
        Self {
            url,
            alive: AtomicBool::new(true),
            forwarder,
        }
    }

    /// The backend's base URL, as registered.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Set liveness. Last writer wins; no ordering between the prober and
    /// the dispatcher is required.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Relaxed);
    }

    /// Forward a request through this backend's Forwarder.
    pub async fn forward(&self, request: &ProxyRequest) -> Result<Response<Body>, ForwardError> {
        self.forwarder.forward(request).await
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("url", &self.url.as_str())
            .field("alive", &self.is_alive())
            .finish()
    }
}
