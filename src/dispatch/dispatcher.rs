//! Retry/attempt escalation state machine.
//!
//! # Responsibilities
//! - Select a backend for each attempt via the registry
//! - Retry the same backend with a fixed backoff on forwarding failure
//! - Mark a backend dead once its retry budget is spent, then escalate
//! - Enforce the overall attempt budget

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Response;
use tokio::time;

use crate::config::schema::RetryConfig;
use crate::dispatch::forwarder::ProxyRequest;
use crate::load_balancer::registry::BackendRegistry;

/// Per-request dispatch counters, passed explicitly through every retry
/// and re-dispatch. Never shared between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchState {
    /// Backend-selection cycles used so far, starting at 1.
    pub attempts: u32,
    /// Forwarding tries repeated against the current backend.
    pub retries: u32,
}

impl DispatchState {
    pub fn new() -> Self {
        Self {
            attempts: 1,
            retries: 0,
        }
    }
}

impl Default for DispatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal outcome of a dispatch traversal.
pub enum DispatchOutcome {
    /// The backend response, passed through unchanged.
    Forwarded(Response<Body>),
    /// Attempt budget or backend availability exhausted.
    Unavailable,
}

/// Drives a request through backend selection, retries, and escalation.
pub struct Dispatcher {
    registry: Arc<BackendRegistry>,
    attempt_limit: u32,
    retry_limit: u32,
    backoff: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<BackendRegistry>, config: &RetryConfig) -> Self {
        Self {
            registry,
            attempt_limit: config.attempt_limit,
            retry_limit: config.retry_limit,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    /// Run the escalation machine for one request.
    ///
    /// The backoff wait suspends only this request's task; concurrent
    /// requests run on independent tasks.
    pub async fn dispatch(
        &self,
        request: &ProxyRequest,
        mut state: DispatchState,
    ) -> DispatchOutcome {
        loop {
            if state.attempts > self.attempt_limit {
                tracing::warn!(
                    path = %request.parts.uri.path(),
                    attempts = state.attempts,
                    "max attempts reached, terminating"
                );
                return DispatchOutcome::Unavailable;
            }

            let Some(backend) = self.registry.select_next() else {
                tracing::warn!(
                    path = %request.parts.uri.path(),
                    "no alive backend available"
                );
                return DispatchOutcome::Unavailable;
            };

            loop {
                match backend.forward(request).await {
                    Ok(response) => return DispatchOutcome::Forwarded(response),
                    Err(error) => {
                        tracing::warn!(
                            backend = %backend.url(),
                            error = %error,
                            retries = state.retries,
                            "forwarding failed"
                        );

                        if state.retries < self.retry_limit {
                            time::sleep(self.backoff).await;
                            state.retries += 1;
                            continue;
                        }

                        // Retry budget spent: take the backend out of
                        // rotation and escalate to a new one.
                        self.registry.mark_status(backend.url(), false);
                        state.attempts += 1;
                        // Each backend gets the full retry budget; the
                        // counter does not carry across reassignment.
                        state.retries = 0;
                        break;
                    }
                }
            }
        }
    }
}
