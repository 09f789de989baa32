//! Backend registry with round-robin selection.
//!
//! # Responsibilities
//! - Hold the ordered, fixed set of backends (insertion order = ring order)
//! - Rotate through alive backends via a private atomic cursor
//! - Look up and update liveness by backend address

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use url::Url;

use crate::load_balancer::backend::Backend;

/// Ordered collection of backends with a shared rotation cursor.
///
/// Backends are appended during startup only; once the registry is shared
/// behind an `Arc` the sequence is immutable and iteration needs no lock.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<Backend>>,
    cursor: AtomicU64,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend. Startup only: not safe concurrently with selection.
    pub fn add_backend(&mut self, backend: Arc<Backend>) {
        self.backends.push(backend);
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// All backends in registration order, for the health sweep.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    /// Set the liveness of the backend registered under `url`.
    /// Unknown addresses are silently ignored.
    pub fn mark_status(&self, url: &Url, alive: bool) {
        for backend in &self.backends {
            if backend.url().as_str() == url.as_str() {
                backend.set_alive(alive);
                break;
            }
        }
    }

    /// Liveness of the backend registered under `url`, `false` if unknown.
    pub fn is_alive(&self, url: &Url) -> bool {
        self.backends
            .iter()
            .find(|backend| backend.url().as_str() == url.as_str())
            .map(|backend| backend.is_alive())
            .unwrap_or(false)
    }

    /// Select the next alive backend in rotation.
    ///
    /// Advances the cursor atomically, then scans forward (wrapping) for at
    /// most one full ring. When the scan lands past the starting slot, the
    /// cursor is stored there so later selections start beyond the dead
    /// backends instead of re-scanning them. Returns `None` after a full
    /// wrap with no alive backend.
    pub fn select_next(&self) -> Option<Arc<Backend>> {
        let len = self.backends.len();
        if len == 0 {
            return None;
        }

        let start = (self.cursor.fetch_add(1, Ordering::Relaxed).wrapping_add(1) as usize) % len;
        for i in 0..len {
            let idx = (start + i) % len;
            if self.backends[idx].is_alive() {
                if idx != start {
                    self.cursor.store(idx as u64, Ordering::Relaxed);
                }
                return Some(self.backends[idx].clone());
            }
        }
        None
    }
}
