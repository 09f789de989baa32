//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse backend addresses and reject malformed entries
//! - Runs before config is accepted into the system
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - A config with no backends cannot start serving

use thiserror::Error;
use url::Url;

use crate::config::schema::BalancerConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no backends configured")]
    NoBackends,

    #[error("malformed backend address `{address}`: {source}")]
    MalformedBackend {
        address: String,
        source: url::ParseError,
    },

    #[error("backend address `{0}` has no host")]
    MissingHost(String),

    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),
}

/// Parse a single backend base address.
///
/// Accepts scheme + host[:port]; anything else is a startup-fatal error.
pub fn parse_backend_url(address: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(address).map_err(|source| ValidationError::MalformedBackend {
        address: address.to_string(),
        source,
    })?;
    if url.host_str().is_none() || url.port_or_known_default().is_none() {
        return Err(ValidationError::MissingHost(address.to_string()));
    }
    Ok(url)
}

/// Parse the full backend list, failing on the first malformed entry.
/// An empty list is itself an error: the balancer must not start serving
/// with nothing to serve.
pub fn parse_backend_urls(addresses: &[String]) -> Result<Vec<Url>, ValidationError> {
    if addresses.is_empty() {
        return Err(ValidationError::NoBackends);
    }
    addresses
        .iter()
        .map(|address| parse_backend_url(address))
        .collect()
}

/// Validate a loaded configuration, collecting every problem.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }
    for address in &config.backends {
        if let Err(error) = parse_backend_url(address) {
            errors.push(error);
        }
    }
    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
