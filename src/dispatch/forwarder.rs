//! Forwarding seam between the dispatcher and the upstream transport.
//!
//! # Responsibilities
//! - Define the Forwarder capability each backend owns
//! - Rebuild a replayable upstream request from buffered parts
//! - Carry traffic over the shared hyper client

use std::str::FromStr;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::uri::{Authority, Scheme};
use axum::http::{self, Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use thiserror::Error;
use url::Url;

/// An inbound request buffered for dispatch.
///
/// The body is held as `Bytes` so the same request can be forwarded again
/// on retry or after reassignment to another backend.
pub struct ProxyRequest {
    pub parts: http::request::Parts,
    pub body: Bytes,
}

/// Error reported by a Forwarder for a single forwarding try.
///
/// Consumed entirely by the dispatcher's retry policy; never surfaced to
/// the client directly.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("invalid upstream request: {0}")]
    InvalidRequest(#[from] http::Error),
}

/// Capability that transmits a request to one backend.
///
/// Implementations report failures through the returned `Result`; the
/// dispatcher owns all recovery.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: &ProxyRequest) -> Result<Response<Body>, ForwardError>;
}

/// Forwarder backed by the shared hyper legacy client.
pub struct HttpForwarder {
    client: Client<HttpConnector, Body>,
    target: Url,
}

impl HttpForwarder {
    pub fn new(client: Client<HttpConnector, Body>, target: Url) -> Self {
        Self { client, target }
    }

    /// Rewrite the inbound URI to point at the target backend, keeping the
    /// original path and query.
    fn upstream_uri(&self, request: &ProxyRequest) -> Result<Uri, http::Error> {
        let mut parts = request.parts.uri.clone().into_parts();
        parts.scheme = Some(Scheme::HTTP);
        let authority = match (self.target.host_str(), self.target.port_or_known_default()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            _ => self.target.authority().to_string(),
        };
        parts.authority = Some(Authority::from_str(&authority).map_err(http::Error::from)?);
        Uri::from_parts(parts).map_err(http::Error::from)
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, request: &ProxyRequest) -> Result<Response<Body>, ForwardError> {
        let uri = self.upstream_uri(request)?;

        let mut builder = Request::builder()
            .method(request.parts.method.clone())
            .uri(uri)
            .version(request.parts.version);
        if let Some(headers) = builder.headers_mut() {
            for (name, value) in request.parts.headers.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }
        let upstream = builder.body(Body::from(request.body.clone()))?;

        let response: Response<hyper::body::Incoming> = self.client.request(upstream).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
