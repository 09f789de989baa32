//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all handler
//! - Wire up middleware (tracing, request ID)
//! - Buffer the inbound body so the dispatcher can replay it
//! - Map dispatch outcomes to client responses

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::dispatch::dispatcher::{DispatchOutcome, DispatchState, Dispatcher};
use crate::dispatch::forwarder::ProxyRequest;

/// Requests with bodies beyond this are rejected rather than buffered.
const MAX_BUFFERED_BODY: usize = 1024 * 1024;

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the router with all middleware layers.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState { dispatcher };

        let router = Router::new()
            .route("/{*path}", any(balance_handler))
            .route("/", any(balance_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single handler bound to all inbound paths.
///
/// Buffers the body, then runs the dispatcher with a fresh per-request
/// state. Clients see either the backend response unchanged or a single
/// synthetic 503.
async fn balance_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();

    // A declared oversize body is rejected before reading it. Remaining
    // buffering failures (client hangup mid-body, undeclared oversize)
    // are indistinguishable here and reported as a bad request.
    let declared_len = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > MAX_BUFFERED_BODY) {
        return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
    }
    let body = match axum::body::to_bytes(body, MAX_BUFFERED_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response()
        }
    };

    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        "dispatching request"
    );

    let request = ProxyRequest { parts, body };
    match state.dispatcher.dispatch(&request, DispatchState::new()).await {
        DispatchOutcome::Forwarded(response) => response.into_response(),
        DispatchOutcome::Unavailable => {
            (StatusCode::SERVICE_UNAVAILABLE, "Service not available").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
