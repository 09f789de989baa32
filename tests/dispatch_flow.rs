//! End-to-end dispatch tests through the HTTP serving layer.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use url::Url;

use rr_balancer::config::schema::RetryConfig;
use rr_balancer::dispatch::forwarder::HttpForwarder;
use rr_balancer::load_balancer::backend::Backend;
use rr_balancer::{BackendRegistry, Dispatcher, HttpServer};

mod common;

/// Wire up a balancer over the given backend URLs and return its address
/// plus the registry for liveness assertions.
async fn start_balancer(backend_urls: &[Url]) -> (std::net::SocketAddr, Arc<BackendRegistry>) {
    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let mut registry = BackendRegistry::new();
    for url in backend_urls {
        let forwarder = HttpForwarder::new(client.clone(), url.clone());
        registry.add_backend(Arc::new(Backend::new(url.clone(), Box::new(forwarder))));
    }
    let registry = Arc::new(registry);

    let dispatcher = Arc::new(Dispatcher::new(
        registry.clone(),
        &RetryConfig {
            attempt_limit: 3,
            retry_limit: 3,
            backoff_ms: 1,
        },
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(HttpServer::new(dispatcher).run(listener));

    (addr, registry)
}

fn http_url(addr: std::net::SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn get(addr: std::net::SocketAddr, path: &str) -> (u16, String) {
    let client: Client<HttpConnector, Body> =
        Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let response = client
        .get(format!("http://{addr}{path}").parse().unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let body = axum::body::to_bytes(Body::new(response.into_body()), 64 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_response_passes_through_unchanged() {
    let backend_addr = common::start_mock_backend("Hello from backend").await;
    let (addr, _registry) = start_balancer(&[http_url(backend_addr)]).await;

    let (status, body) = get(addr, "/hello").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Hello from backend");
}

#[tokio::test]
async fn test_requests_rotate_across_backends() {
    let first = common::start_mock_backend("one").await;
    let second = common::start_mock_backend("two").await;
    let (addr, _registry) = start_balancer(&[http_url(first), http_url(second)]).await;

    let (_, a) = get(addr, "/").await;
    let (_, b) = get(addr, "/").await;
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_failed_backend_is_marked_dead_and_escaped() {
    let live_addr = common::start_mock_backend("survivor").await;
    let dead_addr = common::closed_port().await;
    let live_url = http_url(live_addr);
    let dead_url = http_url(dead_addr);

    // Cursor starts at 0, so the first request lands on the dead backend.
    let (addr, registry) = start_balancer(&[live_url.clone(), dead_url.clone()]).await;

    let (status, body) = get(addr, "/resource").await;
    assert_eq!(status, 200);
    assert_eq!(body, "survivor");

    assert!(!registry.is_alive(&dead_url));
    assert!(registry.is_alive(&live_url));
}

#[tokio::test]
async fn test_error_status_passes_through_unchanged() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let backend_addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                (500, "backend exploded".to_string())
            } else {
                (200, "recovered".to_string())
            }
        }
    })
    .await;
    let (addr, registry) = start_balancer(&[http_url(backend_addr)]).await;

    // A 500 is a genuine backend response, not a forwarding failure: it
    // reaches the client as-is, with no retry and no liveness change.
    let (status, body) = get(addr, "/flaky").await;
    assert_eq!(status, 500);
    assert_eq!(body, "backend exploded");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(registry.is_alive(&http_url(backend_addr)));

    let (status, body) = get(addr, "/flaky").await;
    assert_eq!(status, 200);
    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn test_oversized_body_is_rejected_before_dispatch() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let backend_addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, "ok".to_string())
        }
    })
    .await;
    let (addr, _registry) = start_balancer(&[http_url(backend_addr)]).await;

    let client: Client<HttpConnector, Body> =
        Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let request = Request::builder()
        .method("POST")
        .uri(format!("http://{addr}/upload"))
        .body(Body::from(vec![0u8; 2 * 1024 * 1024]))
        .unwrap();
    let response = client.request(request).await.unwrap();

    assert_eq!(response.status().as_u16(), 413);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_all_backends_down_yields_service_unavailable() {
    let first = common::closed_port().await;
    let second = common::closed_port().await;
    let (addr, registry) = start_balancer(&[http_url(first), http_url(second)]).await;

    let (status, body) = get(addr, "/").await;
    assert_eq!(status, 503);
    assert_eq!(body, "Service not available");

    assert!(!registry.is_alive(&http_url(first)));
    assert!(!registry.is_alive(&http_url(second)));
}
