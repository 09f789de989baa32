//! Round-robin reverse-proxy load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                LOAD BALANCER                  │
//!                     │                                               │
//!   Client Request    │  ┌────────┐    ┌────────────┐    ┌─────────┐ │
//!   ──────────────────┼─▶│  http  │───▶│ dispatcher │───▶│registry │ │
//!                     │  │ server │    │(retry/esc.)│    │(round-  │ │
//!                     │  └────────┘    └─────┬──────┘    │ robin)  │ │
//!                     │                      │           └────┬────┘ │
//!                     │                      ▼                │      │
//!   Client Response   │                ┌───────────┐          │      │
//!   ◀─────────────────┼────────────────│ forwarder │◀─────────┘      │
//!                     │                └───────────┘                  │
//!                     │                                               │
//!                     │  ┌─────────────────────────────────────────┐  │
//!                     │  │ health prober (periodic TCP sweep)      │  │
//!                     │  └─────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;

use rr_balancer::config::loader::load_config;
use rr_balancer::config::validation::parse_backend_urls;
use rr_balancer::config::BalancerConfig;
use rr_balancer::dispatch::forwarder::HttpForwarder;
use rr_balancer::health::HealthProber;
use rr_balancer::load_balancer::backend::Backend;
use rr_balancer::observability;
use rr_balancer::{BackendRegistry, Dispatcher, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "rr-balancer", about = "Round-robin reverse-proxy load balancer")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load balanced backends, comma separated (overrides the config file).
    #[arg(long, value_delimiter = ',')]
    backends: Vec<String>,

    /// Port to serve on (overrides the config file).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };
    if !cli.backends.is_empty() {
        config.backends = cli.backends;
    }
    if let Some(port) = cli.port {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }

    // Malformed or missing backends are fatal; nothing starts serving.
    let urls = parse_backend_urls(&config.backends)?;

    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let mut registry = BackendRegistry::new();
    for url in urls {
        let forwarder = HttpForwarder::new(client.clone(), url.clone());
        registry.add_backend(Arc::new(Backend::new(url, Box::new(forwarder))));
    }
    let registry = Arc::new(registry);

    tracing::info!(backends = registry.len(), "backend registry initialized");

    if config.health_check.enabled {
        let prober = HealthProber::new(registry.clone(), &config.health_check);
        tokio::spawn(prober.run());
    }

    let dispatcher = Arc::new(Dispatcher::new(registry, &config.retries));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "load balancer started");

    HttpServer::new(dispatcher).run(listener).await?;

    Ok(())
}
