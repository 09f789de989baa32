//! Round-robin reverse-proxy load balancer library.

pub mod config;
pub mod dispatch;
pub mod health;
pub mod http;
pub mod load_balancer;
pub mod observability;

pub use config::schema::BalancerConfig;
pub use dispatch::dispatcher::{DispatchOutcome, DispatchState, Dispatcher};
pub use http::HttpServer;
pub use load_balancer::registry::BackendRegistry;
