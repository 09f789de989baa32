//! HTTP serving layer.
//!
//! Binds every inbound path to the dispatcher and maps its terminal
//! outcomes to responses.

pub mod server;

pub use server::HttpServer;
