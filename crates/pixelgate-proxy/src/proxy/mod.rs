//! Streaming proxy pipeline.
//!
//! # Module Structure
//!
//! - `server` - ProxyServer struct and main run loop
//! - `handler` - route dispatch and per-route handlers
//! - `target` - target URL resolution and domain allowlist validation
//! - `forwarding` - upstream fetch, redirect following, streaming relay
//! - `client` - shared HTTP client creation and configuration
//! - `response_ext` - response body conversion helpers

mod client;
mod forwarding;
mod handler;
mod response_ext;
mod server;
mod target;

#[cfg(test)]
mod tests;

pub use client::{create_http_client, HttpClient};
pub use forwarding::{error_response, fetch_and_stream, resolve_location};
pub use server::ProxyServer;
pub use target::{parse_query, resolve_target, ProxyTarget};
