//! HTTP client functionality for chainbench
//!
//! This crate provides the HTTP client used by the metric fetchers, with an
//! offline mock mode and integration with the chainbench configuration system.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpRequest, HttpResponse};
