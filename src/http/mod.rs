//! HTTP client module
//!
//! Provides the transport used to reach the tenant API.
//!
//! # Features
//!
//! - **Timeouts**: Request and connect deadlines
//! - **TLS**: Certificate validation is opt-in, matching the tenant tooling default
//! - **Status Handling**: 200/204 return the body, any other status is an error
//!   carrying the status code and body text

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
