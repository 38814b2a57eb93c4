// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # skope-client
//!
//! Reader for the Netskope tenant clients API.
//!
//! ## Features
//!
//! - **Offset Pagination**: Walks `limit`/`skip` pages until a short page
//! - **Strict Decoding**: Endpoint records with unknown attributes are rejected,
//!   naming the offending key and the parent field
//! - **Partial Results**: Records gathered before a failure are returned with the error
//! - **Layered Config**: YAML file, environment and command line flags
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skope_client::{ClientConfig, SkopeClient};
//!
//! #[tokio::main]
//! async fn main() -> skope_client::Result<()> {
//!     let config = ClientConfig {
//!         token: Some("...".into()),
//!         tenant_name: Some("acme".into()),
//!         ..Default::default()
//!     };
//!     let client = SkopeClient::from_config(&config)?;
//!
//!     let result = client.get_client_endpoints(Some(500)).await;
//!     for endpoint in &result.records {
//!         println!("{}", endpoint.to_json_string()?);
//!     }
//!     if let Some(e) = result.error {
//!         eprintln!("partial result: {e}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 SkopeClient (PageFetcher)                │
//! │        GET /api/v1/clients?token=..&limit=..&skip=..      │
//! └──────────────────────────────────────────────────────────┘
//!                 │                          ▲
//!            raw page bytes            limit / offset
//!                 ▼                          │
//! ┌────────────────────────────┬─────────────┴──────────────┐
//! │   Schema (strict decode)   │   Pagination (offset loop) │
//! ├────────────────────────────┼────────────────────────────┤
//! │ PageResponse envelope      │ short page ends the run    │
//! │ EndpointRecord             │ first error stops the run  │
//! │ UserRecord / HostRecord    │ partial records kept       │
//! │ EventRecord                │ optional page cap          │
//! └────────────────────────────┴────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport
pub mod http;

/// Offset pagination
pub mod pagination;

/// Entities and the strict decoder
pub mod schema;

/// Tenant API client
pub mod client;

/// Layered configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use client::SkopeClient;
pub use config::ClientConfig;
pub use pagination::{OffsetPaginator, PageFetcher, PaginatedRecords, PaginationConfig};
pub use schema::{EndpointRecord, EventRecord, HostRecord, PageResponse, UserRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
