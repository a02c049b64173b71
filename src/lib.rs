//! Percipio API Client
//!
//! Client for the Percipio learning-content REST API with:
//! - Configuration validated once, at construction
//! - Resource templates with `{placeholder}` substitution (`orgId` is always
//!   the configured organization)
//! - Per-request timing and correlation IDs on the default transport
//! - Typed operation groups for Common Services, Content Discovery,
//!   Reporting and User Management
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use percipio_client::{RequestExecutor, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = percipio_client::create_client_from_env()?;
//!
//!     let response = client
//!         .get(RequestOptions::for_resource("/common/v1/organizations/{orgId}/collections"))
//!         .await?;
//!
//!     if let Some(timings) = response.timings {
//!         println!("{} in {}ms", response.status, timings.duration_ms);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `rustls` - TLS via rustls (default)
//! - `native-tls` - TLS via the platform library

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Core modules
pub mod client;
pub mod config;
pub mod errors;
pub mod transport;

// Services
pub mod services;

// Observability
pub mod observability;

// Testing utilities
pub mod fixtures;
pub mod mocks;

// Tests
#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use client::{PercipioClient, RequestExecutor, RequestOptions};
pub use config::{ClientConfig, ClientConfigBuilder, TransportSettings};
pub use errors::{
    is_client_error, ClientError, ClientErrorKind, ClientErrorMarker, PercipioError,
    PercipioResult, TransportError,
};
pub use transport::{HttpTransport, ResponseEnvelope, Timings, TransportOptions};

/// Create a Percipio client with the given configuration
pub fn create_client(config: ClientConfig) -> Result<PercipioClient, ClientError> {
    PercipioClient::new(config)
}

/// Create a Percipio client from environment variables
///
/// Reads:
/// - `PERCIPIO_BASE_URL` - API base URL (https)
/// - `PERCIPIO_ORG_ID` - Organization UUID
/// - `PERCIPIO_BEARER_TOKEN` - Service account bearer token (JWT)
/// - `PERCIPIO_TIMEOUT` - Request timeout in seconds (optional)
pub fn create_client_from_env() -> Result<PercipioClient, ClientError> {
    create_client(ClientConfig::from_env())
}
