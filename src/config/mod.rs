//! Configuration for the Percipio client.
//!
//! Supports configuration via:
//! - Builder pattern
//! - Environment variables
//!
//! Nothing is validated here. [`crate::PercipioClient::new`] checks the
//! configuration once, in a fixed order, and refuses to build a client from
//! an invalid one.

pub mod validation;

use crate::observability::redact_token;
use crate::transport::HttpTransport;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Environment variable holding the API base URL
pub const ENV_BASE_URL: &str = "PERCIPIO_BASE_URL";
/// Environment variable holding the organization UUID
pub const ENV_ORG_ID: &str = "PERCIPIO_ORG_ID";
/// Environment variable holding the bearer token
pub const ENV_BEARER_TOKEN: &str = "PERCIPIO_BEARER_TOKEN";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT: &str = "PERCIPIO_TIMEOUT";

/// Settings for the default transport built by the client.
///
/// Ignored when a transport is supplied in [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Overall request timeout; none by default
    pub timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// TCP keep-alive interval
    pub tcp_keepalive: Option<Duration>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            tcp_keepalive: Some(Duration::from_secs(60)),
        }
    }
}

/// Configuration for the Percipio client
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Base URL of the Percipio API, e.g. `https://api.percipio.com`
    pub base_url: Option<String>,
    /// Organization UUID
    pub org_id: Option<String>,
    /// Bearer token (a JWT)
    pub bearer_token: Option<SecretString>,
    /// Caller-supplied transport; the client builds its own when absent
    pub transport: Option<Arc<dyn HttpTransport>>,
    /// Placeholders resolved in every resource template
    pub resource_placeholders: HashMap<String, String>,
    /// Settings for the default transport
    pub transport_settings: TransportSettings,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("org_id", &self.org_id)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|t| redact_token(t.expose_secret())),
            )
            .field("transport", &self.transport.as_ref().map(|_| "custom"))
            .field("resource_placeholders", &self.resource_placeholders)
            .field("transport_settings", &self.transport_settings)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Create configuration from environment variables.
    ///
    /// Unset variables stay absent so that client construction reports them.
    pub fn from_env() -> Self {
        let mut builder = ClientConfigBuilder::new();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }

        if let Ok(org_id) = std::env::var(ENV_ORG_ID) {
            builder = builder.org_id(org_id);
        }

        if let Ok(token) = std::env::var(ENV_BEARER_TOKEN) {
            builder = builder.bearer_token(token);
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(secs) => builder = builder.timeout(Duration::from_secs(secs)),
                Err(_) => warn!(value = %timeout, "Ignoring unparseable {}", ENV_TIMEOUT),
            }
        }

        builder.build()
    }

    /// Expose the bearer token for building the authorization header
    pub(crate) fn expose_token(&self) -> Option<&str> {
        self.bearer_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the organization UUID
    pub fn org_id(mut self, org_id: impl Into<String>) -> Self {
        self.config.org_id = Some(org_id.into());
        self
    }

    /// Set the bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.bearer_token = Some(SecretString::new(token.into()));
        self
    }

    /// Use a caller-supplied transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Add a resource placeholder.
    ///
    /// An `orgId` entry is always replaced by the configured organization.
    pub fn resource_placeholder(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.config
            .resource_placeholders
            .insert(name.into(), value.to_string());
        self
    }

    /// Add several resource placeholders
    pub fn resource_placeholders<I, K, V>(mut self, placeholders: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.config.resource_placeholders.extend(
            placeholders
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string())),
        );
        self
    }

    /// Set the overall timeout of the default transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.transport_settings.timeout = Some(timeout);
        self
    }

    /// Replace the default transport settings
    pub fn transport_settings(mut self, settings: TransportSettings) -> Self {
        self.config.transport_settings = settings;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let config = ClientConfig::builder()
            .base_url("https://api.percipio.com")
            .org_id("b001e4aa-7ac9-4d15-8ddc-b0c58f6982dd")
            .bearer_token("abc.def.ghi")
            .resource_placeholder("version", 2)
            .timeout(Duration::from_secs(30))
            .build();

        assert_eq!(config.base_url.as_deref(), Some("https://api.percipio.com"));
        assert_eq!(config.expose_token(), Some("abc.def.ghi"));
        assert_eq!(config.resource_placeholders.get("version").map(String::as_str), Some("2"));
        assert_eq!(config.transport_settings.timeout, Some(Duration::from_secs(30)));
        assert!(config.transport.is_none());
    }

    #[test]
    fn test_default_transport_settings() {
        let settings = TransportSettings::default();
        assert_eq!(settings.timeout, None);
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.tcp_keepalive, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.c2ln";
        let config = ClientConfig::builder().bearer_token(token).build();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(token));
        assert!(debug.contains("[REDACTED]"));
    }
}
