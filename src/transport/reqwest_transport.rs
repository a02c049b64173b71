//! Default HTTP transport built on reqwest.

use super::{
    HttpTransport, Interceptors, ResponseEnvelope, TransportCapabilities, TransportRequest,
};
use crate::config::TransportSettings;
use crate::errors::{TransportError, TransportResult};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Default HTTP transport using a pooled, keep-alive reqwest client
pub struct ReqwestTransport {
    client: Client,
    interceptors: Interceptors,
}

impl ReqwestTransport {
    /// Create a new transport from the given settings
    pub fn new(settings: &TransportSettings) -> TransportResult<Self> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(settings.connect_timeout)
            .pool_idle_timeout(settings.pool_idle_timeout)
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .tcp_keepalive(settings.tcp_keepalive);

        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Create a new transport with the timing interceptor installed
    pub fn with_timing(settings: &TransportSettings) -> TransportResult<Self> {
        let transport = Self::new(settings)?;
        transport.interceptors.install_timing();
        Ok(transport)
    }

    /// Create a new transport with a pre-built client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            interceptors: Interceptors::new(),
        }
    }

    fn build(&self, request: &TransportRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.clone(), request.full_url())
            .headers(request.headers.clone());

        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        builder
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn request(&self, mut request: TransportRequest) -> TransportResult<ResponseEnvelope> {
        self.interceptors.apply_request(&mut request)?;

        if !request.options.extensions.is_empty() {
            debug!(
                extensions = ?request.options.extensions.keys().collect::<Vec<_>>(),
                "Ignoring transport extensions not understood by reqwest"
            );
        }

        let response = self.build(&request).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response.bytes().await?;

        let mut envelope = ResponseEnvelope::new(status, headers, body, url);

        if request.options.error_for_status.unwrap_or(true) && !status.is_success() {
            warn!(status = %status, "Request failed with non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                response: Box::new(envelope),
            });
        }

        self.interceptors.apply_response(&request, &mut envelope);
        Ok(envelope)
    }

    fn create(&self) -> Option<Arc<dyn HttpTransport>> {
        Some(Arc::new(Self::with_client(self.client.clone())))
    }

    fn interceptors(&self) -> Option<&Interceptors> {
        Some(&self.interceptors)
    }

    fn capabilities(&self) -> TransportCapabilities {
        TransportCapabilities::full()
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("interceptors", &self.interceptors)
            .finish()
    }
}
