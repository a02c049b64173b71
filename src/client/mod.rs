//! Percipio client implementation.
//!
//! [`PercipioClient`] validates its configuration once at construction and
//! then serves requests through the [`RequestExecutor`] trait. Service
//! operation groups borrow the client and call the same trait.

mod headers;
mod placeholders;
mod request;

pub use request::RequestOptions;

use crate::config::validation::{
    validate_base_url, validate_bearer_token, validate_org_id, validate_transport,
};
use crate::config::ClientConfig;
use crate::errors::{ClientError, PercipioError, PercipioResult};
use crate::observability::{create_request_span, record_error, record_success, record_timings};
use crate::services::{
    CommonService, ContentDiscoveryService, ReportingService, UserManagementService,
};
use crate::transport::{HttpTransport, ReqwestTransport, ResponseEnvelope, TransportRequest};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, Instrument};
use uuid::Uuid;

/// Placeholder always resolved to the configured organization
pub const ORG_ID_PLACEHOLDER: &str = "orgId";

/// Sends requests to the Percipio API.
///
/// Every failure, including a missing method or an unresolved placeholder,
/// is returned from the future; nothing panics or fails before it is polled.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Send a request described by `options`
    async fn send_request(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope>;

    /// Send a GET request
    async fn get(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::GET)?).await
    }

    /// Send a PUT request
    async fn put(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::PUT)?).await
    }

    /// Send a POST request
    async fn post(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::POST)?).await
    }

    /// Send a PATCH request
    async fn patch(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::PATCH)?).await
    }

    /// Send a DELETE request
    async fn delete(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::DELETE)?).await
    }

    /// Send a HEAD request
    async fn head(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::HEAD)?).await
    }

    /// Send an OPTIONS request
    async fn options(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.send_request(with_method(options, Method::OPTIONS)?).await
    }
}

fn with_method(mut options: RequestOptions, method: Method) -> Result<RequestOptions, ClientError> {
    match &options.method {
        Some(requested) if *requested != method => {
            Err(ClientError::invalid("method cannot be overridden"))
        }
        _ => {
            options.method = Some(method);
            Ok(options)
        }
    }
}

struct ClientInner {
    id: Uuid,
    base_url: String,
    org_id: String,
    placeholders: HashMap<String, String>,
    default_headers: HeaderMap,
    transport: Arc<dyn HttpTransport>,
}

/// Percipio API client
#[derive(Clone)]
pub struct PercipioClient {
    inner: Arc<ClientInner>,
}

impl PercipioClient {
    /// Create a new client, validating the configuration.
    ///
    /// Checks run in order and stop at the first failure: base URL,
    /// organization, bearer token, then the supplied transport.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        validate_base_url(config.base_url.as_deref())?;
        validate_org_id(config.org_id.as_deref())?;
        let token = validate_bearer_token(config.expose_token())?;

        let transport: Arc<dyn HttpTransport> = match &config.transport {
            Some(transport) => {
                validate_transport(transport.as_ref())?;
                Arc::clone(transport)
            }
            None => {
                let transport = ReqwestTransport::with_timing(&config.transport_settings)
                    .map_err(|e| {
                        ClientError::generic("default transport could not be built").with_cause(e)
                    })?;
                Arc::new(transport)
            }
        };

        let default_headers = headers::default_headers(token)?;

        // validated above
        let base_url = config.base_url.clone().unwrap_or_default();
        let org_id = config.org_id.clone().unwrap_or_default();

        let mut placeholders = config.resource_placeholders.clone();
        placeholders.insert(ORG_ID_PLACEHOLDER.to_string(), org_id.clone());

        let id = Uuid::new_v4();
        debug!(client_id = %id, base_url = %base_url, org_id = %org_id, "Percipio client created");

        Ok(Self {
            inner: Arc::new(ClientInner {
                id,
                base_url,
                org_id,
                placeholders,
                default_headers,
                transport,
            }),
        })
    }

    /// Random identifier of this client instance
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Configured base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Configured organization UUID
    pub fn org_id(&self) -> &str {
        &self.inner.org_id
    }

    /// Placeholders resolved in every resource template, including `orgId`
    pub fn resource_placeholders(&self) -> &HashMap<String, String> {
        &self.inner.placeholders
    }

    /// Headers sent with every request
    pub fn default_headers(&self) -> &HeaderMap {
        &self.inner.default_headers
    }

    /// Transport used to send requests
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.inner.transport
    }

    /// Resolve the placeholders of a resource template.
    ///
    /// Configured placeholders win over `extra`, so `orgId` always resolves
    /// to the configured organization.
    pub fn build_path(
        &self,
        template: &str,
        extra: &HashMap<String, String>,
    ) -> Result<String, ClientError> {
        placeholders::resolve(template, &self.inner.placeholders, extra)
    }

    /// Merge caller headers over the default headers
    pub fn build_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, ClientError> {
        headers::merge(&self.inner.default_headers, extra)
    }

    /// Common services operations
    pub fn common_services(&self) -> CommonService<'_> {
        CommonService::new(self)
    }

    /// Content discovery operations
    pub fn content_discovery(&self) -> ContentDiscoveryService<'_> {
        ContentDiscoveryService::new(self)
    }

    /// Reporting operations
    pub fn reporting(&self) -> ReportingService<'_> {
        ReportingService::new(self)
    }

    /// User management operations
    pub fn user_management(&self) -> UserManagementService<'_> {
        UserManagementService::new(self)
    }

    fn assemble(&self, options: RequestOptions) -> Result<TransportRequest, ClientError> {
        let RequestOptions {
            method,
            resource,
            placeholders,
            query,
            body,
            headers,
            transport,
        } = options;

        let method = method
            .ok_or_else(|| ClientError::required("method is a required configuration property"))?;
        let resource = resource
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ClientError::required("resource is a required configuration property"))?;

        let url = self.build_path(&resource, &placeholders)?;

        let mut request = TransportRequest::new(method, self.inner.base_url.as_str(), url);
        request.headers = self.build_headers(&headers)?;
        request.query = request::compact_query(query);
        request.body = request::compact_body(body);
        request.correlation_id = transport.correlation_id;
        request.options = transport;
        Ok(request)
    }
}

#[async_trait]
impl RequestExecutor for PercipioClient {
    async fn send_request(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        let request = self.assemble(options)?;

        debug!(
            method = %request.method,
            url = %request.url,
            has_query = request.query.is_some(),
            has_body = request.body.is_some(),
            "Dispatching request"
        );

        let span = create_request_span(&self.inner.id, request.method.as_str(), &request.url);
        let result = self
            .inner
            .transport
            .request(request)
            .instrument(span.clone())
            .await;

        match &result {
            Ok(response) => {
                record_success(&span, response.status.as_u16());
                record_timings(
                    &span,
                    response.correlation_id.as_ref(),
                    response.timings.map(|t| t.duration_ms),
                );
            }
            Err(e) => record_error(&span, &e.to_string()),
        }

        result.map_err(PercipioError::Transport)
    }
}

impl std::fmt::Debug for PercipioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PercipioClient")
            .field("id", &self.inner.id)
            .field("base_url", &self.inner.base_url)
            .field("org_id", &self.inner.org_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_method() {
        let options = with_method(RequestOptions::for_resource("/x"), Method::GET).unwrap();
        assert_eq!(options.method, Some(Method::GET));

        let same = RequestOptions::for_resource("/x").method(Method::GET);
        assert!(with_method(same, Method::GET).is_ok());

        let conflicting = RequestOptions::for_resource("/x").method(Method::POST);
        let err = with_method(conflicting, Method::GET).unwrap_err();
        assert!(err.is_invalid());
        assert_eq!(err.message(), "method cannot be overridden");
    }
}
