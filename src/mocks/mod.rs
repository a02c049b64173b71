//! Mock implementations for testing.
//!
//! [`MockHttpTransport`] replays queued responses and records every request
//! it receives, after its interceptors have run.

use crate::errors::{TransportError, TransportResult};
use crate::transport::{
    HttpTransport, Interceptors, ResponseEnvelope, TransportCapabilities, TransportRequest,
};
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mock response configuration
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Response body
    pub body: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Delay before response
    pub delay_ms: Option<u64>,
    /// Error to return instead
    pub error: Option<TransportError>,
}

impl MockResponse {
    /// Create a successful JSON response
    pub fn json(data: Value) -> Self {
        Self::ok(data.to_string()).with_header("content-type", "application/json")
    }

    /// Create a successful response with raw body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    /// Create a response with the given status
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status,
            headers: Vec::new(),
            delay_ms: None,
            error: None,
        }
    }

    /// Create a transport failure
    pub fn error(error: TransportError) -> Self {
        Self {
            error: Some(error),
            ..Self::status(500, "")
        }
    }

    /// Add a response header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add delay to response
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }
}

/// Mock HTTP transport for testing
pub struct MockHttpTransport {
    /// Queue of responses to return
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Recorded requests
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    /// Default response if queue is empty
    default_response: Option<MockResponse>,
    interceptors: Interceptors,
    capabilities: TransportCapabilities,
}

impl MockHttpTransport {
    /// Create a new mock transport with every capability and no interceptors
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: None,
            interceptors: Interceptors::new(),
            capabilities: TransportCapabilities::full(),
        }
    }

    /// Install the timing interceptor
    pub fn with_timing(self) -> Self {
        self.interceptors.install_timing();
        self
    }

    /// Advertise a different capability set
    pub fn with_capabilities(mut self, capabilities: TransportCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Add a response to the queue
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.lock().push_back(response);
        self
    }

    /// Add multiple responses
    pub fn add_responses(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.responses.lock().extend(responses);
        self
    }

    /// Add a JSON response
    pub fn add_json_response(self, data: Value) -> Self {
        self.add_response(MockResponse::json(data))
    }

    /// Set default response when queue is empty
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    /// Get the last recorded request
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of recorded requests
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Clear recorded requests
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// Get remaining response count
    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().len()
    }

    fn next_response(&self) -> Option<MockResponse> {
        let mut queue = self.responses.lock();
        queue.pop_front().or_else(|| self.default_response.clone())
    }

    fn envelope(
        request: &TransportRequest,
        response: &MockResponse,
    ) -> TransportResult<ResponseEnvelope> {
        let status = StatusCode::from_u16(response.status)
            .map_err(|e| TransportError::Request(format!("Invalid mock status: {}", e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &response.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Request(format!("Invalid mock header: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Request(format!("Invalid mock header: {}", e)))?;
            headers.insert(name, value);
        }

        Ok(ResponseEnvelope::new(
            status,
            headers,
            response.body.clone(),
            request.full_url(),
        ))
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn request(&self, mut request: TransportRequest) -> TransportResult<ResponseEnvelope> {
        self.interceptors.apply_request(&mut request)?;
        self.requests.lock().push(request.clone());

        let response = self
            .next_response()
            .ok_or_else(|| TransportError::Request("No mock response configured".to_string()))?;

        if let Some(delay) = response.delay_ms {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }

        if let Some(error) = response.error {
            return Err(error);
        }

        let mut envelope = Self::envelope(&request, &response)?;

        if request.options.error_for_status.unwrap_or(true) && !envelope.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                response: Box::new(envelope),
            });
        }

        self.interceptors.apply_response(&request, &mut envelope);
        Ok(envelope)
    }

    fn create(&self) -> Option<Arc<dyn HttpTransport>> {
        if !self.capabilities.create {
            return None;
        }
        Some(Arc::new(Self {
            responses: Arc::clone(&self.responses),
            requests: Arc::clone(&self.requests),
            default_response: self.default_response.clone(),
            interceptors: Interceptors::new(),
            capabilities: self.capabilities,
        }))
    }

    fn interceptors(&self) -> Option<&Interceptors> {
        self.capabilities.interceptors.then_some(&self.interceptors)
    }

    fn capabilities(&self) -> TransportCapabilities {
        self.capabilities
    }
}

impl std::fmt::Debug for MockHttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpTransport")
            .field("pending_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
