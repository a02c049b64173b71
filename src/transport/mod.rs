//! HTTP transport layer for the Percipio client.
//!
//! The client assembles a [`TransportRequest`] and hands it to an
//! [`HttpTransport`]. The default implementation is [`ReqwestTransport`];
//! callers may supply their own.

mod interceptors;
mod reqwest_transport;

pub use interceptors::*;
pub use reqwest_transport::*;

use crate::errors::TransportResult;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// HTTP transport trait for sending assembled requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the response
    async fn request(&self, request: TransportRequest) -> TransportResult<ResponseEnvelope>;

    /// Create a new transport instance sharing this one's connection pool.
    fn create(&self) -> Option<Arc<dyn HttpTransport>> {
        None
    }

    /// Interceptor registry, when the transport supports interceptors.
    fn interceptors(&self) -> Option<&Interceptors> {
        None
    }

    /// Capabilities this transport provides.
    fn capabilities(&self) -> TransportCapabilities {
        TransportCapabilities::request_only()
    }
}

/// Capabilities advertised by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportCapabilities {
    /// Can create sibling instances
    pub create: bool,
    /// Can send requests
    pub request: bool,
    /// Accepts request/response interceptors
    pub interceptors: bool,
}

impl TransportCapabilities {
    /// Every capability
    pub const fn full() -> Self {
        Self {
            create: true,
            request: true,
            interceptors: true,
        }
    }

    /// Sending requests only
    pub const fn request_only() -> Self {
        Self {
            create: false,
            request: true,
            interceptors: false,
        }
    }

    /// True when {create, request, interceptors} are all present
    pub fn is_complete(&self) -> bool {
        self.create && self.request && self.interceptors
    }

    /// Names of the missing capabilities
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.create {
            missing.push("create");
        }
        if !self.request {
            missing.push("request");
        }
        if !self.interceptors {
            missing.push("interceptors");
        }
        missing
    }
}

/// Options forwarded verbatim to the transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportOptions {
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Correlation ID to use instead of a generated one
    pub correlation_id: Option<Uuid>,
    /// Reject non-2xx responses (transport default: true)
    pub error_for_status: Option<bool>,
    /// Transport-specific options the client does not interpret
    pub extensions: Map<String, Value>,
}

/// Wall-clock and monotonic stamps taken when a request is sent
#[derive(Debug, Clone, Copy)]
pub struct SentAt {
    /// Wall-clock send time
    pub wall: DateTime<Utc>,
    /// Monotonic send time
    pub instant: Instant,
}

impl SentAt {
    /// Stamp the current time
    pub fn now() -> Self {
        Self {
            wall: Utc::now(),
            instant: Instant::now(),
        }
    }
}

/// Transport-level request descriptor
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Base URL of the API
    pub base_url: String,
    /// Resolved resource path
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Query parameters; `None` when there are none
    pub query: Option<Map<String, Value>>,
    /// JSON body; `None` when there is none
    pub body: Option<Value>,
    /// Passthrough options
    pub options: TransportOptions,
    /// Correlation ID for cross-log tracing
    pub correlation_id: Option<Uuid>,
    /// Set by the timing interceptor when the request is sent
    pub sent_at: Option<SentAt>,
}

impl TransportRequest {
    /// Create a request with no query, body or options
    pub fn new(method: Method, base_url: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            url: url.into(),
            headers: HeaderMap::new(),
            query: None,
            body: None,
            options: TransportOptions::default(),
            correlation_id: None,
            sent_at: None,
        }
    }

    /// Join the base URL and the resource path
    pub fn full_url(&self) -> String {
        if self.base_url.is_empty() {
            return self.url.clone();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = self.url.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Flatten the query map into key/value pairs.
    ///
    /// Strings are sent as-is, arrays become repeated keys, objects are sent
    /// as JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(query) = &self.query {
            for (key, value) in query {
                match value {
                    Value::Null => {}
                    Value::Array(items) => {
                        for item in items.iter().filter(|v| !v.is_null()) {
                            pairs.push((key.clone(), scalar_to_string(item)));
                        }
                    }
                    other => pairs.push((key.clone(), scalar_to_string(other))),
                }
            }
        }
        pairs
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Timing metadata attached to a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// When the request was sent
    pub sent: DateTime<Utc>,
    /// When the response was received
    pub received: DateTime<Utc>,
    /// Monotonic round-trip duration in milliseconds
    pub duration_ms: u64,
}

impl Timings {
    /// Round-trip duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Transport response plus timing and correlation metadata
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Bytes,
    /// Final request URL
    pub url: String,
    /// Set by the timing interceptor
    pub timings: Option<Timings>,
    /// Set by the timing interceptor
    pub correlation_id: Option<Uuid>,
}

impl ResponseEnvelope {
    /// Create an envelope with no instrumentation attached
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>, url: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            url: url.into(),
            timings: None,
            correlation_id: None,
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Body as UTF-8 text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
