//! Per-call request options.

use crate::errors::ClientError;
use crate::transport::TransportOptions;
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Options for a single request.
///
/// Built fluently and consumed by [`crate::RequestExecutor::send_request`] or
/// one of the verb wrappers. Query and body entries whose value is `null`
/// are never sent.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method; fixed by the verb wrappers
    pub method: Option<Method>,
    /// Resource template, e.g. `/common/v1/organizations/{orgId}/collections`
    pub resource: Option<String>,
    /// Placeholders for this call; configured placeholders take precedence
    pub placeholders: HashMap<String, String>,
    /// Query parameters
    pub query: Map<String, Value>,
    /// JSON body
    pub body: Option<Value>,
    /// Extra headers, merged over the client defaults
    pub headers: Vec<(String, String)>,
    /// Options forwarded to the transport
    pub transport: TransportOptions,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options for the given resource template
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self::new().resource(resource)
    }

    /// Set the resource template
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a placeholder value
    pub fn placeholder(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.placeholders.insert(name.into(), value.to_string());
        self
    }

    /// Add a query parameter; `None` values are dropped before sending
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add several query parameters
    pub fn query_params(mut self, params: Map<String, Value>) -> Self {
        self.query.extend(params);
        self
    }

    /// Set the JSON body
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON body
    pub fn json_body<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::generic("body could not be serialized").with_cause(e))?;
        Ok(self.body(value))
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    /// Use this correlation ID instead of a generated one
    pub fn correlation_id(mut self, id: Uuid) -> Self {
        self.transport.correlation_id = Some(id);
        self
    }

    /// Whether the transport rejects non-2xx responses
    pub fn error_for_status(mut self, enabled: bool) -> Self {
        self.transport.error_for_status = Some(enabled);
        self
    }

    /// Add a transport option the client does not interpret
    pub fn extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transport.extensions.insert(key.into(), value.into());
        self
    }

    /// Keep only headers and transport options.
    ///
    /// Service operations fix the method, resource, query and body
    /// themselves and discard anything the caller put there.
    pub fn passthrough(self) -> Self {
        Self {
            headers: self.headers,
            transport: self.transport,
            ..Self::default()
        }
    }
}

/// Drop `null` entries; `None` when nothing is left
pub(crate) fn compact_query(query: Map<String, Value>) -> Option<Map<String, Value>> {
    let query: Map<String, Value> = query.into_iter().filter(|(_, v)| !v.is_null()).collect();
    (!query.is_empty()).then_some(query)
}

/// Drop `null` object entries; `None` for a null, empty object or empty array
pub(crate) fn compact_body(body: Option<Value>) -> Option<Value> {
    match body? {
        Value::Null => None,
        Value::Object(map) => {
            let map: Map<String, Value> = map.into_iter().filter(|(_, v)| !v.is_null()).collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        Value::Array(items) if items.is_empty() => None,
        other => Some(other),
    }
}
