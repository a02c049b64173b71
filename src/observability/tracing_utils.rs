//! Span helpers for request dispatch.

use tracing::{span, Level, Span};
use uuid::Uuid;

/// Create a request span with common attributes
pub fn create_request_span(client_id: &Uuid, method: &str, resource: &str) -> Span {
    span!(
        Level::INFO,
        "percipio_request",
        client_id = %client_id,
        method = %method,
        resource = %resource,
        otel.kind = "client",
        otel.status_code = tracing::field::Empty,
        http.status_code = tracing::field::Empty,
        percipio.correlation_id = tracing::field::Empty,
        percipio.duration_ms = tracing::field::Empty,
        error.message = tracing::field::Empty,
    )
}

/// Record success on a span
pub fn record_success(span: &Span, status: u16) {
    span.record("otel.status_code", "OK");
    span.record("http.status_code", status);
}

/// Record timing and correlation attached to a response
pub fn record_timings(span: &Span, correlation_id: Option<&Uuid>, duration_ms: Option<u64>) {
    if let Some(id) = correlation_id {
        span.record("percipio.correlation_id", tracing::field::display(id));
    }
    if let Some(ms) = duration_ms {
        span.record("percipio.duration_ms", ms);
    }
}

/// Record error on a span
pub fn record_error(span: &Span, error: &str) {
    span.record("otel.status_code", "ERROR");
    span.record("error.message", error);
}
