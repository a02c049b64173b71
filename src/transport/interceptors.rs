//! Request and response interceptors.
//!
//! Interceptors run in registration order. Request interceptors may refuse a
//! request; response interceptors only run for responses the transport
//! accepts, so rejected requests carry no data added here.

use super::{ResponseEnvelope, SentAt, Timings, TransportRequest};
use crate::errors::TransportResult;
use chrono::Duration as ChronoDuration;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;
use uuid::Uuid;

/// Hook run before a request is sent
pub trait RequestInterceptor: Send + Sync {
    /// Inspect or modify the outgoing request
    fn on_request(&self, request: &mut TransportRequest) -> TransportResult<()>;
}

/// Hook run after a successful response is received
pub trait ResponseInterceptor: Send + Sync {
    /// Inspect or modify the response
    fn on_response(&self, request: &TransportRequest, response: &mut ResponseEnvelope);
}

/// Handle returned on registration, used to eject an interceptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(u64);

/// Registry of interceptors attached to a transport
#[derive(Default)]
pub struct Interceptors {
    request: RwLock<Vec<(InterceptorId, Arc<dyn RequestInterceptor>)>>,
    response: RwLock<Vec<(InterceptorId, Arc<dyn ResponseInterceptor>)>>,
    next_id: AtomicU64,
}

impl Interceptors {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the timing interceptor installed
    pub fn with_timing() -> Self {
        let interceptors = Self::new();
        interceptors.install_timing();
        interceptors
    }

    /// Install [`TimingInterceptor`] on both sides
    pub fn install_timing(&self) -> (InterceptorId, InterceptorId) {
        let timing = Arc::new(TimingInterceptor);
        (self.add_request(timing.clone()), self.add_response(timing))
    }

    fn next(&self) -> InterceptorId {
        InterceptorId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a request interceptor
    pub fn add_request(&self, interceptor: Arc<dyn RequestInterceptor>) -> InterceptorId {
        let id = self.next();
        self.request.write().push((id, interceptor));
        id
    }

    /// Register a response interceptor
    pub fn add_response(&self, interceptor: Arc<dyn ResponseInterceptor>) -> InterceptorId {
        let id = self.next();
        self.response.write().push((id, interceptor));
        id
    }

    /// Remove an interceptor; returns false if the id is unknown
    pub fn eject(&self, id: InterceptorId) -> bool {
        let mut request = self.request.write();
        if let Some(pos) = request.iter().position(|(i, _)| *i == id) {
            request.remove(pos);
            return true;
        }
        drop(request);

        let mut response = self.response.write();
        if let Some(pos) = response.iter().position(|(i, _)| *i == id) {
            response.remove(pos);
            return true;
        }
        false
    }

    /// Number of registered request interceptors
    pub fn request_count(&self) -> usize {
        self.request.read().len()
    }

    /// Number of registered response interceptors
    pub fn response_count(&self) -> usize {
        self.response.read().len()
    }

    /// Run request interceptors in order, stopping at the first failure
    pub fn apply_request(&self, request: &mut TransportRequest) -> TransportResult<()> {
        let chain: Vec<_> = self.request.read().iter().map(|(_, i)| i.clone()).collect();
        for interceptor in chain {
            interceptor.on_request(request)?;
        }
        Ok(())
    }

    /// Run response interceptors in order
    pub fn apply_response(&self, request: &TransportRequest, response: &mut ResponseEnvelope) {
        let chain: Vec<_> = self.response.read().iter().map(|(_, i)| i.clone()).collect();
        for interceptor in chain {
            interceptor.on_response(request, response);
        }
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("request", &self.request_count())
            .field("response", &self.response_count())
            .finish()
    }
}

/// Stamps send/receive times and assigns correlation IDs.
///
/// Durations come from the monotonic clock, never from server timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingInterceptor;

impl RequestInterceptor for TimingInterceptor {
    fn on_request(&self, request: &mut TransportRequest) -> TransportResult<()> {
        request.sent_at = Some(SentAt::now());
        if request.correlation_id.is_none() {
            request.correlation_id = Some(Uuid::new_v4());
        }
        Ok(())
    }
}

impl ResponseInterceptor for TimingInterceptor {
    fn on_response(&self, request: &TransportRequest, response: &mut ResponseEnvelope) {
        let Some(sent_at) = request.sent_at else {
            return;
        };

        let elapsed = sent_at.instant.elapsed();
        let received = ChronoDuration::from_std(elapsed)
            .ok()
            .and_then(|d| sent_at.wall.checked_add_signed(d))
            .unwrap_or(sent_at.wall);

        let timings = Timings {
            sent: sent_at.wall,
            received,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        };

        trace!(
            correlation_id = ?request.correlation_id,
            duration_ms = timings.duration_ms,
            "Response timed"
        );

        response.timings = Some(timings);
        response.correlation_id = request.correlation_id;
    }
}
