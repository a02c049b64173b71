//! Error types for the Percipio client.
//!
//! Two families of failure reach a caller:
//! - [`ClientError`]: raised by the client itself while validating
//!   configuration or building a request.
//! - [`TransportError`]: raised by the HTTP transport (network failures,
//!   non-success statuses). The client never wraps or reclassifies these.
//!
//! Per-call operations return [`PercipioError`], which holds exactly one of
//! the two. Library-raised failures are recognised through the
//! [`ClientErrorMarker`] capability rather than by concrete type.

use crate::transport::ResponseEnvelope;
use std::fmt;
use thiserror::Error;

/// Result type for per-call Percipio operations
pub type PercipioResult<T> = Result<T, PercipioError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Kind of a library-raised error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientErrorKind {
    /// A mandatory configuration field, request field or placeholder was absent.
    ConfigurationRequired,
    /// A supplied value failed validation.
    ConfigurationInvalid,
    /// Generic library failure.
    Generic,
}

impl ClientErrorKind {
    /// Name of the error variant, as reported to callers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigurationRequired => "ConfigurationRequiredError",
            Self::ConfigurationInvalid => "ConfigurationInvalidError",
            Self::Generic => "ClientError",
        }
    }
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationRequired => write!(f, "configuration_required"),
            Self::ConfigurationInvalid => write!(f, "configuration_invalid"),
            Self::Generic => write!(f, "client_error"),
        }
    }
}

/// Error raised by the client while validating configuration or building a request.
#[derive(Error, Debug)]
pub struct ClientError {
    kind: ClientErrorKind,
    message: String,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

impl ClientError {
    /// Creates an error of the given kind.
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// A required configuration field or placeholder is missing.
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::ConfigurationRequired, message)
    }

    /// A supplied value failed validation.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::ConfigurationInvalid, message)
    }

    /// A supplied value failed validation, with the underlying failure attached.
    pub fn invalid_with_cause(
        message: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::invalid(message).with_cause(cause)
    }

    /// Generic client failure.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Generic, message)
    }

    /// Attaches an underlying cause.
    pub fn with_cause(mut self, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    /// Returns the variant name (`ConfigurationRequiredError`, ...).
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// True for `ConfigurationRequired` errors.
    pub fn is_required(&self) -> bool {
        self.kind == ClientErrorKind::ConfigurationRequired
    }

    /// True for `ConfigurationInvalid` errors.
    pub fn is_invalid(&self) -> bool {
        self.kind == ClientErrorKind::ConfigurationInvalid
    }
}

/// Errors produced by an HTTP transport.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// A connection could not be established
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server answered with a status the transport rejects
    #[error("Request failed with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The full response as received
        response: Box<ResponseEnvelope>,
    },

    /// The request could not be built or sent
    #[error("Request error: {0}")]
    Request(String),

    /// An interceptor refused the request
    #[error("Interceptor error: {0}")]
    Interceptor(String),
}

impl TransportError {
    /// HTTP status code, for status errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The rejected response, for status errors
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::Status { response, .. } => Some(response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Error returned by per-call operations.
#[derive(Error, Debug)]
pub enum PercipioError {
    /// Raised by the client while building the request
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Raised by the transport, passed through unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PercipioError {
    /// Returns the transport error, if this failure came from the transport.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Client(_) => None,
        }
    }
}

/// Capability shared by every error that may carry a library-raised failure.
pub trait ClientErrorMarker {
    /// Returns the library-raised error, if this value is one.
    fn client_error(&self) -> Option<&ClientError>;
}

impl ClientErrorMarker for ClientError {
    fn client_error(&self) -> Option<&ClientError> {
        Some(self)
    }
}

impl ClientErrorMarker for PercipioError {
    fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(e) => Some(e),
            Self::Transport(_) => None,
        }
    }
}

impl ClientErrorMarker for TransportError {
    fn client_error(&self) -> Option<&ClientError> {
        None
    }
}

impl<T: ClientErrorMarker + ?Sized> ClientErrorMarker for Box<T> {
    fn client_error(&self) -> Option<&ClientError> {
        (**self).client_error()
    }
}

/// Returns true iff `candidate` is present and carries a library-raised error.
pub fn is_client_error<E>(candidate: Option<&E>) -> bool
where
    E: ClientErrorMarker + ?Sized,
{
    candidate.and_then(|c| c.client_error()).is_some()
}
