//! Header merging.

use crate::errors::ClientError;
use crate::observability::redact_authorization;
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::HeaderMap;

const BEARER_PREFIX: &str = "Bearer ";

/// Build the default headers sent with every request
pub fn default_headers(bearer_token: &str) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, bearer_token))
        .map_err(|e| ClientError::invalid_with_cause("bearer is invalid, it must be a JWT", e))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}

/// Merge caller headers over `defaults`.
///
/// Names are case-insensitive and stored lowercase; a caller value replaces
/// the default of the same name. `defaults` is left untouched.
///
/// A merged `authorization` value that does not start with `Bearer ` is
/// rejected. The error message shows only its scheme with the credential
/// redacted; the full value is kept in the error's cause.
pub fn merge(defaults: &HeaderMap, extra: &[(String, String)]) -> Result<HeaderMap, ClientError> {
    let mut headers = defaults.clone();

    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ClientError::invalid_with_cause(format!("{} is not a valid header name", name), e)
        })?;
        let mut header_value = HeaderValue::from_str(value).map_err(|e| {
            ClientError::invalid_with_cause(format!("value of header {} is invalid", name), e)
        })?;
        if header_name == AUTHORIZATION {
            header_value.set_sensitive(true);
        }
        headers.insert(header_name, header_value);
    }

    if let Some(auth) = headers.get(AUTHORIZATION) {
        let value = String::from_utf8_lossy(auth.as_bytes());
        if !value.starts_with(BEARER_PREFIX) {
            return Err(ClientError::invalid_with_cause(
                format!(
                    "authorization header is invalid, it must start with '{}' but was '{}'",
                    BEARER_PREFIX,
                    redact_authorization(&value)
                ),
                format!("authorization header value: {}", value),
            ));
        }
    }

    Ok(headers)
}
