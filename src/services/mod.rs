//! Percipio service operation groups.
//!
//! Each group borrows a [`crate::RequestExecutor`] and maps its operations to fixed
//! resource templates. Caller options are reduced to headers and transport
//! options before use; the operation supplies the method, resource,
//! placeholders, query and body.

mod common_services;
mod content_discovery;
mod reporting;
mod user_management;

pub use common_services::*;
pub use content_discovery::*;
pub use reporting::*;
pub use user_management::*;

use crate::client::RequestOptions;
use crate::errors::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Offset/max paging parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Number of items to skip
    pub offset: u32,
    /// Maximum number of items to return
    pub max: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            offset: 0,
            max: 1000,
        }
    }
}

/// Serialize typed parameters into a query map
pub(crate) fn to_query_map<T: Serialize>(params: &T) -> Result<Map<String, Value>, ClientError> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ClientError::generic("query parameters must serialize to an object")),
        Err(e) => {
            Err(ClientError::generic("query parameters could not be serialized").with_cause(e))
        }
    }
}

/// Options for a service operation: the caller's headers and transport
/// options on top of a fixed resource
pub(crate) fn operation(resource: &str, options: RequestOptions) -> RequestOptions {
    options.passthrough().resource(resource)
}
