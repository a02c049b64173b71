//! Common services: collections, custom attributes, license pools, audiences.

use super::{operation, to_query_map, PageParams};
use crate::client::{RequestExecutor, RequestOptions};
use crate::errors::PercipioResult;
use crate::transport::ResponseEnvelope;

const COLLECTIONS: &str = "/common/v1/organizations/{orgId}/collections";
const CUSTOM_ATTRIBUTES: &str = "/common/v1/organizations/{orgId}/custom-attributes";
const LICENSE_POOLS: &str = "/common/v1/organizations/{orgId}/license-pools";
const AUDIENCES: &str = "/common/v2/organizations/{orgId}/audiences";

/// Common services operations
pub struct CommonService<'a> {
    executor: &'a dyn RequestExecutor,
}

impl<'a> CommonService<'a> {
    /// Creates a new common services group
    pub fn new(executor: &'a dyn RequestExecutor) -> Self {
        Self { executor }
    }

    /// Lists the collections of the organization
    pub async fn get_collections(&self, options: RequestOptions) -> PercipioResult<ResponseEnvelope> {
        self.executor.get(operation(COLLECTIONS, options)).await
    }

    /// Lists the custom attributes of the organization
    pub async fn get_custom_attributes(
        &self,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        self.executor.get(operation(CUSTOM_ATTRIBUTES, options)).await
    }

    /// Lists the license pools of the organization
    pub async fn get_license_pools_v1(
        &self,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        self.executor.get(operation(LICENSE_POOLS, options)).await
    }

    /// Fetches a page of audiences
    pub async fn fetch_audiences(
        &self,
        params: &PageParams,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let query = to_query_map(params)?;
        self.executor
            .get(operation(AUDIENCES, options).query_params(query))
            .await
    }
}
