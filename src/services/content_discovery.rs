//! Content discovery: search, catalog, share links, compliance content.

use super::{operation, to_query_map, PageParams};
use crate::client::{RequestExecutor, RequestOptions};
use crate::errors::PercipioResult;
use crate::transport::ResponseEnvelope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const CATALOG_CONTENT: &str = "/content-discovery/v2/organizations/{orgId}/catalog-content";
const SEARCH_CONTENT: &str = "/content-discovery/v1/organizations/{orgId}/search-content";
const CATALOG_STRUCTURE: &str = "/content-discovery/v1/organizations/{orgId}/catalog-structure";
const SHARE_LINK_FOR_ORG: &str =
    "/content-discovery/v1/organizations/{orgId}/content/{contentId}/share-link";
const SHARE_LINK_FOR_USER: &str =
    "/content-discovery/v1/organizations/{orgId}/users/{userId}/content/{contentId}/share-link";
const SHARE_URL_FOR_ORG: &str = "/content-discovery/v1/organizations/{orgId}/share-link/url";
const SHARE_URL_FOR_USER: &str =
    "/content-discovery/v1/organizations/{orgId}/users/{userId}/share-link/url";
const COMPLIANCE_CONTENT: &str = "/content-discovery/v1/organizations/{orgId}/compliance-content";

/// Content discovery operations
pub struct ContentDiscoveryService<'a> {
    executor: &'a dyn RequestExecutor,
}

impl<'a> ContentDiscoveryService<'a> {
    /// Creates a new content discovery group
    pub fn new(executor: &'a dyn RequestExecutor) -> Self {
        Self { executor }
    }

    /// Fetches a page of catalog content
    pub async fn get_catalog_content(
        &self,
        params: &CatalogContentParams,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let query = to_query_map(params)?;
        self.executor
            .get(operation(CATALOG_CONTENT, options).query_params(query))
            .await
    }

    /// Searches content
    pub async fn get_search_content(
        &self,
        params: &SearchContentParams,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let query = to_query_map(params)?;
        self.executor
            .get(operation(SEARCH_CONTENT, options).query_params(query))
            .await
    }

    /// Returns the catalog structure
    pub async fn get_catalog_structure(
        &self,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        self.executor.get(operation(CATALOG_STRUCTURE, options)).await
    }

    /// Creates a share link to content, scoped to the organization
    pub async fn create_shareable_link_for_org(
        &self,
        content_id: &str,
        body: &ShareLinkRequest,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(SHARE_LINK_FOR_ORG, options)
            .placeholder("contentId", content_id)
            .json_body(body)?;
        self.executor.post(options).await
    }

    /// Creates a share link to content, scoped to a user
    pub async fn create_shareable_link_for_user(
        &self,
        user_id: &str,
        content_id: &str,
        body: &ShareLinkRequest,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(SHARE_LINK_FOR_USER, options)
            .placeholder("userId", user_id)
            .placeholder("contentId", content_id)
            .json_body(body)?;
        self.executor.post(options).await
    }

    /// Creates a share link to a Percipio URL, scoped to the organization
    pub async fn create_shareable_link_for_url_with_org(
        &self,
        body: &ShareUrlRequest,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(SHARE_URL_FOR_ORG, options).json_body(body)?;
        self.executor.post(options).await
    }

    /// Creates a share link to a Percipio URL, scoped to a user
    pub async fn create_shareable_link_for_url_with_user(
        &self,
        user_id: &str,
        body: &ShareUrlRequest,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(SHARE_URL_FOR_USER, options)
            .placeholder("userId", user_id)
            .json_body(body)?;
        self.executor.post(options).await
    }

    /// Fetches a page of compliance content
    pub async fn get_compliance_content(
        &self,
        params: &PageParams,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let query = to_query_map(params)?;
        self.executor
            .get(operation(COMPLIANCE_CONTENT, options).query_params(query))
            .await
    }
}

/// Catalog content query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogContentParams {
    /// Transform applied to the returned metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_name: Option<String>,
    /// Only content updated since this time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_since: Option<DateTime<Utc>>,
    /// Number of items to skip
    pub offset: u32,
    /// Maximum number of items to return
    pub max: u32,
    /// Dataset identifier returned by the first page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging_request_id: Option<String>,
}

impl Default for CatalogContentParams {
    fn default() -> Self {
        Self {
            transform_name: None,
            updated_since: None,
            offset: 0,
            max: 1000,
            paging_request_id: None,
        }
    }
}

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContentParams {
    /// Search terms
    pub q: String,
    /// Locale of the content, e.g. `en`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_code: Option<String>,
    /// Content types to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_filter: Option<Vec<String>>,
    /// Content modalities to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<Vec<String>>,
    /// Expertise levels to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise_level: Option<Vec<String>>,
    /// License pools to search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_pool_ids: Option<Vec<String>>,
    /// Number of items to skip
    pub offset: u32,
    /// Maximum number of items to return
    pub max: u32,
}

impl SearchContentParams {
    /// Search for `q` with default paging
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }
}

impl Default for SearchContentParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            locale_code: None,
            type_filter: None,
            modality: None,
            expertise_level: None,
            license_pool_ids: None,
            offset: 0,
            max: 25,
        }
    }
}

/// Body of a content share link request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkRequest {
    /// Locale saved with the link and used when it is launched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_code: Option<String>,
}

/// Body of a URL share link request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareUrlRequest {
    /// Relative Percipio URL to share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
