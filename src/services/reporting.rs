//! Reporting: report requests and their results.

use super::operation;
use crate::client::{RequestExecutor, RequestOptions};
use crate::errors::PercipioResult;
use crate::transport::ResponseEnvelope;
use serde::Serialize;

const LEARNING_ACTIVITY: &str =
    "/reporting/v1/organizations/{orgId}/report-requests/learning-activity";
const CONTENT_ACCESS: &str = "/reporting/v1/organizations/{orgId}/report-requests/content-access";
const ENTITLEMENTS: &str = "/reporting/v1/organizations/{orgId}/report-requests/entitlements";
const COLLECTIONS_CONTENT: &str =
    "/reporting/v1/organizations/{orgId}/report-requests/collections-content";
const REPORT_REQUEST: &str = "/reporting/v1/organizations/{orgId}/report-requests/{reportRequestId}";

/// Reporting operations.
///
/// Report configurations are sent as given; the response carries the id to
/// poll with [`ReportingService::get_report_request`].
pub struct ReportingService<'a> {
    executor: &'a dyn RequestExecutor,
}

impl<'a> ReportingService<'a> {
    /// Creates a new reporting group
    pub fn new(executor: &'a dyn RequestExecutor) -> Self {
        Self { executor }
    }

    async fn request_report<T>(
        &self,
        resource: &str,
        config: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        let options = operation(resource, options).json_body(config)?;
        self.executor.post(options).await
    }

    /// Requests a learning activity report
    pub async fn request_learning_activity_report<T>(
        &self,
        config: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        self.request_report(LEARNING_ACTIVITY, config, options).await
    }

    /// Requests a content access report
    pub async fn request_content_activity_report<T>(
        &self,
        config: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        self.request_report(CONTENT_ACCESS, config, options).await
    }

    /// Requests an entitlements report
    pub async fn request_entitlement_report<T>(
        &self,
        config: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        self.request_report(ENTITLEMENTS, config, options).await
    }

    /// Requests a collections content report
    pub async fn request_collections_content_report<T>(
        &self,
        config: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        self.request_report(COLLECTIONS_CONTENT, config, options).await
    }

    /// Fetches a report request, or its results once generated
    pub async fn get_report_request(
        &self,
        report_request_id: &str,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options =
            operation(REPORT_REQUEST, options).placeholder("reportRequestId", report_request_id);
        self.executor.get(options).await
    }
}
