//! User management: users and batch user requests.

use super::{operation, to_query_map};
use crate::client::{RequestExecutor, RequestOptions};
use crate::errors::PercipioResult;
use crate::transport::ResponseEnvelope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const USERS: &str = "/user-management/v1/organizations/{orgId}/users";
const USER_BY_UUID: &str = "/user-management/v1/organizations/{orgId}/users/{id}";
const USER_BY_EXTERNAL_ID: &str =
    "/user-management/v1/organizations/{orgId}/users/external-user-id/{externalUserId}";
const USER_BY_LOGIN_NAME: &str =
    "/user-management/v1/organizations/{orgId}/users/login-name/{loginName}";
const USER_BY_LOGIN_NAME_OR_EMAIL: &str =
    "/user-management/v1/organizations/{orgId}/users/login-name-or-email/{loginNameOrEmail}";
const BATCH_USERS: &str = "/user-management/v1/organizations/{orgId}/batch-users-request";
const BATCH_USERS_BY_ID: &str =
    "/user-management/v1/organizations/{orgId}/batch-users-request/{batchUsersRequestId}";

/// User management operations
pub struct UserManagementService<'a> {
    executor: &'a dyn RequestExecutor,
}

impl<'a> UserManagementService<'a> {
    /// Creates a new user management group
    pub fn new(executor: &'a dyn RequestExecutor) -> Self {
        Self { executor }
    }

    /// Fetches a page of users
    pub async fn get_users(
        &self,
        params: &GetUsersParams,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let query = to_query_map(params)?;
        self.executor
            .get(operation(USERS, options).query_params(query))
            .await
    }

    /// Creates a user
    pub async fn create_user<T>(
        &self,
        user: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        let options = operation(USERS, options).json_body(user)?;
        self.executor.post(options).await
    }

    /// Fetches a user by Percipio UUID
    pub async fn get_user_by_uuid(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        self.executor
            .get(operation(USER_BY_UUID, options).placeholder("id", id))
            .await
    }

    /// Updates a user by Percipio UUID
    pub async fn update_user_by_uuid<T>(
        &self,
        id: &str,
        user: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        let options = operation(USER_BY_UUID, options)
            .placeholder("id", id)
            .json_body(user)?;
        self.executor.patch(options).await
    }

    /// Fetches a user by external user id
    pub async fn get_user_by_external_user_id(
        &self,
        external_user_id: &str,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options =
            operation(USER_BY_EXTERNAL_ID, options).placeholder("externalUserId", external_user_id);
        self.executor.get(options).await
    }

    /// Creates or updates a user by external user id
    pub async fn upsert_user_by_external_user_id<T>(
        &self,
        external_user_id: &str,
        user: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        let options = operation(USER_BY_EXTERNAL_ID, options)
            .placeholder("externalUserId", external_user_id)
            .json_body(user)?;
        self.executor.patch(options).await
    }

    /// Fetches a user by login name
    pub async fn get_user_by_login_name(
        &self,
        login_name: &str,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(USER_BY_LOGIN_NAME, options).placeholder("loginName", login_name);
        self.executor.get(options).await
    }

    /// Creates or updates a user by login name
    pub async fn upsert_user_by_login_name<T>(
        &self,
        login_name: &str,
        user: &T,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        let options = operation(USER_BY_LOGIN_NAME, options)
            .placeholder("loginName", login_name)
            .json_body(user)?;
        self.executor.patch(options).await
    }

    /// Fetches a user by login name or email
    pub async fn get_user_by_email_id(
        &self,
        login_name_or_email: &str,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(USER_BY_LOGIN_NAME_OR_EMAIL, options)
            .placeholder("loginNameOrEmail", login_name_or_email);
        self.executor.get(options).await
    }

    /// Submits a batch of users to create or update
    pub async fn create_batch_users_request<T>(
        &self,
        users: &[T],
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope>
    where
        T: Serialize,
    {
        let options = operation(BATCH_USERS, options).json_body(users)?;
        self.executor.post(options).await
    }

    /// Fetches the status of a batch users request
    pub async fn get_batch_users_request(
        &self,
        batch_users_request_id: &str,
        options: RequestOptions,
    ) -> PercipioResult<ResponseEnvelope> {
        let options = operation(BATCH_USERS_BY_ID, options)
            .placeholder("batchUsersRequestId", batch_users_request_id);
        self.executor.get(options).await
    }
}

/// User listing query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUsersParams {
    /// Number of users to skip
    pub offset: u32,
    /// Maximum number of users to return
    pub max: u32,
    /// Only users updated since this time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_since: Option<DateTime<Utc>>,
}

impl Default for GetUsersParams {
    fn default() -> Self {
        Self {
            offset: 0,
            max: 1000,
            updated_since: None,
        }
    }
}
