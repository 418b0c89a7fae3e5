use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{HeaderMap, HeaderName, Uri};
use axum::{Extension, Json};
use resource_group_sdk::{PermissionMap, ResourceGroup};
use secrecy::SecretString;
use tracing::field::Empty;

use crate::api::rest::error::{Problem, domain_error_to_problem};
use crate::domain::dispatcher::ResourceGroupDispatcher;

pub type ApiResult<T> = Result<T, Problem>;

/// Shared handler state.
pub struct ApiState {
    pub dispatcher: Arc<ResourceGroupDispatcher>,
    pub token_header: HeaderName,
}

impl ApiState {
    /// Credential from the configured header; absent or non-ASCII reads as empty.
    fn token(&self, headers: &HeaderMap) -> SecretString {
        let raw = headers
            .get(&self.token_header)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        SecretString::from(raw.to_owned())
    }
}

/// List active groups of a kind under a parent resource
#[tracing::instrument(
    skip(state, headers, uri),
    fields(request_id = Empty)
)]
pub(crate) async fn list_resource_groups(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    Path((resource_id, group_type)): Path<(String, String)>,
) -> ApiResult<Json<Vec<ResourceGroup>>> {
    list(&state, &headers, &uri, &resource_id, &group_type).await
}

/// List application groups through the route that predates group kinds
#[tracing::instrument(
    skip(state, headers, uri),
    fields(request_id = Empty)
)]
pub(crate) async fn list_resource_groups_legacy(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    Path(resource_id): Path<String>,
) -> ApiResult<Json<Vec<ResourceGroup>>> {
    list(&state, &headers, &uri, &resource_id, "").await
}

async fn list(
    state: &ApiState,
    headers: &HeaderMap,
    uri: &Uri,
    resource_id: &str,
    group_type: &str,
) -> ApiResult<Json<Vec<ResourceGroup>>> {
    state
        .dispatcher
        .get_active_resource_group_list(state.token(headers), resource_id, group_type)
        .await
        .map(Json)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

/// Create a group under a parent resource
#[tracing::instrument(
    skip(state, headers, uri, body),
    fields(size = body.len(), request_id = Empty)
)]
pub(crate) async fn create_resource_group(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    Path(resource_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ResourceGroup>> {
    state
        .dispatcher
        .create_resource_group(state.token(&headers), &resource_id, &body)
        .await
        .map(Json)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

/// Update a group identified by the body's `id`
#[tracing::instrument(
    skip(state, headers, uri, body),
    fields(size = body.len(), request_id = Empty)
)]
pub(crate) async fn update_resource_group(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ResourceGroup>> {
    state
        .dispatcher
        .update_resource_group(state.token(&headers), &body)
        .await
        .map(Json)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

/// Delete a group of the given kind
#[tracing::instrument(
    skip(state, headers, uri),
    fields(request_id = Empty)
)]
pub(crate) async fn delete_resource_group(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    Path((resource_group_id, group_type)): Path<(String, String)>,
) -> ApiResult<Json<bool>> {
    delete(&state, &headers, &uri, &resource_group_id, &group_type).await
}

/// Delete an application group through the route that predates group kinds
#[tracing::instrument(
    skip(state, headers, uri),
    fields(request_id = Empty)
)]
pub(crate) async fn delete_resource_group_legacy(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    Path(resource_group_id): Path<String>,
) -> ApiResult<Json<bool>> {
    delete(&state, &headers, &uri, &resource_group_id, "").await
}

async fn delete(
    state: &ApiState,
    headers: &HeaderMap,
    uri: &Uri,
    resource_group_id: &str,
    group_type: &str,
) -> ApiResult<Json<bool>> {
    state
        .dispatcher
        .delete_resource_group(state.token(headers), resource_group_id, group_type)
        .await
        .map(Json)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

/// Report the caller's permission on each requested member
#[tracing::instrument(
    skip(state, headers, uri, body),
    fields(size = body.len(), request_id = Empty)
)]
pub(crate) async fn check_resource_group_permissions(
    uri: Uri,
    Extension(state): Extension<Arc<ApiState>>,
    headers: HeaderMap,
    Path(resource_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<PermissionMap>> {
    state
        .dispatcher
        .check_resource_group_permissions(state.token(&headers), &resource_id, &body)
        .await
        .map(Json)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}
