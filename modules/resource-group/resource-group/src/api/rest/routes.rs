use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Extension, Router};

use crate::api::rest::handlers::{self, ApiState};

pub const BASE_PATH: &str = "/resource-group/v1";

/// Build the resource group router.
///
/// `/{id}` with GET or DELETE is the pre-kind route and always addresses
/// application groups.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route(BASE_PATH, put(handlers::update_resource_group))
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(handlers::list_resource_groups_legacy)
                .post(handlers::create_resource_group)
                .delete(handlers::delete_resource_group_legacy),
        )
        .route(
            &format!("{BASE_PATH}/{{id}}/{{group_type}}"),
            get(handlers::list_resource_groups).delete(handlers::delete_resource_group),
        )
        .route(
            &format!("{BASE_PATH}/{{id}}/permission/check"),
            post(handlers::check_resource_group_permissions),
        )
        .layer(Extension(state))
}
