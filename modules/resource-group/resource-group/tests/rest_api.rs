#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Router-level tests against the static collaborators and the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use resource_group::config::{AuthNMode, AuthZMode, PolicyRule, TokenMapping};
use resource_group::infra::{InMemoryResourceGroupService, StaticEnforcer, StaticUserResolver};
use resource_group::{
    Collaborators, ResourceGroupConfig, ResourceGroupModule, StaticAuthNConfig, StaticAuthZConfig,
};
use resource_group_sdk::{
    GroupAccess, PermissionMap, ResourceGroup, ResourceGroupError, ResourceGroupRequest,
    ResourceGroupService, ResourceGroupType,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Counts calls before handing them to the in-memory store.
#[derive(Default)]
struct CountingService {
    inner: InMemoryResourceGroupService,
    calls: AtomicUsize,
}

impl CountingService {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceGroupService for CountingService {
    async fn get_active_resource_group_list(
        &self,
        access: &GroupAccess,
        parent_resource_id: i32,
        group_type: ResourceGroupType,
    ) -> Result<Vec<ResourceGroup>, ResourceGroupError> {
        self.hit();
        self.inner
            .get_active_resource_group_list(access, parent_resource_id, group_type)
            .await
    }

    async fn create_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        self.hit();
        self.inner.create_resource_group(access, request).await
    }

    async fn update_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        self.hit();
        self.inner.update_resource_group(access, request).await
    }

    async fn delete_resource_group(
        &self,
        access: &GroupAccess,
        id: i32,
        group_type: ResourceGroupType,
    ) -> Result<bool, ResourceGroupError> {
        self.hit();
        self.inner.delete_resource_group(access, id, group_type).await
    }

    async fn check_resource_group_permissions(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<PermissionMap, ResourceGroupError> {
        self.hit();
        self.inner.check_resource_group_permissions(access, request).await
    }
}

struct TestApp {
    router: Router,
    service: Arc<CountingService>,
}

fn rule(token: &str, resource: &str, action: &str, objects: &[&str]) -> PolicyRule {
    PolicyRule {
        token: token.to_owned(),
        resource: resource.to_owned(),
        action: action.to_owned(),
        objects: objects.iter().map(|o| (*o).to_owned()).collect(),
    }
}

/// `admin` may do anything; `viewer` may only read applications 1 and 2.
fn app() -> TestApp {
    let authn = StaticAuthNConfig {
        mode: AuthNMode::StaticTokens,
        default_user_id: 1,
        tokens: vec![
            TokenMapping {
                token: "admin".to_owned(),
                user_id: 2,
            },
            TokenMapping {
                token: "viewer".to_owned(),
                user_id: 3,
            },
        ],
    };
    let authz = StaticAuthZConfig {
        mode: AuthZMode::Policies,
        policies: vec![
            rule("admin", "*", "*", &["*"]),
            rule("viewer", "applications", "get", &["1", "2"]),
        ],
    };
    let service = Arc::new(CountingService::default());
    let module = ResourceGroupModule::new(
        &ResourceGroupConfig::default(),
        Collaborators {
            users: Arc::new(StaticUserResolver::from_config(&authn)),
            enforcer: Arc::new(StaticEnforcer::from_config(&authz)),
            service: service.clone(),
        },
    )
    .expect("module builds");

    TestApp {
        router: module.router(),
        service,
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn create_then_list_application_group() {
    let app = app();

    let (status, created) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/3",
        Some("admin"),
        Some(json!({"name": "backend", "environmentId": 7, "appIds": [1, 2]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["parentResourceId"], 7);
    assert_eq!(created["resourceIds"], json!([1, 2]));
    assert_eq!(created["groupType"], "app-group");
    assert_eq!(created["createdBy"], 2);

    let (status, listed) = send(
        &app.router,
        Method::GET,
        "/resource-group/v1/7/app-group",
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, legacy) = send(
        &app.router,
        Method::GET,
        "/resource-group/v1/7",
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(legacy, listed);
}

#[tokio::test]
async fn list_hides_members_the_caller_cannot_read() {
    let app = app();
    send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7",
        Some("admin"),
        Some(json!({"name": "mixed", "resourceIds": [2, 5]})),
    )
    .await;

    let (status, listed) = send(
        &app.router,
        Method::GET,
        "/resource-group/v1/7/app-group",
        Some("viewer"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["resourceIds"], json!([2]));
}

#[tokio::test]
async fn create_env_group_uses_path_parent() {
    let app = app();
    let (status, created) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/5",
        Some("admin"),
        Some(json!({
            "name": "prod-envs",
            "groupType": "env-group",
            "environmentId": 9,
            "appIds": [1],
            "resourceIds": [4]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["parentResourceId"], 5);
    assert_eq!(created["resourceIds"], json!([4]));
    assert_eq!(created["groupType"], "env-group");
}

#[tokio::test]
async fn create_without_token_is_unauthorized() {
    let app = app();
    let (status, problem) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/5",
        None,
        Some(json!({"name": "x", "resourceIds": [1]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(problem["status"], 401);
    assert_eq!(app.service.calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/resource-group/v1/5")
        .header("token", "admin")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(app.service.calls(), 0);
}

#[tokio::test]
async fn non_numeric_resource_id_is_bad_request() {
    let app = app();
    let (status, _) = send(
        &app.router,
        Method::GET,
        "/resource-group/v1/abc/app-group",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.service.calls(), 0);
}

#[tokio::test]
async fn validation_failure_echoes_payload() {
    let app = app();
    let (status, problem) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/5",
        Some("admin"),
        Some(json!({"name": "Not Valid", "resourceIds": [1]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["payload"]["name"], "Not Valid");
    assert_eq!(problem["payload"]["parentResourceId"], 5);
    assert_eq!(problem["errors"][0]["field"], "name");
    assert_eq!(app.service.calls(), 0);
}

#[tokio::test]
async fn update_changes_members() {
    let app = app();
    let (_, created) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7",
        Some("admin"),
        Some(json!({"name": "team", "resourceIds": [1]})),
    )
    .await;

    let (status, updated) = send(
        &app.router,
        Method::PUT,
        "/resource-group/v1",
        Some("admin"),
        Some(json!({
            "id": created["id"],
            "name": "team",
            "environmentId": 7,
            "appIds": [1, 3]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["resourceIds"], json!([1, 3]));
}

#[tokio::test]
async fn update_without_permission_is_a_service_error() {
    let app = app();
    let (_, created) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7",
        Some("admin"),
        Some(json!({"name": "team", "resourceIds": [1]})),
    )
    .await;

    let (status, problem) = send(
        &app.router,
        Method::PUT,
        "/resource-group/v1",
        Some("viewer"),
        Some(json!({
            "id": created["id"],
            "name": "team",
            "parentResourceId": 7,
            "resourceIds": [1]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(problem["title"], "Access Denied");
}

#[tokio::test]
async fn delete_with_bad_group_type_is_bad_request() {
    let app = app();
    let (status, problem) = send(
        &app.router,
        Method::DELETE,
        "/resource-group/v1/1/cluster-group",
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Invalid Group Type");
    assert_eq!(app.service.calls(), 0);
}

#[tokio::test]
async fn delete_then_list_is_empty() {
    let app = app();
    let (_, created) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7",
        Some("admin"),
        Some(json!({"name": "gone", "resourceIds": [4]})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, deleted) = send(
        &app.router,
        Method::DELETE,
        &format!("/resource-group/v1/{id}"),
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!(true));

    let (_, listed) = send(
        &app.router,
        Method::GET,
        "/resource-group/v1/7/app-group",
        None,
        None,
    )
    .await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn permission_check_returns_map() {
    let app = app();
    let (status, map) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7/permission/check",
        Some("admin"),
        Some(json!({"resourceIds": [1, 2]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map, json!({"1": true, "2": true}));

    let (status, map) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7/permission/check",
        Some("viewer"),
        Some(json!({"groupType": "env-group", "resourceIds": [1]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map, json!({"1": false}));
}

#[tokio::test]
async fn permission_check_unauthenticated_never_reaches_service() {
    let app = app();
    let (status, _) = send(
        &app.router,
        Method::POST,
        "/resource-group/v1/7/permission/check",
        Some("stranger"),
        Some(json!({"resourceIds": [1]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.service.calls(), 0);
}
