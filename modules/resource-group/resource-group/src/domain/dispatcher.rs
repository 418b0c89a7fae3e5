//! Request dispatch for the five resource group operations.
//!
//! Each entry point runs the same pipeline: identify the caller, decode the
//! body, resolve the group kind, project legacy fields, validate, attach the
//! authorization scope, and delegate to the [`ResourceGroupService`]. The
//! first failing step decides the error. Failures are logged here, once, with
//! the operation name and the payload when one was decoded.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use resource_group_sdk::{
    BatchAuthorizer, Enforcer, GroupAccess, PermissionMap, ResourceGroup, ResourceGroupError,
    ResourceGroupPayload, ResourceGroupRequest, ResourceGroupService, UserResolver,
};
use secrecy::SecretString;
use tracing::{debug, error, info, warn};

use crate::config::ResourceGroupConfig;
use crate::domain::error::DomainError;
use crate::domain::group_type::{ResolvedGroupType, resolve_group_type};
use crate::domain::normalize::normalize;
use crate::domain::validation::{RequestValidator, echo};

/// Dispatcher entry points, named as they appear in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    CheckPermissions,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "GetActiveResourceGroupList",
            Self::Create => "CreateResourceGroup",
            Self::Update => "UpdateResourceGroup",
            Self::Delete => "DeleteResourceGroup",
            Self::CheckPermissions => "CheckResourceGroupPermissions",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collaborators the dispatcher delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserResolver>,
    pub enforcer: Arc<dyn Enforcer>,
    pub service: Arc<dyn ResourceGroupService>,
}

/// Stateless request dispatcher. Share it behind an `Arc`.
pub struct ResourceGroupDispatcher {
    users: Arc<dyn UserResolver>,
    service: Arc<dyn ResourceGroupService>,
    authorizer: BatchAuthorizer,
    validator: RequestValidator,
    request_timeout: Duration,
}

impl fmt::Debug for ResourceGroupDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceGroupDispatcher")
            .field("validator", &self.validator)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ResourceGroupDispatcher {
    #[must_use]
    pub fn new(config: &ResourceGroupConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            users,
            enforcer,
            service,
        } = collaborators;
        Self {
            users,
            service,
            authorizer: BatchAuthorizer::new(enforcer),
            validator: RequestValidator::from_config(config),
            request_timeout: config.request_timeout(),
        }
    }

    /// List active groups of a kind under a parent resource.
    ///
    /// No identity check; the store filters by the caller's `get` permission.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a non-numeric `resource_id`, `InvalidGroupType` for an
    /// unknown kind, `Service`/`Timeout` when the store fails.
    #[tracing::instrument(skip_all, fields(operation = Operation::List.as_str()))]
    pub async fn get_active_resource_group_list(
        &self,
        token: SecretString,
        resource_id: &str,
        group_type: &str,
    ) -> Result<Vec<ResourceGroup>, DomainError> {
        let result = async {
            let resource_id = parse_path_id("resourceId", resource_id)?;
            let resolved = resolve_group_type(group_type)?;
            let access = self.access(token, resolved);
            self.delegate(
                None,
                self.service
                    .get_active_resource_group_list(&access, resource_id, resolved.kind),
            )
            .await
        }
        .await;
        log_outcome(Operation::List, result)
    }

    /// Create a group under `resource_id`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when the caller cannot be identified, `BadRequest` for a
    /// malformed body or path, `InvalidGroupType`, `Validation`, then
    /// `Service`/`Timeout`.
    #[tracing::instrument(skip_all, fields(operation = Operation::Create.as_str()))]
    pub async fn create_resource_group(
        &self,
        token: SecretString,
        resource_id: &str,
        body: &[u8],
    ) -> Result<ResourceGroup, DomainError> {
        let result = async {
            let user_id = self.identify(&token).await?;
            let payload = decode(body)?;
            let resource_id = parse_path_id("resourceId", resource_id)?;
            let resolved = resolve_body_group_type(&payload)?;
            let request = normalize(payload, resolved.kind, user_id, Some(resource_id));
            self.validator.validate_create(&request)?;

            info!(payload = %echo(&request), "request payload, CreateResourceGroup");
            let access = self.access(token, resolved);
            self.delegate(
                Some(&request),
                self.service.create_resource_group(&access, &request),
            )
            .await
        }
        .await;
        log_outcome(Operation::Create, result)
    }

    /// Update a group. The body names the target by `id`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::create_resource_group`].
    #[tracing::instrument(skip_all, fields(operation = Operation::Update.as_str()))]
    pub async fn update_resource_group(
        &self,
        token: SecretString,
        body: &[u8],
    ) -> Result<ResourceGroup, DomainError> {
        let result = async {
            let user_id = self.identify(&token).await?;
            let payload = decode(body)?;
            let resolved = resolve_body_group_type(&payload)?;
            let request = normalize(payload, resolved.kind, user_id, None);
            self.validator.validate_update(&request)?;

            info!(payload = %echo(&request), "request payload, UpdateResourceGroup");
            let access = self.access(token, resolved);
            self.delegate(
                Some(&request),
                self.service.update_resource_group(&access, &request),
            )
            .await
        }
        .await;
        log_outcome(Operation::Update, result)
    }

    /// Delete a group of the given kind.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a non-numeric id, `InvalidGroupType` for an unknown
    /// kind, `Service`/`Timeout` when the store fails.
    #[tracing::instrument(skip_all, fields(operation = Operation::Delete.as_str()))]
    pub async fn delete_resource_group(
        &self,
        token: SecretString,
        resource_group_id: &str,
        group_type: &str,
    ) -> Result<bool, DomainError> {
        let result = async {
            let resource_group_id = parse_path_id("resourceGroupId", resource_group_id)?;
            let resolved = resolve_group_type(group_type)?;

            info!(
                resource_group_id,
                group_type = %resolved.kind,
                "request payload, DeleteResourceGroup"
            );
            let access = self.access(token, resolved);
            self.delegate(
                None,
                self.service
                    .delete_resource_group(&access, resource_group_id, resolved.kind),
            )
            .await
        }
        .await;
        log_outcome(Operation::Delete, result)
    }

    /// Report the caller's `update` permission on each requested member.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `BadRequest`, `InvalidGroupType`, `Validation` for
    /// non-positive identifiers, then `Service`/`Timeout`.
    #[tracing::instrument(skip_all, fields(operation = Operation::CheckPermissions.as_str()))]
    pub async fn check_resource_group_permissions(
        &self,
        token: SecretString,
        resource_id: &str,
        body: &[u8],
    ) -> Result<PermissionMap, DomainError> {
        let result = async {
            let user_id = self.identify(&token).await?;
            let payload = decode(body)?;
            let resource_id = parse_path_id("resourceId", resource_id)?;
            let resolved = resolve_body_group_type(&payload)?;
            let request = normalize(payload, resolved.kind, user_id, Some(resource_id));
            self.validator.validate_permission_check(&request)?;

            info!(payload = %echo(&request), "request payload, CheckResourceGroupPermissions");
            let access = self.access(token, resolved);
            self.delegate(
                Some(&request),
                self.service
                    .check_resource_group_permissions(&access, &request),
            )
            .await
        }
        .await;
        log_outcome(Operation::CheckPermissions, result)
    }

    async fn identify(&self, token: &SecretString) -> Result<i32, DomainError> {
        match self.users.get_logged_in_user(token).await {
            Ok(user_id) if user_id > 0 => Ok(user_id),
            Ok(user_id) => {
                debug!(user_id, "Token resolved to no user");
                Err(DomainError::Unauthorized)
            }
            Err(e) => {
                debug!(error = %e, "User resolution failed");
                Err(DomainError::Unauthorized)
            }
        }
    }

    fn access(&self, token: SecretString, resolved: ResolvedGroupType) -> GroupAccess {
        GroupAccess::new(token, resolved.scope, self.authorizer.clone())
    }

    /// Await a service call under the request deadline.
    async fn delegate<T>(
        &self,
        request: Option<&ResourceGroupRequest>,
        call: impl Future<Output = Result<T, ResourceGroupError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(DomainError::service(source, request.map(echo))),
            Err(_) => Err(DomainError::timeout(
                self.request_timeout,
                request.map(echo),
            )),
        }
    }
}

fn decode(body: &[u8]) -> Result<ResourceGroupPayload, DomainError> {
    serde_json::from_slice(body)
        .map_err(|e| DomainError::bad_request(format!("invalid request body: {e}")))
}

/// Group kind of a decoded body. A rejection keeps the body for the log.
fn resolve_body_group_type(
    payload: &ResourceGroupPayload,
) -> Result<ResolvedGroupType, DomainError> {
    resolve_group_type(payload.group_type_token())
        .map_err(|e| e.with_payload(serde_json::to_value(payload).unwrap_or_default()))
}

fn parse_path_id(name: &str, raw: &str) -> Result<i32, DomainError> {
    raw.parse::<i32>()
        .map_err(|e| DomainError::bad_request(format!("invalid {name} '{raw}': {e}")))
}

fn log_outcome<T>(operation: Operation, result: Result<T, DomainError>) -> Result<T, DomainError> {
    if let Err(e) = &result {
        match (e.is_client_error(), e.payload()) {
            (true, Some(payload)) => {
                warn!(operation = %operation, error = %e, payload = %payload, "request rejected");
            }
            (true, None) => warn!(operation = %operation, error = %e, "request rejected"),
            (false, Some(payload)) => {
                error!(operation = %operation, error = %e, payload = %payload, "service err");
            }
            (false, None) => error!(operation = %operation, error = %e, "service err"),
        }
    }
    result
}
