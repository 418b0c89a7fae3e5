#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Recording collaborators for dispatcher and REST tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use resource_group_sdk::{
    AuthScope, Enforcer, EnforcerError, GroupAccess, PermissionMap, ResourceGroup,
    ResourceGroupError, ResourceGroupRequest, ResourceGroupService, ResourceGroupType,
    UserResolver, UserResolverError, actions,
};
use secrecy::SecretString;

/// Resolves every token to the same user, or rejects every token.
pub struct FixedUserResolver {
    user: Option<i32>,
}

impl FixedUserResolver {
    pub fn new(user: Option<i32>) -> Self {
        Self { user }
    }
}

#[async_trait]
impl UserResolver for FixedUserResolver {
    async fn get_logged_in_user(&self, _token: &SecretString) -> Result<i32, UserResolverError> {
        self.user
            .ok_or_else(|| UserResolverError::Unauthorized("unknown token".to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforceCall {
    pub resource: String,
    pub action: String,
    pub objects: Vec<String>,
}

/// Allows even object ids, denies odd ones, records each batch.
#[derive(Default)]
pub struct AllowEvenEnforcer {
    calls: Mutex<Vec<EnforceCall>>,
}

impl AllowEvenEnforcer {
    pub fn calls(&self) -> Vec<EnforceCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Enforcer for AllowEvenEnforcer {
    async fn enforce_in_batch(
        &self,
        _token: &SecretString,
        resource: &str,
        action: &str,
        objects: &[String],
    ) -> Result<HashMap<String, bool>, EnforcerError> {
        self.calls.lock().unwrap().push(EnforceCall {
            resource: resource.to_owned(),
            action: action.to_owned(),
            objects: objects.to_vec(),
        });
        Ok(objects
            .iter()
            .map(|o| (o.clone(), o.parse::<i32>().is_ok_and(|id| id % 2 == 0)))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    List {
        scope: AuthScope,
        parent_resource_id: i32,
        group_type: ResourceGroupType,
    },
    Create {
        scope: AuthScope,
        request: ResourceGroupRequest,
    },
    Update {
        scope: AuthScope,
        request: ResourceGroupRequest,
    },
    Delete {
        scope: AuthScope,
        id: i32,
        group_type: ResourceGroupType,
    },
    CheckPermissions {
        scope: AuthScope,
        request: ResourceGroupRequest,
    },
}

/// Records every call. Permission checks go through the access handle so the
/// enforcer sees them.
#[derive(Default)]
pub struct RecordingService {
    calls: Mutex<Vec<ServiceCall>>,
    failure: Mutex<Option<ResourceGroupError>>,
}

impl RecordingService {
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_next(&self, error: ResourceGroupError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    fn record(&self, call: ServiceCall) -> Result<(), ResourceGroupError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn stored(request: &ResourceGroupRequest, id: i32) -> ResourceGroup {
    ResourceGroup {
        id,
        name: request.name.clone(),
        description: request.description.clone(),
        resource_ids: request.resource_ids.clone(),
        active: true,
        parent_resource_id: request.parent_resource_id,
        group_type: request.group_type,
        created_by: request.user_id,
        updated_by: request.user_id,
    }
}

#[async_trait]
impl ResourceGroupService for RecordingService {
    async fn get_active_resource_group_list(
        &self,
        access: &GroupAccess,
        parent_resource_id: i32,
        group_type: ResourceGroupType,
    ) -> Result<Vec<ResourceGroup>, ResourceGroupError> {
        self.record(ServiceCall::List {
            scope: access.scope(),
            parent_resource_id,
            group_type,
        })?;
        Ok(Vec::new())
    }

    async fn create_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        self.record(ServiceCall::Create {
            scope: access.scope(),
            request: request.clone(),
        })?;
        Ok(stored(request, 1))
    }

    async fn update_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        self.record(ServiceCall::Update {
            scope: access.scope(),
            request: request.clone(),
        })?;
        Ok(stored(request, request.id))
    }

    async fn delete_resource_group(
        &self,
        access: &GroupAccess,
        id: i32,
        group_type: ResourceGroupType,
    ) -> Result<bool, ResourceGroupError> {
        self.record(ServiceCall::Delete {
            scope: access.scope(),
            id,
            group_type,
        })?;
        Ok(true)
    }

    async fn check_resource_group_permissions(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<PermissionMap, ResourceGroupError> {
        self.record(ServiceCall::CheckPermissions {
            scope: access.scope(),
            request: request.clone(),
        })?;
        Ok(access
            .check_batch(&request.member_objects(), actions::UPDATE)
            .await?)
    }
}

/// Sleeps before every answer.
pub struct SlowService {
    delay: Duration,
}

impl SlowService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ResourceGroupService for SlowService {
    async fn get_active_resource_group_list(
        &self,
        _access: &GroupAccess,
        _parent_resource_id: i32,
        _group_type: ResourceGroupType,
    ) -> Result<Vec<ResourceGroup>, ResourceGroupError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn create_resource_group(
        &self,
        _access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        tokio::time::sleep(self.delay).await;
        Ok(stored(request, 1))
    }

    async fn update_resource_group(
        &self,
        _access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        tokio::time::sleep(self.delay).await;
        Ok(stored(request, request.id))
    }

    async fn delete_resource_group(
        &self,
        _access: &GroupAccess,
        _id: i32,
        _group_type: ResourceGroupType,
    ) -> Result<bool, ResourceGroupError> {
        tokio::time::sleep(self.delay).await;
        Ok(true)
    }

    async fn check_resource_group_permissions(
        &self,
        _access: &GroupAccess,
        _request: &ResourceGroupRequest,
    ) -> Result<PermissionMap, ResourceGroupError> {
        tokio::time::sleep(self.delay).await;
        Ok(PermissionMap::new())
    }
}
