//! Collaborator traits consumed by the resource group dispatcher.
//!
//! The dispatcher receives each of these as an `Arc<dyn ...>` at
//! construction time. None of them is looked up from global state.

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::access::{GroupAccess, PermissionMap};
use crate::error::{EnforcerError, ResourceGroupError, UserResolverError};
use crate::models::{ResourceGroup, ResourceGroupRequest, ResourceGroupType};

/// Resolves the acting user behind a credential token.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Return the id of the logged-in user. An id of `0` means "no user".
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token does not identify a user
    /// - `Internal` for unexpected errors
    async fn get_logged_in_user(&self, token: &SecretString) -> Result<i32, UserResolverError>;
}

/// Batch authorization engine.
#[async_trait]
pub trait Enforcer: Send + Sync {
    /// Evaluate `action` on every object of `resource` for the token holder.
    ///
    /// The returned map is keyed by object id. Objects missing from the map
    /// were not evaluated; they are not implicitly denied.
    ///
    /// # Errors
    ///
    /// Returns `EnforcerError` when the engine cannot evaluate the batch.
    async fn enforce_in_batch(
        &self,
        token: &SecretString,
        resource: &str,
        action: &str,
        objects: &[String],
    ) -> Result<HashMap<String, bool>, EnforcerError>;
}

/// Resource group store.
///
/// Every call receives a [`GroupAccess`] carrying the caller's token and the
/// authorization scope of the group kind, so implementations can run
/// object-level batch checks without knowing which kind they serve.
#[async_trait]
pub trait ResourceGroupService: Send + Sync {
    /// # Errors
    ///
    /// Returns `ResourceGroupError` on store or authorization failure.
    async fn get_active_resource_group_list(
        &self,
        access: &GroupAccess,
        parent_resource_id: i32,
        group_type: ResourceGroupType,
    ) -> Result<Vec<ResourceGroup>, ResourceGroupError>;

    /// # Errors
    ///
    /// Returns `ResourceGroupError` on store or authorization failure.
    async fn create_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError>;

    /// # Errors
    ///
    /// Returns `ResourceGroupError` on store or authorization failure.
    async fn update_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError>;

    /// # Errors
    ///
    /// Returns `ResourceGroupError` on store or authorization failure.
    async fn delete_resource_group(
        &self,
        access: &GroupAccess,
        resource_group_id: i32,
        group_type: ResourceGroupType,
    ) -> Result<bool, ResourceGroupError>;

    /// Evaluate the caller's permissions on the request's members.
    /// Must not modify stored state.
    ///
    /// # Errors
    ///
    /// Returns `ResourceGroupError` on authorization failure.
    async fn check_resource_group_permissions(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<PermissionMap, ResourceGroupError>;
}
