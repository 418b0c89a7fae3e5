#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Resource Group SDK
//!
//! This crate provides the public contract of the `resource_group` module:
//!
//! - [`ResourceGroupService`] - store operations the dispatcher delegates to
//! - [`UserResolver`] - resolves the acting user from a credential token
//! - [`Enforcer`] - batch authorization engine
//! - [`ResourceGroupPayload`], [`ResourceGroupRequest`], [`ResourceGroup`] - models
//! - [`AuthScope`], [`BatchAuthorizer`], [`GroupAccess`] - per-kind batch checks
//! - [`ResourceGroupError`], [`EnforcerError`], [`UserResolverError`] - errors
//!
//! ## Usage
//!
//! ```ignore
//! use resource_group_sdk::{GroupAccess, ResourceGroupService, actions};
//!
//! async fn member_permissions(access: &GroupAccess, ids: &[i32]) {
//!     let objects: Vec<String> = ids.iter().map(ToString::to_string).collect();
//!     // Dispatches to the application or environment check depending on
//!     // the scope the dispatcher resolved for this request.
//!     let allowed = access.check_batch(&objects, actions::UPDATE).await?;
//! }
//! ```

pub mod access;
pub mod api;
pub mod error;
pub mod models;

pub use access::{AuthScope, BatchAuthorizer, GroupAccess, PermissionMap, actions};
pub use api::{Enforcer, ResourceGroupService, UserResolver};
pub use error::{EnforcerError, ResourceGroupError, UserResolverError};
pub use models::{ResourceGroup, ResourceGroupPayload, ResourceGroupRequest, ResourceGroupType};
