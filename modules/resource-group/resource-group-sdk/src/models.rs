//! Resource group models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::access::AuthScope;

/// Canonical group kind.
///
/// Wire tokens are `app-group` and `env-group`. Older clients omit the field
/// entirely; the dispatcher treats that as `AppGroup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceGroupType {
    #[serde(rename = "app-group")]
    AppGroup,
    #[serde(rename = "env-group")]
    EnvGroup,
}

impl ResourceGroupType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppGroup => "app-group",
            Self::EnvGroup => "env-group",
        }
    }

    /// Authorization scope the members of this kind of group are checked in.
    #[must_use]
    pub const fn auth_scope(self) -> AuthScope {
        match self {
            Self::AppGroup => AuthScope::Application,
            Self::EnvGroup => AuthScope::Environment,
        }
    }
}

impl fmt::Display for ResourceGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body of create, update and permission-check calls, as sent.
///
/// `group_type` is kept as the raw token so an unknown kind is reported as
/// such instead of as a malformed body. `environment_id` and `app_ids` are
/// legacy aliases that only apply to application groups. An explicit `null`
/// in a scalar field reads the same as an omitted one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceGroupPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub resource_ids: Option<Vec<i32>>,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub environment_id: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_resource_id: i32,
    pub group_type: Option<String>,
    pub app_ids: Option<Vec<i32>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ResourceGroupPayload {
    /// Group kind token, empty when the client omitted it.
    #[must_use]
    pub fn group_type_token(&self) -> &str {
        self.group_type.as_deref().unwrap_or_default()
    }
}

/// Normalized request handed to the [`ResourceGroupService`](crate::ResourceGroupService).
///
/// Built by the dispatcher from a [`ResourceGroupPayload`] once the group
/// kind is resolved and legacy fields are projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupRequest {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub resource_ids: Vec<i32>,
    pub active: bool,
    #[serde(skip)]
    pub user_id: i32,
    pub environment_id: i32,
    pub parent_resource_id: i32,
    pub group_type: ResourceGroupType,
    pub app_ids: Vec<i32>,
}

impl ResourceGroupRequest {
    /// Member identifiers as authorization object ids.
    #[must_use]
    pub fn member_objects(&self) -> Vec<String> {
        self.resource_ids.iter().map(ToString::to_string).collect()
    }
}

/// A stored resource group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub resource_ids: Vec<i32>,
    pub active: bool,
    pub parent_resource_id: i32,
    pub group_type: ResourceGroupType,
    pub created_by: i32,
    pub updated_by: i32,
}
