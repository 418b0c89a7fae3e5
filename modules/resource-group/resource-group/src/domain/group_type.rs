//! Group kind resolution.
//!
//! Every entry point turns the caller's group-type token into a canonical
//! [`ResourceGroupType`] and the [`AuthScope`] its members are checked in.
//! The legacy empty token predates environment groups and therefore means
//! an application group.

use resource_group_sdk::{AuthScope, ResourceGroupType};

use crate::domain::error::DomainError;

const APP_GROUP: &str = "app-group";
const ENV_GROUP: &str = "env-group";

/// Canonical kind plus the authorization scope selected for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGroupType {
    pub kind: ResourceGroupType,
    pub scope: AuthScope,
}

impl From<ResourceGroupType> for ResolvedGroupType {
    fn from(kind: ResourceGroupType) -> Self {
        Self {
            kind,
            scope: kind.auth_scope(),
        }
    }
}

/// Resolve a group-type token.
///
/// # Errors
///
/// Returns `InvalidGroupType` carrying the token when it is neither empty nor
/// one of the known kinds.
pub fn resolve_group_type(token: &str) -> Result<ResolvedGroupType, DomainError> {
    match token {
        ENV_GROUP => Ok(ResourceGroupType::EnvGroup.into()),
        "" | APP_GROUP => Ok(ResourceGroupType::AppGroup.into()),
        other => Err(DomainError::invalid_group_type(other)),
    }
}
