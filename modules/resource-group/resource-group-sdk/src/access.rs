//! Per-kind batch authorization.
//!
//! A group kind maps to an [`AuthScope`]. The scope travels with the request
//! inside a [`GroupAccess`]; the actual engine call is picked from the scope
//! when a check is made, so the request itself stays plain data.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use crate::api::Enforcer;
use crate::error::EnforcerError;

/// Object id → allowed. Absent ids were not evaluated.
pub type PermissionMap = HashMap<String, bool>;

/// Action names passed to the enforcer.
pub mod actions {
    pub const GET: &str = "get";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

/// Authorization scope of a group's member objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScope {
    /// Members are applications.
    Application,
    /// Members are environments.
    Environment,
}

impl AuthScope {
    /// Enforcer resource name for objects in this scope.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Application => "applications",
            Self::Environment => "environment",
        }
    }
}

/// Runs batch checks against the enforcer for a given scope.
///
/// Cheap to clone (`Arc` inside).
#[derive(Clone)]
pub struct BatchAuthorizer {
    enforcer: Arc<dyn Enforcer>,
}

impl fmt::Debug for BatchAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchAuthorizer").finish_non_exhaustive()
    }
}

impl BatchAuthorizer {
    #[must_use]
    pub fn new(enforcer: Arc<dyn Enforcer>) -> Self {
        Self { enforcer }
    }

    /// Check application objects.
    ///
    /// # Errors
    ///
    /// Propagates the enforcer's failure.
    pub async fn check_app_auth_batch(
        &self,
        token: &SecretString,
        app_objects: &[String],
        action: &str,
    ) -> Result<PermissionMap, EnforcerError> {
        self.check(AuthScope::Application, token, app_objects, action)
            .await
    }

    /// Check environment objects.
    ///
    /// # Errors
    ///
    /// Propagates the enforcer's failure.
    pub async fn check_env_auth_batch(
        &self,
        token: &SecretString,
        env_objects: &[String],
        action: &str,
    ) -> Result<PermissionMap, EnforcerError> {
        self.check(AuthScope::Environment, token, env_objects, action)
            .await
    }

    /// Check `objects` in `scope`. An empty batch returns an empty map
    /// without calling the enforcer.
    ///
    /// # Errors
    ///
    /// Propagates the enforcer's failure.
    pub async fn check(
        &self,
        scope: AuthScope,
        token: &SecretString,
        objects: &[String],
        action: &str,
    ) -> Result<PermissionMap, EnforcerError> {
        if objects.is_empty() {
            return Ok(PermissionMap::new());
        }
        tracing::debug!(
            resource = scope.resource(),
            action,
            count = objects.len(),
            "Enforcing batch"
        );
        self.enforcer
            .enforce_in_batch(token, scope.resource(), action, objects)
            .await
    }
}

/// Caller credentials plus the authorization scope resolved for a request.
#[derive(Debug)]
pub struct GroupAccess {
    token: SecretString,
    scope: AuthScope,
    authorizer: BatchAuthorizer,
}

impl GroupAccess {
    #[must_use]
    pub fn new(token: SecretString, scope: AuthScope, authorizer: BatchAuthorizer) -> Self {
        Self {
            token,
            scope,
            authorizer,
        }
    }

    #[must_use]
    pub fn scope(&self) -> AuthScope {
        self.scope
    }

    /// Opaque credential, forwarded as received.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Check `objects` in this request's scope.
    ///
    /// # Errors
    ///
    /// Propagates the enforcer's failure.
    pub async fn check_batch(
        &self,
        objects: &[String],
        action: &str,
    ) -> Result<PermissionMap, EnforcerError> {
        self.authorizer
            .check(self.scope, &self.token, objects, action)
            .await
    }
}
