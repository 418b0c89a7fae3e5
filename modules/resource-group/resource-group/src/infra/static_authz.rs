//! Static [`Enforcer`] for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use resource_group_sdk::{Enforcer, EnforcerError};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{AuthZMode, PolicyRule, StaticAuthZConfig, WILDCARD};

/// Evaluates batches against a fixed rule list.
///
/// Every object of a batch gets an entry in the result.
#[derive(Debug)]
pub struct StaticEnforcer {
    mode: AuthZMode,
    policies: Vec<PolicyRule>,
}

impl StaticEnforcer {
    #[must_use]
    pub fn from_config(cfg: &StaticAuthZConfig) -> Self {
        Self {
            mode: cfg.mode.clone(),
            policies: cfg.policies.clone(),
        }
    }

    fn allows(&self, token: &str, resource: &str, action: &str, object: &str) -> bool {
        match self.mode {
            AuthZMode::AllowAll => true,
            AuthZMode::Policies => self
                .policies
                .iter()
                .any(|rule| rule.matches(token, resource, action, object)),
        }
    }
}

impl PolicyRule {
    fn matches(&self, token: &str, resource: &str, action: &str, object: &str) -> bool {
        matches_field(&self.token, token)
            && matches_field(&self.resource, resource)
            && matches_field(&self.action, action)
            && self.objects.iter().any(|o| matches_field(o, object))
    }
}

fn matches_field(pattern: &str, value: &str) -> bool {
    pattern == WILDCARD || pattern == value
}

#[async_trait]
impl Enforcer for StaticEnforcer {
    async fn enforce_in_batch(
        &self,
        token: &SecretString,
        resource: &str,
        action: &str,
        objects: &[String],
    ) -> Result<HashMap<String, bool>, EnforcerError> {
        let token = token.expose_secret();
        Ok(objects
            .iter()
            .map(|object| {
                (
                    object.clone(),
                    self.allows(token, resource, action, object),
                )
            })
            .collect())
    }
}
