//! Configuration for the resource group module and its static collaborators.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceGroupConfig {
    /// Request header carrying the credential token.
    pub token_header: String,

    /// Deadline for one service call, in milliseconds.
    pub request_timeout_ms: u64,

    /// Maximum group name length, in characters.
    pub max_name_length: usize,

    /// Maximum group description length, in characters.
    pub max_description_length: usize,
}

impl Default for ResourceGroupConfig {
    fn default() -> Self {
        Self {
            token_header: "token".to_owned(),
            request_timeout_ms: 30_000,
            max_name_length: 30,
            max_description_length: 50,
        }
    }
}

impl ResourceGroupConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Static user resolver configuration.
///
/// ```yaml
/// static_authn:
///   mode: static_tokens
///   tokens:
///     - token: "admin-token"
///       user_id: 2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthNConfig {
    pub mode: AuthNMode,

    /// User returned for any non-empty token in `accept_all` mode.
    pub default_user_id: i32,

    /// Token-to-user mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticAuthNConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::AcceptAll,
            default_user_id: 1,
            tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Accept any non-empty token and return the default user.
    #[default]
    AcceptAll,
    /// Map specific tokens to specific users.
    StaticTokens,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    pub token: String,
    pub user_id: i32,
}

/// Static enforcer configuration.
///
/// ```yaml
/// static_authz:
///   mode: policies
///   policies:
///     - token: "viewer-token"
///       resource: "applications"
///       action: "get"
///       objects: ["1", "2"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthZConfig {
    pub mode: AuthZMode,
    pub policies: Vec<PolicyRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthZMode {
    /// Allow every object.
    #[default]
    AllowAll,
    /// Allow an object only when some policy rule matches it.
    Policies,
}

/// One allow rule. Every field accepts `*` as a wildcard and defaults to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyRule {
    #[serde(default = "wildcard")]
    pub token: String,
    #[serde(default = "wildcard")]
    pub resource: String,
    #[serde(default = "wildcard")]
    pub action: String,
    #[serde(default = "wildcard_objects")]
    pub objects: Vec<String>,
}

pub(crate) const WILDCARD: &str = "*";

fn wildcard() -> String {
    WILDCARD.to_owned()
}

fn wildcard_objects() -> Vec<String> {
    vec![wildcard()]
}
