//! Static [`UserResolver`] for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use resource_group_sdk::{UserResolver, UserResolverError};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{AuthNMode, StaticAuthNConfig};

/// Token-to-user mapping driven by configuration:
/// - `accept_all`: any non-empty token maps to the default user
/// - `static_tokens`: only listed tokens map, each to its own user
#[derive(Debug)]
pub struct StaticUserResolver {
    mode: AuthNMode,
    default_user_id: i32,
    token_map: HashMap<String, i32>,
}

impl StaticUserResolver {
    #[must_use]
    pub fn from_config(cfg: &StaticAuthNConfig) -> Self {
        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.user_id))
            .collect();

        Self {
            mode: cfg.mode.clone(),
            default_user_id: cfg.default_user_id,
            token_map,
        }
    }

    fn resolve(&self, token: &str) -> Option<i32> {
        if token.is_empty() {
            return None;
        }
        match self.mode {
            AuthNMode::AcceptAll => Some(self.default_user_id),
            AuthNMode::StaticTokens => self.token_map.get(token).copied(),
        }
    }
}

#[async_trait]
impl UserResolver for StaticUserResolver {
    async fn get_logged_in_user(&self, token: &SecretString) -> Result<i32, UserResolverError> {
        self.resolve(token.expose_secret())
            .ok_or_else(|| UserResolverError::Unauthorized("token not recognized".to_owned()))
    }
}
