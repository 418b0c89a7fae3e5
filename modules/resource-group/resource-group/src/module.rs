//! Module wiring: config and collaborators in, router out.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderName;
use tracing::info;

use crate::api::rest::handlers::ApiState;
use crate::api::rest::routes;
use crate::config::ResourceGroupConfig;
use crate::domain::dispatcher::{Collaborators, ResourceGroupDispatcher};

/// The resource group module.
pub struct ResourceGroupModule {
    state: Arc<ApiState>,
}

impl ResourceGroupModule {
    /// Build the module from its configuration and injected collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured token header is not a valid
    /// header name.
    pub fn new(config: &ResourceGroupConfig, collaborators: Collaborators) -> anyhow::Result<Self> {
        let token_header = HeaderName::try_from(config.token_header.as_str())
            .with_context(|| format!("invalid token_header '{}'", config.token_header))?;

        let dispatcher = Arc::new(ResourceGroupDispatcher::new(config, collaborators));
        info!(
            token_header = %token_header,
            request_timeout_ms = config.request_timeout_ms,
            "Resource group module initialized"
        );

        Ok(Self {
            state: Arc::new(ApiState {
                dispatcher,
                token_header,
            }),
        })
    }

    #[must_use]
    pub fn dispatcher(&self) -> Arc<ResourceGroupDispatcher> {
        Arc::clone(&self.state.dispatcher)
    }

    /// REST routes under `/resource-group/v1`.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(Arc::clone(&self.state))
    }
}
