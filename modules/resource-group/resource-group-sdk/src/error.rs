//! Error types for the resource group contract.

use thiserror::Error;

/// Errors returned by the batch authorization engine.
///
/// A denial is not an error: it is a `false` entry in the result map.
#[derive(Debug, Error, Clone)]
pub enum EnforcerError {
    /// The engine is not reachable or not ready.
    #[error("enforcer unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred while evaluating policies.
    #[error("enforcer internal error: {0}")]
    Internal(String),
}

/// Errors returned while resolving the acting user.
#[derive(Debug, Error, Clone)]
pub enum UserResolverError {
    /// The token is missing, invalid or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by a [`ResourceGroupService`](crate::ResourceGroupService).
#[derive(Debug, Error, Clone)]
pub enum ResourceGroupError {
    #[error("resource group not found: {id}")]
    NotFound { id: i32 },

    #[error("resource group '{name}' already exists")]
    Conflict { name: String },

    /// The caller lacks permission on some member objects.
    #[error("access denied: {0}")]
    Forbidden(String),

    #[error("authorization failed: {0}")]
    Authorization(#[from] EnforcerError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResourceGroupError {
    #[must_use]
    pub fn not_found(id: i32) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(name: impl Into<String>) -> Self {
        Self::Conflict { name: name.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
