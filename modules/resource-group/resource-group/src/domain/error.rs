use std::time::Duration;

use resource_group_sdk::ResourceGroupError;
use serde_json::Value;
use thiserror::Error;

/// A single rejected field of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failures surfaced by the resource group dispatcher.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unauthorized user")]
    Unauthorized,

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("invalid resource group type: '{token}'")]
    InvalidGroupType {
        token: String,
        payload: Option<Value>,
    },

    #[error("validation failed: {}", summarize(.violations))]
    Validation {
        violations: Vec<FieldViolation>,
        payload: Value,
    },

    #[error("service error: {source}")]
    Service {
        #[source]
        source: ResourceGroupError,
        payload: Option<Value>,
    },

    #[error("service call exceeded {}ms", .timeout.as_millis())]
    Timeout {
        timeout: Duration,
        payload: Option<Value>,
    },
}

impl DomainError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn invalid_group_type(token: impl Into<String>) -> Self {
        Self::InvalidGroupType {
            token: token.into(),
            payload: None,
        }
    }

    /// Attach the decoded request body to a group kind rejection.
    #[must_use]
    pub fn with_payload(self, payload: Value) -> Self {
        match self {
            Self::InvalidGroupType { token, .. } => Self::InvalidGroupType {
                token,
                payload: Some(payload),
            },
            other => other,
        }
    }

    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>, payload: Value) -> Self {
        Self::Validation {
            violations,
            payload,
        }
    }

    #[must_use]
    pub fn service(source: ResourceGroupError, payload: Option<Value>) -> Self {
        Self::Service { source, payload }
    }

    #[must_use]
    pub fn timeout(timeout: Duration, payload: Option<Value>) -> Self {
        Self::Timeout { timeout, payload }
    }

    /// Request payload associated with the failure, when one was decoded.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Validation { payload, .. } => Some(payload),
            Self::InvalidGroupType { payload, .. }
            | Self::Service { payload, .. }
            | Self::Timeout { payload, .. } => payload.as_ref(),
            Self::Unauthorized | Self::BadRequest { .. } => None,
        }
    }

    /// Whether the failure is the caller's fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Service { .. } | Self::Timeout { .. })
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
