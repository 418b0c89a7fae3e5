//! RFC 9457 problem responses.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use resource_group_sdk::ResourceGroupError;
use serde::Serialize;
use serde_json::Value;

use crate::domain::error::{DomainError, FieldViolation};

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Problem details body.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ProblemViolation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemViolation {
    pub field: String,
    pub message: String,
}

impl From<&FieldViolation> for ProblemViolation {
    fn from(v: &FieldViolation) -> Self {
        Self {
            field: v.field.to_owned(),
            message: v.message.clone(),
        }
    }
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            trace_id: None,
            errors: Vec::new(),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Map a dispatcher error to a problem response.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::Unauthorized => Problem::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Unauthorized User",
        ),
        DomainError::BadRequest { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Bad Request", message.clone())
        }
        DomainError::InvalidGroupType { token, .. } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Invalid Group Type",
            format!("invalid group type {token}"),
        ),
        DomainError::Validation {
            violations,
            payload,
        } => Problem {
            errors: violations.iter().map(ProblemViolation::from).collect(),
            payload: Some(payload.clone()),
            ..Problem::new(StatusCode::BAD_REQUEST, "Validation Error", e.to_string())
        },
        // Store errors keep their message; the status stays 500 for every kind.
        DomainError::Service { source, .. } => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            service_title(source),
            source.to_string(),
        ),
        DomainError::Timeout { .. } => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Service Timeout",
            e.to_string(),
        ),
    };

    problem.with_instance(instance).with_trace_id(trace_id)
}

fn service_title(source: &ResourceGroupError) -> &'static str {
    match source {
        ResourceGroupError::NotFound { .. } => "Resource Group Not Found",
        ResourceGroupError::Conflict { .. } => "Resource Group Conflict",
        ResourceGroupError::Forbidden(_) => "Access Denied",
        ResourceGroupError::Authorization(_) => "Authorization Failed",
        ResourceGroupError::Internal(_) => "Internal Server Error",
    }
}

/// Implement Into<Problem> for `DomainError` so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "")
    }
}
