//! Checks on normalized requests.

use std::sync::LazyLock;

use regex::Regex;
use resource_group_sdk::ResourceGroupRequest;

use crate::config::ResourceGroupConfig;
use crate::domain::error::{DomainError, FieldViolation};

/// Validates normalized requests against the configured limits.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    max_name_length: usize,
    max_description_length: usize,
}

impl RequestValidator {
    #[must_use]
    pub fn from_config(config: &ResourceGroupConfig) -> Self {
        Self {
            max_name_length: config.max_name_length,
            max_description_length: config.max_description_length,
        }
    }

    /// Validate a create request.
    ///
    /// # Errors
    ///
    /// Returns `Validation` listing every violated field, with the request echoed.
    pub fn validate_create(&self, request: &ResourceGroupRequest) -> Result<(), DomainError> {
        let violations = self.group_violations(request);
        finish(violations, request)
    }

    /// Validate an update request. Same rules as create, plus a target id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` listing every violated field, with the request echoed.
    pub fn validate_update(&self, request: &ResourceGroupRequest) -> Result<(), DomainError> {
        let mut violations = Vec::new();
        if request.id <= 0 {
            violations.push(FieldViolation::new("id", "must be a positive integer"));
        }
        violations.extend(self.group_violations(request));
        finish(violations, request)
    }

    /// Validate a permission check. Only the identifiers matter there.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when an identifier is not positive.
    pub fn validate_permission_check(
        &self,
        request: &ResourceGroupRequest,
    ) -> Result<(), DomainError> {
        let mut violations = Vec::new();
        check_parent(request, &mut violations);
        check_member_ids(request, &mut violations);
        finish(violations, request)
    }

    fn group_violations(&self, request: &ResourceGroupRequest) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        let name_length = request.name.chars().count();
        if name_length == 0 {
            violations.push(FieldViolation::new("name", "is required"));
        } else if name_length > self.max_name_length {
            violations.push(FieldViolation::new(
                "name",
                format!("exceeds maximum length of {}", self.max_name_length),
            ));
        } else if !is_name_component(&request.name) {
            violations.push(FieldViolation::new(
                "name",
                "must be lowercase alphanumeric segments separated by '.' or '-'",
            ));
        }

        if request.description.chars().count() > self.max_description_length {
            violations.push(FieldViolation::new(
                "description",
                format!("exceeds maximum length of {}", self.max_description_length),
            ));
        }

        check_parent(request, &mut violations);
        if request.resource_ids.is_empty() {
            violations.push(FieldViolation::new("resourceIds", "must not be empty"));
        }
        check_member_ids(request, &mut violations);

        violations
    }
}

fn check_parent(request: &ResourceGroupRequest, violations: &mut Vec<FieldViolation>) {
    if request.parent_resource_id <= 0 {
        violations.push(FieldViolation::new(
            "parentResourceId",
            "must be a positive integer",
        ));
    }
}

fn check_member_ids(request: &ResourceGroupRequest, violations: &mut Vec<FieldViolation>) {
    if request.resource_ids.iter().any(|&id| id <= 0) {
        violations.push(FieldViolation::new(
            "resourceIds",
            "must contain only positive integers",
        ));
    }
}

fn finish(
    violations: Vec<FieldViolation>,
    request: &ResourceGroupRequest,
) -> Result<(), DomainError> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(DomainError::validation(violations, echo(request)))
}

/// JSON form of a request for logs and error bodies.
pub(crate) fn echo(request: &ResourceGroupRequest) -> serde_json::Value {
    serde_json::to_value(request).unwrap_or_default()
}

static NAME_COMPONENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[.-][a-z0-9]+)*$").ok());

fn is_name_component(name: &str) -> bool {
    NAME_COMPONENT
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name))
}
