#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Resource group module.
//!
//! Classifies each request by group kind (application or environment),
//! resolves the batch authorization scope for that kind, projects legacy
//! request fields, validates, and delegates to an injected
//! [`ResourceGroupService`](resource_group_sdk::ResourceGroupService).
//!
//! The [`infra`] module ships static collaborators and an in-memory store for
//! running the module standalone.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ResourceGroupConfig, StaticAuthNConfig, StaticAuthZConfig};
pub use domain::dispatcher::{Collaborators, Operation, ResourceGroupDispatcher};
pub use domain::error::DomainError;
pub use domain::group_type::{ResolvedGroupType, resolve_group_type};
pub use module::ResourceGroupModule;
