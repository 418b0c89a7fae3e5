//! Development collaborators: static user resolution, static policy
//! enforcement and an in-memory store.

pub mod memory_service;
pub mod static_authn;
pub mod static_authz;

pub use memory_service::InMemoryResourceGroupService;
pub use static_authn::StaticUserResolver;
pub use static_authz::StaticEnforcer;
