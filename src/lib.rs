//! # Access Model
//!
//! This crate provides the role-based access model of a content-management
//! admin panel: a fixed catalog of named roles, each conferring a list of
//! permission names, and a flat per-user grant store that answers role and
//! permission checks with one lookup.
//!
//! ## Features
//!
//! - Flat grant sets: role slugs and permission names share one namespace
//! - A standard five-role catalog, replaceable with a custom one
//! - Role assignment and removal with a configurable removal policy
//! - Primary-role resolution in configurable priority order
//! - Bulk permission updates and permission-editor form decoding
//! - A grouped permission registry for building editors
//! - Pluggable persistence with in-memory and JSON file storage
//! - Audit logging of grant changes and checks
//! - Thread-safe operation counters
//!
//! ## Quick Start
//!
//! ```rust
//! use access_model::{AccessModel, Principal};
//!
//! let mut model = AccessModel::new();
//! let mut user = Principal::new("editor@admin.com");
//!
//! model.assign_role(&mut user, "editor")?;
//!
//! assert!(model.in_role(&user, "editor")?);
//! assert!(model.has_permission(&user, "publish stories"));
//! assert!(!model.has_permission(&user, "delete users"));
//! assert_eq!(model.primary_role(&user), Some("editor"));
//! # Ok::<(), access_model::Error>(())
//! ```
//!
//! ## Audit Logging
//!
//! When the `audit` feature is enabled, the access model logs grant changes
//! using the standard Rust logging framework. To enable logging:
//!
//! ```rust
//! use access_model::init_audit_logger;
//!
//! // Initialize logging (must be called early in program execution)
//! init_audit_logger();
//!
//! // Configure log level through RUST_LOG environment variable:
//! // RUST_LOG=info,access_model=debug
//! ```
//!
//! The following events are logged:
//! - Role assignments and removals
//! - Bulk permission updates
//! - Role and permission checks (at debug level)
//! - Failed saves (at warn level)
//!

#[cfg(feature = "audit")]
pub fn init_audit_logger() {
    env_logger::init();
}

pub mod batch;
pub mod catalog;
pub mod core;
pub mod error;
pub mod form;
pub mod grant;
pub mod macros;
pub mod metrics;
pub mod permission;
pub mod registry;
pub mod role;
pub mod storage;
pub mod subject;

// Re-export main types for convenience
pub use crate::{
    batch::{BatchOperations, BatchResult, BatchRoleOperation, RoleChange},
    catalog::{CatalogEntry, RoleCatalog, STANDARD_ROLE_ORDER},
    core::{
        AccessConfig, AccessModel, PermissionControl, PermissionGroupView, RemovalOutcome,
        RemovalPolicy,
    },
    error::{Error, Result},
    grant::GrantSet,
    metrics::{AccessMetrics, MetricsSnapshot},
    permission::{Permission, PermissionDescriptor},
    registry::{PermissionGroup, PermissionRegistry},
    role::{Role, RoleBuilder, RoleHandle, RoleRef},
    storage::{MemoryStorage, Storage},
    subject::Principal,
};

#[cfg(feature = "persistence")]
pub use crate::storage::FileStorage;
