//! Core access model implementation.
//!
//! This module contains [`AccessModel`], which ties together the three parts
//! of the access model:
//!
//! - **Grant store**: every principal owns a [`GrantSet`] mapping role slugs
//!   and permission names to booleans.
//! - **Role catalog**: a fixed table from role slug to the permissions it
//!   confers.
//! - **Access operations**: assigning and removing roles, answering role and
//!   permission checks, and working out a principal's primary role.
//!
//! # Persistence
//!
//! Every mutation is followed by exactly one [`Storage::save_principal`]
//! call. When the save fails the error is returned unchanged, but the
//! in-memory grant set already reflects the change. Callers must treat such a
//! mutation as not durable.
//!
//! # Removal policy
//!
//! A role's permissions are written into the grant set as plain entries, so
//! removing a role has to decide what to do with permissions that another
//! held role also confers. See [`RemovalPolicy`].

#[cfg(feature = "audit")]
use log::{debug, info, warn};

use crate::{
    catalog::{RoleCatalog, STANDARD_ROLE_ORDER},
    error::{Error, Result},
    form,
    grant::GrantSet,
    metrics::AccessMetrics,
    permission::Permission,
    registry::PermissionRegistry,
    role::{Role, RoleRef},
    storage::{MemoryStorage, Storage},
    subject::Principal,
};
use std::collections::HashSet;

/// The result of a role removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The principal did not hold the role; nothing changed.
    NotFound,
    /// The role and its permissions were removed.
    Removed,
}

impl RemovalOutcome {
    /// Returns true if something was removed.
    pub fn is_removed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed)
    }
}

/// What happens to a removed role's permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(rename_all = "snake_case"))]
pub enum RemovalPolicy {
    /// Keep permissions that another role still held by the principal confers.
    #[default]
    PreserveShared,
    /// Delete every permission the role lists, even if another held role
    /// also confers it.
    StripAll,
}

/// Configuration for the access model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(default))]
pub struct AccessConfig {
    /// How role removal treats shared permissions.
    pub removal_policy: RemovalPolicy,
    /// Role slugs scanned, in order, to pick the primary role.
    pub primary_role_order: Vec<String>,
    /// Whether to emit audit log records.
    pub enable_audit: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::default(),
            primary_role_order: STANDARD_ROLE_ORDER.iter().map(|s| s.to_string()).collect(),
            enable_audit: true,
        }
    }
}

#[cfg(feature = "persistence")]
impl AccessConfig {
    /// Load configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One checkbox of the permission editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionControl {
    /// Permission name.
    pub name: &'static str,
    /// Human-readable label.
    pub description: &'static str,
    /// Form field carrying this permission.
    pub field: String,
    /// Granted directly in the principal's grant set.
    pub active: bool,
    /// Not granted, yet conferred by a role the principal holds.
    pub indeterminate: bool,
}

/// A titled group of permission checkboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGroupView {
    /// Group title.
    pub title: &'static str,
    /// Controls in display order.
    pub permissions: Vec<PermissionControl>,
}

/// The role-based access model.
pub struct AccessModel<S = MemoryStorage>
where
    S: Storage,
{
    storage: S,
    catalog: RoleCatalog,
    registry: PermissionRegistry,
    config: AccessConfig,
    metrics: AccessMetrics,
}

impl AccessModel<MemoryStorage> {
    /// Create an access model with the standard catalog and memory storage.
    pub fn new() -> Self {
        Self::with_config(AccessConfig::default())
    }

    /// Create an access model with custom configuration and memory storage.
    pub fn with_config(config: AccessConfig) -> Self {
        Self::with_storage(MemoryStorage::new(), config)
    }
}

impl<S> AccessModel<S>
where
    S: Storage,
{
    /// Create an access model over a custom storage collaborator.
    pub fn with_storage(storage: S, config: AccessConfig) -> Self {
        Self {
            storage,
            catalog: RoleCatalog::standard(),
            registry: PermissionRegistry::standard(),
            config,
            metrics: AccessMetrics::new(),
        }
    }

    /// Replace the role catalog.
    ///
    /// Fails if a role slug collides with a registered permission name.
    pub fn with_catalog(mut self, catalog: RoleCatalog) -> Result<Self> {
        catalog.validate_against(&self.registry)?;
        self.catalog = catalog;
        Ok(self)
    }

    /// Replace the permission registry used for display and validation.
    pub fn with_registry(mut self, registry: PermissionRegistry) -> Result<Self> {
        self.catalog.validate_against(&registry)?;
        self.registry = registry;
        Ok(self)
    }

    /// The role catalog.
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// The permission registry.
    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Operation counters.
    pub fn metrics(&self) -> &AccessMetrics {
        &self.metrics
    }

    /// The storage collaborator.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the storage collaborator.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Permissions conferred by `slug`; empty for unknown roles.
    pub fn permissions_for(&self, slug: &str) -> &[Permission] {
        self.catalog.permissions_for(slug)
    }

    /// Load a principal through the storage collaborator.
    pub fn load_principal(&self, id: &str) -> Result<Principal> {
        self.storage
            .load_principal(id)?
            .ok_or_else(|| Error::PrincipalNotFound(id.to_string()))
    }

    /// Load only a principal's grants.
    pub fn load_grants(&self, id: &str) -> Result<GrantSet> {
        self.storage.load_grants(id)
    }

    /// Persist a principal as-is, e.g. when creating the account.
    pub fn save_principal(&mut self, principal: &Principal) -> Result<()> {
        self.persist(principal)
    }

    /// Store role metadata.
    pub fn register_role(&mut self, role: Role) -> Result<()> {
        let slug = RoleRef::from(&role).resolve()?;

        if self.registry.contains(slug) {
            return Err(Error::InvalidConfiguration(format!(
                "Role slug '{slug}' collides with a registered permission"
            )));
        }

        self.storage.store_role(role)
    }

    /// Get role metadata.
    pub fn role(&self, slug: &str) -> Result<Option<Role>> {
        self.storage.get_role(slug)
    }

    /// Assign a role, granting its membership marker and every permission it
    /// confers, then persist.
    ///
    /// Unknown roles add only the membership marker. Assigning a role twice
    /// leaves the grant set unchanged.
    pub fn assign_role<'p, 'r>(
        &mut self,
        principal: &'p mut Principal,
        role: impl Into<RoleRef<'r>>,
    ) -> Result<&'p mut Principal> {
        let slug = role.into().resolve()?;

        let grants = principal.grants_mut();
        grants.grant(slug);
        for permission in self.catalog.permissions_for(slug) {
            grants.grant(permission.as_str());
        }

        self.persist(principal)?;
        self.metrics.record_role_assignment(principal.id());

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Role '{}' assigned to principal '{}'", slug, principal.id());
        }

        Ok(principal)
    }

    /// Remove a role and the permissions it confers, then persist.
    ///
    /// Returns [`RemovalOutcome::NotFound`] without writing anything when the
    /// grant set has no entry for the role.
    pub fn remove_role<'r>(
        &mut self,
        principal: &mut Principal,
        role: impl Into<RoleRef<'r>>,
    ) -> Result<RemovalOutcome> {
        let slug = role.into().resolve()?;

        if !principal.grants().contains_key(slug) {
            self.metrics.record_role_removal(principal.id(), false);

            #[cfg(feature = "audit")]
            if self.config.enable_audit {
                debug!("Role '{}' not held by principal '{}'", slug, principal.id());
            }

            return Ok(RemovalOutcome::NotFound);
        }

        self.strip_role(principal.grants_mut(), slug);
        self.persist(principal)?;
        self.metrics.record_role_removal(principal.id(), true);

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Role '{}' removed from principal '{}'", slug, principal.id());
        }

        Ok(RemovalOutcome::Removed)
    }

    /// Check role membership.
    ///
    /// Fails only when the role reference itself is invalid.
    pub fn in_role<'r>(&self, principal: &Principal, role: impl Into<RoleRef<'r>>) -> Result<bool> {
        let slug = role.into().resolve()?;
        Ok(self.check(principal, slug))
    }

    /// Check a single permission.
    pub fn has_permission(&self, principal: &Principal, permission: &str) -> bool {
        self.check(principal, permission)
    }

    /// The highest-priority role the principal holds, for display.
    pub fn primary_role(&self, principal: &Principal) -> Option<&str> {
        principal
            .grants()
            .first_held(&self.config.primary_role_order)
    }

    /// Every catalog role the principal holds, in priority order, followed by
    /// held roles missing from the priority list in catalog order.
    pub fn role_names(&self, principal: &Principal) -> Vec<&str> {
        let grants = principal.grants();
        let mut names: Vec<&str> = Vec::new();

        let prioritized = self
            .config
            .primary_role_order
            .iter()
            .map(String::as_str)
            .filter(|slug| self.catalog.contains(slug));

        for slug in prioritized.chain(self.catalog.slugs()) {
            if grants.has(slug) && !names.contains(&slug) {
                names.push(slug);
            }
        }

        names
    }

    /// Merge bulk permission updates into the grant set, then persist.
    ///
    /// Keys present in `updates` overwrite existing entries; every other entry
    /// is untouched.
    pub fn update_permissions(
        &mut self,
        principal: &mut Principal,
        updates: &GrantSet,
    ) -> Result<()> {
        principal.grants_mut().merge(updates);
        self.persist(principal)?;
        self.metrics.record_bulk_update(principal.id());

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!(
                "{} permission entries updated for principal '{}'",
                updates.len(),
                principal.id()
            );
        }

        Ok(())
    }

    /// Decode a submitted permission form and apply it with
    /// [`update_permissions`](Self::update_permissions).
    ///
    /// A malformed field fails the whole submission before anything changes.
    pub fn apply_form_submission<I, K, V>(
        &mut self,
        principal: &mut Principal,
        fields: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let updates = form::decode_submission(fields)?;
        self.update_permissions(principal, &updates)
    }

    /// All registered permissions grouped by category, annotated with the
    /// principal's grant state.
    pub fn permission_matrix(&self, principal: &Principal) -> Vec<PermissionGroupView> {
        let grants = principal.grants();

        self.registry
            .groups()
            .iter()
            .map(|group| PermissionGroupView {
                title: group.title,
                permissions: group
                    .permissions
                    .iter()
                    .map(|&(name, description)| {
                        let active = grants.has(name);
                        let conferred = self.catalog.conferred_by(name).any(|slug| grants.has(slug));
                        PermissionControl {
                            name,
                            description,
                            field: form::field_name(name),
                            active,
                            indeterminate: !active && conferred,
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    // Internal implementation

    fn check(&self, principal: &Principal, key: &str) -> bool {
        let granted = principal.grants().has(key);
        self.metrics.record_check(granted);

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            debug!(
                "Check '{}' for principal '{}': {}",
                key,
                principal.id(),
                if granted { "granted" } else { "denied" }
            );
        }

        granted
    }

    fn strip_role(&self, grants: &mut GrantSet, slug: &str) {
        grants.revoke(slug);

        let retained: HashSet<&str> = match self.config.removal_policy {
            RemovalPolicy::StripAll => HashSet::new(),
            RemovalPolicy::PreserveShared => self
                .catalog
                .slugs()
                .filter(|other| grants.has(other))
                .flat_map(|other| self.catalog.permissions_for(other))
                .map(Permission::as_str)
                .collect(),
        };

        for permission in self.catalog.permissions_for(slug) {
            if !retained.contains(permission.as_str()) {
                grants.revoke(permission.as_str());
            }
        }
    }

    fn persist(&mut self, principal: &Principal) -> Result<()> {
        if let Err(error) = self.storage.save_principal(principal) {
            self.metrics.record_persistence_failure();

            #[cfg(feature = "audit")]
            if self.config.enable_audit {
                warn!("Failed to persist principal '{}': {}", principal.id(), error);
            }

            return Err(error);
        }

        Ok(())
    }
}

impl Default for AccessModel<MemoryStorage> {
    fn default() -> Self {
        Self::new()
    }
}
