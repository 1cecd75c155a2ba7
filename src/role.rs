//! Role metadata and role references.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Anything that can name a role by its slug.
pub trait RoleHandle {
    /// The role's slug.
    fn slug(&self) -> &str;
}

/// A role's display record, as kept by the storage collaborator.
///
/// The permissions a role confers live in the [`RoleCatalog`](crate::catalog::RoleCatalog),
/// not here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct Role {
    /// Unique slug, also used as the grant key for membership.
    slug: String,
    /// Human-readable name of the role.
    name: String,
    /// Optional description of the role.
    description: Option<String>,
    /// Metadata associated with the role.
    #[cfg_attr(feature = "persistence", serde(default))]
    metadata: HashMap<String, String>,
}

impl Role {
    /// Create a new role whose display name is its slug.
    pub fn new(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            name: slug.clone(),
            slug,
            description: None,
            metadata: HashMap::new(),
        }
    }

    /// Get the role's slug.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the role's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the role's description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the role's description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Set metadata for this role.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get metadata value for a key.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// Get all metadata.
    pub fn all_metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

impl RoleHandle for Role {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// A reference to a role: either a raw slug or a value exposing one.
///
/// Every access operation resolves its role argument once, up front, through
/// [`RoleRef::resolve`].
#[derive(Clone, Copy)]
pub enum RoleRef<'a> {
    /// A bare slug.
    Slug(&'a str),
    /// A role-like value.
    Handle(&'a dyn RoleHandle),
}

impl<'a> RoleRef<'a> {
    /// Resolve to a slug, rejecting blank slugs and slugs with null characters.
    pub fn resolve(self) -> Result<&'a str> {
        let slug = match self {
            RoleRef::Slug(slug) => slug,
            RoleRef::Handle(handle) => handle.slug(),
        };

        if slug.trim().is_empty() {
            return Err(Error::InvalidRoleReference(
                "Role slug cannot be empty".to_string(),
            ));
        }

        if slug.contains('\0') {
            return Err(Error::InvalidRoleReference(format!(
                "Role slug cannot contain null characters: {slug:?}"
            )));
        }

        Ok(slug)
    }
}

impl std::fmt::Debug for RoleRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleRef::Slug(slug) => f.debug_tuple("Slug").field(slug).finish(),
            RoleRef::Handle(handle) => f.debug_tuple("Handle").field(&handle.slug()).finish(),
        }
    }
}

impl<'a> From<&'a str> for RoleRef<'a> {
    fn from(slug: &'a str) -> Self {
        RoleRef::Slug(slug)
    }
}

impl<'a> From<&'a String> for RoleRef<'a> {
    fn from(slug: &'a String) -> Self {
        RoleRef::Slug(slug)
    }
}

impl<'a> From<&'a Role> for RoleRef<'a> {
    fn from(role: &'a Role) -> Self {
        RoleRef::Handle(role)
    }
}

impl<'a> From<&'a dyn RoleHandle> for RoleRef<'a> {
    fn from(handle: &'a dyn RoleHandle) -> Self {
        RoleRef::Handle(handle)
    }
}

/// Builder for creating roles with a fluent API.
#[derive(Debug, Default)]
pub struct RoleBuilder {
    slug: Option<String>,
    name: Option<String>,
    description: Option<String>,
    metadata: HashMap<String, String>,
}

impl RoleBuilder {
    /// Create a new role builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the role description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add metadata to the role.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the role.
    pub fn build(self) -> Result<Role> {
        let slug = self
            .slug
            .ok_or_else(|| Error::InvalidConfiguration("Role slug is required".to_string()))?;
        RoleRef::Slug(&slug).resolve()?;

        let mut role = Role::new(slug);

        if let Some(name) = self.name {
            role = role.with_name(name);
        }

        if let Some(description) = self.description {
            role = role.with_description(description);
        }

        role.metadata = self.metadata;

        Ok(role)
    }
}
