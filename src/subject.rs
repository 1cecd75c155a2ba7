//! Principals: the admin accounts whose access is modeled.

use crate::grant::GrantSet;
use uuid::Uuid;

/// An admin user owning exactly one [`GrantSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct Principal {
    /// Unique identifier for the principal.
    id: String,
    /// Display name.
    #[cfg_attr(feature = "persistence", serde(default))]
    name: Option<String>,
    /// Contact email.
    #[cfg_attr(feature = "persistence", serde(default))]
    email: Option<String>,
    /// Roles and permissions, stored as one attribute.
    #[cfg_attr(feature = "persistence", serde(default))]
    permissions: GrantSet,
}

impl Principal {
    /// Create a principal with an empty grant set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            permissions: GrantSet::new(),
        }
    }

    /// Create a principal with a random UUID.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Create a principal from an externally supplied grant set.
    pub fn with_grants(id: impl Into<String>, grants: GrantSet) -> Self {
        Self {
            permissions: grants,
            ..Self::new(id)
        }
    }

    /// Get the principal's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Get the email.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Name for display: the display name if set, else the email, else the id.
    pub fn effective_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }

    /// The principal's grants.
    pub fn grants(&self) -> &GrantSet {
        &self.permissions
    }

    // Mutation goes through `AccessModel` so every change is persisted.
    pub(crate) fn grants_mut(&mut self) -> &mut GrantSet {
        &mut self.permissions
    }

    /// Check role membership by slug.
    pub fn has_role(&self, slug: &str) -> bool {
        self.permissions.role_view().holds(slug)
    }

    /// Check a single permission.
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.permission_view().allows(permission)
    }
}
