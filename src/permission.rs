//! Permission names and descriptors.

use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::fmt;

/// A permission is an atomic, string-identified capability such as `"list stories"`.
///
/// Names are case-sensitive and compared byte for byte. The "verb noun" shape
/// is a naming convention only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(transparent))]
pub struct Permission(String);

impl Permission {
    /// Create a permission from any name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parse a permission name coming from an untrusted boundary.
    ///
    /// Rejects blank names and names containing null characters.
    pub fn parse(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::InvalidFormField(
                "Permission name cannot be empty".to_string(),
            ));
        }

        if name.contains('\0') {
            return Err(Error::InvalidFormField(format!(
                "Permission name cannot contain null characters: {name:?}"
            )));
        }

        Ok(Self::new(name))
    }

    /// Get the permission name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the permission and return the name.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Permission {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Permission {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for Permission {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Permission {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A known permission with its display category and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionDescriptor {
    /// Group title shown above the permission's controls.
    pub category: &'static str,
    /// The permission name stored in grant sets.
    pub name: &'static str,
    /// Human-readable label.
    pub description: &'static str,
}
