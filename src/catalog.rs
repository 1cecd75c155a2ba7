//! The role catalog: a fixed table from role slug to the permissions it confers.
//!
//! The catalog is built once and never mutated. Lookups of unknown slugs
//! return an empty slice rather than an error, so assigning an unregistered
//! role records only the bare membership marker.

use crate::{
    error::{Error, Result},
    permission::Permission,
    registry::PermissionRegistry,
};

/// Slugs of the standard catalog, highest priority first.
pub const STANDARD_ROLE_ORDER: [&str; 5] = ["super-admin", "admin", "editor", "author", "viewer"];

const SUPER_ADMIN: &[&str] = &[
    // Platform access
    "platform.index",
    "platform.systems.index",
    // Stories
    "list stories",
    "show stories",
    "create stories",
    "update stories",
    "delete stories",
    "publish stories",
    "unpublish stories",
    // Categories
    "list categories",
    "show categories",
    "create categories",
    "update categories",
    "delete categories",
    // Tags
    "list tags",
    "show tags",
    "create tags",
    "update tags",
    "delete tags",
    // Users
    "list users",
    "show users",
    "create users",
    "update users",
    "delete users",
    // Roles
    "list roles",
    "show roles",
    "create roles",
    "update roles",
    "delete roles",
    // Members
    "list members",
    "show members",
    "create members",
    "update members",
    "delete members",
    "activate members",
    "suspend members",
    // Roles & permissions
    "list roles",
    "show roles",
    "create roles",
    "update roles",
    "delete roles",
    "list permissions",
    "show permissions",
    // Analytics
    "view analytics",
    "view member analytics",
    "view story analytics",
    "export analytics",
    // System
    "view logs",
    "manage settings",
    "backup system",
    "restore system",
];

const ADMIN: &[&str] = &[
    "platform.index",
    "platform.systems.index",
    "list stories",
    "show stories",
    "create stories",
    "update stories",
    "delete stories",
    "publish stories",
    "unpublish stories",
    "list categories",
    "show categories",
    "create categories",
    "update categories",
    "delete categories",
    "list tags",
    "show tags",
    "create tags",
    "update tags",
    "delete tags",
    "list users",
    "show users",
    "create users",
    "update users",
    "list members",
    "show members",
    "activate members",
    "suspend members",
    "view analytics",
    "view member analytics",
    "view story analytics",
];

const EDITOR: &[&str] = &[
    "platform.index",
    "list stories",
    "show stories",
    "create stories",
    "update stories",
    "publish stories",
    "unpublish stories",
    "list categories",
    "show categories",
    "list tags",
    "show tags",
    "create tags",
    "update tags",
    "view story analytics",
];

const AUTHOR: &[&str] = &[
    "platform.index",
    "list stories",
    "show stories",
    "create stories",
    "update stories",
    "list categories",
    "show categories",
    "list tags",
    "show tags",
];

const VIEWER: &[&str] = &[
    "platform.index",
    "list stories",
    "show stories",
    "list categories",
    "show categories",
    "list tags",
    "show tags",
    "view analytics",
];

const STANDARD_TABLE: [(&str, &[&str]); 5] = [
    ("super-admin", SUPER_ADMIN),
    ("admin", ADMIN),
    ("editor", EDITOR),
    ("author", AUTHOR),
    ("viewer", VIEWER),
];

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    slug: String,
    permissions: Vec<Permission>,
}

impl CatalogEntry {
    /// Create a catalog row.
    pub fn new<I, P>(slug: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self {
            slug: slug.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// The role slug.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The permissions the role confers, in declaration order.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Immutable mapping from role slug to the ordered permissions it confers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    entries: Vec<CatalogEntry>,
}

impl RoleCatalog {
    /// Build a catalog from explicit rows.
    ///
    /// Fails if a slug is blank, appears twice, or collides with a permission
    /// name of any row, since slugs and permission names share one grant
    /// namespace.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let entries: Vec<CatalogEntry> = entries.into_iter().collect();

        for (index, entry) in entries.iter().enumerate() {
            if entry.slug.trim().is_empty() {
                return Err(Error::InvalidConfiguration(
                    "Role slug cannot be empty".to_string(),
                ));
            }

            if entries[..index].iter().any(|e| e.slug == entry.slug) {
                return Err(Error::InvalidConfiguration(format!(
                    "Role '{}' is declared twice",
                    entry.slug
                )));
            }

            if let Some(owner) = entries
                .iter()
                .find(|e| e.permissions.iter().any(|p| *p == entry.slug.as_str()))
            {
                return Err(Error::InvalidConfiguration(format!(
                    "Role slug '{}' collides with a permission of role '{}'",
                    entry.slug, owner.slug
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The five-role catalog of the back office.
    pub fn standard() -> Self {
        // The static table is known to satisfy the invariants `new` checks.
        Self {
            entries: STANDARD_TABLE
                .iter()
                .map(|(slug, permissions)| CatalogEntry::new(*slug, permissions.iter().copied()))
                .collect(),
        }
    }

    /// Additionally reject slugs that collide with a registered permission.
    pub fn validate_against(&self, registry: &PermissionRegistry) -> Result<()> {
        match self.entries.iter().find(|e| registry.contains(&e.slug)) {
            Some(entry) => Err(Error::InvalidConfiguration(format!(
                "Role slug '{}' collides with a registered permission",
                entry.slug
            ))),
            None => Ok(()),
        }
    }

    /// Permissions conferred by `slug`; empty for unknown roles.
    pub fn permissions_for(&self, slug: &str) -> &[Permission] {
        self.entry(slug)
            .map(CatalogEntry::permissions)
            .unwrap_or(&[])
    }

    /// Look up a full catalog row.
    pub fn entry(&self, slug: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    /// Check if the catalog declares `slug`.
    pub fn contains(&self, slug: &str) -> bool {
        self.entry(slug).is_some()
    }

    /// Slugs of every role that confers `permission`.
    pub(crate) fn conferred_by<'a>(
        &'a self,
        permission: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.permissions.iter().any(|p| *p == permission))
            .map(|e| e.slug.as_str())
    }

    /// All slugs in declaration order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.slug.as_str())
    }

    /// All rows in declaration order.
    pub fn roles(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog declares no roles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(feature = "persistence")]
mod config {
    use super::{CatalogEntry, RoleCatalog};
    use crate::error::Result;
    use serde::de::{Deserializer, MapAccess, Visitor};
    use std::fmt;
    use std::io::Read;

    // A JSON object keeps its key order only if we walk it ourselves.
    struct OrderedEntries(Vec<CatalogEntry>);

    impl<'de> serde::Deserialize<'de> for OrderedEntries {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
            struct EntriesVisitor;

            impl<'de> Visitor<'de> for EntriesVisitor {
                type Value = OrderedEntries;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("an object mapping role slugs to permission lists")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                    let mut entries = Vec::new();
                    while let Some((slug, permissions)) = map.next_entry::<String, Vec<String>>()? {
                        entries.push(CatalogEntry::new(slug, permissions));
                    }
                    Ok(OrderedEntries(entries))
                }
            }

            deserializer.deserialize_map(EntriesVisitor)
        }
    }

    impl RoleCatalog {
        /// Load a catalog from a JSON object of `slug -> [permission, ...]`.
        pub fn from_json(json: &str) -> Result<Self> {
            let OrderedEntries(entries) = serde_json::from_str(json)?;
            Self::new(entries)
        }

        /// Load a catalog from a reader yielding the same JSON shape as
        /// [`from_json`](Self::from_json).
        pub fn from_reader(reader: impl Read) -> Result<Self> {
            let OrderedEntries(entries) = serde_json::from_reader(reader)?;
            Self::new(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_roles() {
        let catalog = RoleCatalog::standard();
        assert_eq!(catalog.slugs().collect::<Vec<_>>(), STANDARD_ROLE_ORDER);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_standard_catalog_passes_validation() {
        let catalog = RoleCatalog::standard();
        assert_eq!(RoleCatalog::new(catalog.roles().to_vec()).unwrap(), catalog);
        catalog
            .validate_against(&PermissionRegistry::standard())
            .unwrap();
    }

    #[test]
    fn test_viewer_permissions_in_order() {
        let catalog = RoleCatalog::standard();
        let viewer: Vec<&str> = catalog
            .permissions_for("viewer")
            .iter()
            .map(Permission::as_str)
            .collect();
        assert_eq!(
            viewer,
            [
                "platform.index",
                "list stories",
                "show stories",
                "list categories",
                "show categories",
                "list tags",
                "show tags",
                "view analytics",
            ]
        );
    }

    #[test]
    fn test_super_admin_keeps_repeated_entries() {
        let catalog = RoleCatalog::standard();
        let list = catalog.permissions_for("super-admin");
        assert_eq!(list.len(), 51);
        assert_eq!(list.iter().filter(|p| **p == "list roles").count(), 2);
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let catalog = RoleCatalog::standard();
        assert!(catalog.permissions_for("not-a-role").is_empty());
        assert!(!catalog.contains("not-a-role"));
    }

    #[test]
    fn test_slug_collision_rejected() {
        let result = RoleCatalog::new([
            CatalogEntry::new("reader", ["list stories"]),
            CatalogEntry::new("list stories", ["show stories"]),
        ]);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_duplicate_and_blank_slugs_rejected() {
        assert!(RoleCatalog::new([
            CatalogEntry::new("reader", ["a"]),
            CatalogEntry::new("reader", ["b"]),
        ])
        .is_err());
        assert!(RoleCatalog::new([CatalogEntry::new(" ", ["a"])]).is_err());
    }

    #[test]
    fn test_registry_collision_rejected() {
        let catalog = RoleCatalog::new([CatalogEntry::new("view logs", ["list stories"])]).unwrap();
        assert!(catalog
            .validate_against(&PermissionRegistry::standard())
            .is_err());
    }

    #[test]
    fn test_conferred_by() {
        let catalog = RoleCatalog::standard();
        let roles: Vec<&str> = catalog.conferred_by("view analytics").collect();
        assert_eq!(roles, ["super-admin", "admin", "viewer"]);
    }

    #[cfg(feature = "persistence")]
    #[test]
    fn test_from_json_preserves_order() {
        let catalog = RoleCatalog::from_json(
            r#"{ "owner": ["manage settings", "view logs"], "guest": ["platform.index"] }"#,
        )
        .unwrap();
        assert_eq!(catalog.slugs().collect::<Vec<_>>(), ["owner", "guest"]);
        assert_eq!(catalog.permissions_for("owner")[1], "view logs");
    }

    #[cfg(feature = "persistence")]
    #[test]
    fn test_from_json_rejects_collisions() {
        let result = RoleCatalog::from_json(r#"{ "a": ["b"], "b": [] }"#);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }
}
