//! Registry of every permission the back office knows about, grouped for display.

use crate::permission::PermissionDescriptor;

/// A titled group of permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGroup {
    /// Group title.
    pub title: &'static str,
    /// `(name, description)` pairs in display order.
    pub permissions: &'static [(&'static str, &'static str)],
}

const STANDARD_GROUPS: &[PermissionGroup] = &[
    PermissionGroup {
        title: "Main",
        permissions: &[
            ("platform.index", "Main"),
            ("platform.systems.index", "Systems"),
        ],
    },
    PermissionGroup {
        title: "Story Management",
        permissions: &[
            ("list stories", "List Stories"),
            ("show stories", "Show Stories"),
            ("create stories", "Create Stories"),
            ("update stories", "Update Stories"),
            ("delete stories", "Delete Stories"),
            ("publish stories", "Publish Stories"),
            ("unpublish stories", "Unpublish Stories"),
        ],
    },
    PermissionGroup {
        title: "Category Management",
        permissions: &[
            ("list categories", "List Categories"),
            ("show categories", "Show Categories"),
            ("create categories", "Create Categories"),
            ("update categories", "Update Categories"),
            ("delete categories", "Delete Categories"),
        ],
    },
    PermissionGroup {
        title: "Tag Management",
        permissions: &[
            ("list tags", "List Tags"),
            ("show tags", "Show Tags"),
            ("create tags", "Create Tags"),
            ("update tags", "Update Tags"),
            ("delete tags", "Delete Tags"),
        ],
    },
    PermissionGroup {
        title: "User Management",
        permissions: &[
            ("list users", "List Admin Users"),
            ("show users", "Show Admin Users"),
            ("create users", "Create Admin Users"),
            ("update users", "Update Admin Users"),
            ("delete users", "Delete Admin Users"),
        ],
    },
    PermissionGroup {
        title: "Member Management",
        permissions: &[
            ("list members", "List Members"),
            ("show members", "Show Members"),
            ("create members", "Create Members"),
            ("update members", "Update Members"),
            ("delete members", "Delete Members"),
            ("activate members", "Activate Members"),
            ("suspend members", "Suspend Members"),
        ],
    },
    PermissionGroup {
        title: "Role & Permission Management",
        permissions: &[
            ("list roles", "List Roles"),
            ("show roles", "Show Roles"),
            ("create roles", "Create Roles"),
            ("update roles", "Update Roles"),
            ("delete roles", "Delete Roles"),
            ("list permissions", "List Permissions"),
            ("show permissions", "Show Permissions"),
        ],
    },
    PermissionGroup {
        title: "Analytics",
        permissions: &[
            ("view analytics", "View Analytics"),
            ("view member analytics", "View Member Analytics"),
            ("view story analytics", "View Story Analytics"),
            ("export analytics", "Export Analytics"),
        ],
    },
    PermissionGroup {
        title: "System",
        permissions: &[
            ("view logs", "View System Logs"),
            ("manage settings", "Manage Settings"),
            ("backup system", "Backup System"),
            ("restore system", "Restore System"),
        ],
    },
];

/// Static lookup of known permissions, grouped by category.
#[derive(Debug, Clone, Copy)]
pub struct PermissionRegistry {
    groups: &'static [PermissionGroup],
}

impl PermissionRegistry {
    /// The back office's permission groups.
    pub const fn standard() -> Self {
        Self {
            groups: STANDARD_GROUPS,
        }
    }

    /// Use a custom static group table.
    pub const fn from_groups(groups: &'static [PermissionGroup]) -> Self {
        Self { groups }
    }

    /// Groups in display order.
    pub fn groups(&self) -> &'static [PermissionGroup] {
        self.groups
    }

    /// Every known permission, group by group.
    pub fn all_permissions(&self) -> impl Iterator<Item = PermissionDescriptor> {
        self.groups.iter().flat_map(|group| {
            group
                .permissions
                .iter()
                .map(move |&(name, description)| PermissionDescriptor {
                    category: group.title,
                    name,
                    description,
                })
        })
    }

    /// Look up a permission's descriptor.
    pub fn describe(&self, name: &str) -> Option<PermissionDescriptor> {
        self.all_permissions().find(|d| d.name == name)
    }

    /// Check if `name` is a registered permission.
    pub fn contains(&self, name: &str) -> bool {
        self.describe(name).is_some()
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
