//! Grant sets: the flat key → bool bag every principal owns.
//!
//! Role slugs and permission names share this one namespace. A role
//! assignment is stored as an entry keyed by the role slug right next to the
//! permissions the role expands to, so both kinds of check go through the same
//! [`GrantSet::has`] lookup.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A principal's grants, keyed by permission name or role slug.
///
/// Absent keys read as "not granted". Writes are last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(transparent))]
pub struct GrantSet {
    #[cfg_attr(
        feature = "persistence",
        serde(deserialize_with = "legacy::deserialize_flags")
    )]
    entries: BTreeMap<String, bool>,
}

impl GrantSet {
    /// Create an empty grant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff `key` is present with value `true`.
    pub fn has(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Returns true if `key` has an entry, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value of an entry.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    /// Set a single entry.
    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.entries.insert(key.into(), value);
    }

    /// Set a single entry to `true`.
    pub fn grant(&mut self, key: impl Into<String>) {
        self.set(key, true);
    }

    /// Delete an entry, returning its previous value.
    pub fn revoke(&mut self, key: &str) -> Option<bool> {
        self.entries.remove(key)
    }

    /// Overwrite every key present in `additions`, leaving the rest untouched.
    pub fn merge(&mut self, additions: &GrantSet) {
        for (key, value) in &additions.entries {
            self.entries.insert(key.clone(), *value);
        }
    }

    /// Builder-style [`merge`](Self::merge).
    pub fn merged(mut self, additions: &GrantSet) -> Self {
        self.merge(additions);
        self
    }

    /// The first key of `order` that is granted.
    pub fn first_held<'a, I, S>(&self, order: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + ?Sized + 'a,
    {
        order
            .into_iter()
            .map(|key| key.as_ref())
            .find(|key| self.has(key))
    }

    /// All keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keys whose value is `true`.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, value)| **value)
            .map(|(key, _)| key.as_str())
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Number of entries, granted or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the grant set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// View the grant set as role memberships.
    pub fn role_view(&self) -> RoleView<'_> {
        RoleView(self)
    }

    /// View the grant set as permissions.
    pub fn permission_view(&self) -> PermissionView<'_> {
        PermissionView(self)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for GrantSet {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, bool)> for GrantSet {
    fn extend<T: IntoIterator<Item = (K, bool)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.entries.insert(key.into(), value);
        }
    }
}

impl IntoIterator for GrantSet {
    type Item = (String, bool);
    type IntoIter = btree_map::IntoIter<String, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Read-only view answering role membership questions.
#[derive(Debug, Clone, Copy)]
pub struct RoleView<'a>(&'a GrantSet);

impl RoleView<'_> {
    /// Check if the role slug is held.
    pub fn holds(&self, slug: &str) -> bool {
        self.0.has(slug)
    }
}

/// Read-only view answering permission questions.
#[derive(Debug, Clone, Copy)]
pub struct PermissionView<'a>(&'a GrantSet);

impl PermissionView<'_> {
    /// Check if the permission is granted.
    pub fn allows(&self, permission: &str) -> bool {
        self.0.has(permission)
    }
}

#[cfg(feature = "persistence")]
mod legacy {
    use crate::form;
    use serde::{Deserialize, Deserializer, de::Error as _};
    use std::collections::BTreeMap;

    // Rows written by the old back office store grants as 1/0, or as the
    // checkbox strings the permission editor submitted.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    pub(super) fn deserialize_flags<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<String, bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, Flag>>::deserialize(deserializer)?;
        raw.unwrap_or_default()
            .into_iter()
            .map(|(key, flag)| {
                let value = match flag {
                    Flag::Bool(b) => b,
                    Flag::Int(n) => n != 0,
                    Flag::Text(text) => form::parse_flag(&text).map_err(D::Error::custom)?,
                };
                Ok((key, value))
            })
            .collect()
    }
}
