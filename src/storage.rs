//! Storage abstractions for persisting principals and role metadata.

use crate::{
    error::{Error, Result},
    grant::GrantSet,
    role::Role,
    subject::Principal,
};
use dashmap::DashMap;
use std::sync::Arc;

/// Persistence collaborator for the access model.
///
/// A save is treated as all-or-nothing. Implementations report failures as
/// [`Error::Storage`] (or [`Error::Serialization`] with `persistence`); the
/// access model propagates them without retrying.
pub trait Storage: Send + Sync {
    /// Load a principal record.
    fn load_principal(&self, id: &str) -> Result<Option<Principal>>;

    /// Persist a principal record, replacing any previous version.
    fn save_principal(&mut self, principal: &Principal) -> Result<()>;

    /// Delete a principal record.
    fn delete_principal(&mut self, id: &str) -> Result<bool>;

    /// Store role metadata.
    fn store_role(&mut self, role: Role) -> Result<()>;

    /// Get role metadata by slug.
    fn get_role(&self, slug: &str) -> Result<Option<Role>>;

    /// List all stored role slugs.
    fn list_roles(&self) -> Result<Vec<String>>;

    /// Load only a principal's grant set.
    fn load_grants(&self, id: &str) -> Result<GrantSet> {
        self.load_principal(id)?
            .map(|principal| principal.grants().clone())
            .ok_or_else(|| Error::PrincipalNotFound(id.to_string()))
    }
}

/// In-memory storage implementation using DashMap for thread safety.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    principals: Arc<DashMap<String, Principal>>,
    roles: Arc<DashMap<String, Role>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance.
    pub fn new() -> Self {
        Self {
            principals: Arc::new(DashMap::new()),
            roles: Arc::new(DashMap::new()),
        }
    }

    /// Get the number of stored principals.
    pub fn principal_count(&self) -> usize {
        self.principals.len()
    }

    /// Get the number of stored roles.
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Clear all stored data.
    pub fn clear(&mut self) {
        self.principals.clear();
        self.roles.clear();
    }
}

impl Storage for MemoryStorage {
    fn load_principal(&self, id: &str) -> Result<Option<Principal>> {
        Ok(self.principals.get(id).map(|p| p.clone()))
    }

    fn save_principal(&mut self, principal: &Principal) -> Result<()> {
        self.principals
            .insert(principal.id().to_string(), principal.clone());
        Ok(())
    }

    fn delete_principal(&mut self, id: &str) -> Result<bool> {
        Ok(self.principals.remove(id).is_some())
    }

    fn store_role(&mut self, role: Role) -> Result<()> {
        let slug = role.slug().to_string();
        self.roles.insert(slug, role);
        Ok(())
    }

    fn get_role(&self, slug: &str) -> Result<Option<Role>> {
        Ok(self.roles.get(slug).map(|r| r.clone()))
    }

    fn list_roles(&self) -> Result<Vec<String>> {
        let mut slugs: Vec<String> = self.roles.iter().map(|entry| entry.key().clone()).collect();
        slugs.sort();
        Ok(slugs)
    }
}

/// File-based storage implementation (requires persistence feature).
#[cfg(feature = "persistence")]
pub mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::{
        collections::BTreeMap,
        fs::{self, File, OpenOptions},
        io::{BufReader, BufWriter, Write},
        path::{Path, PathBuf},
        sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    };

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    struct Document {
        #[serde(default)]
        principals: BTreeMap<String, Principal>,
        #[serde(default)]
        roles: BTreeMap<String, Role>,
    }

    /// File-based storage that keeps principals and roles in one JSON document.
    ///
    /// Every write rewrites the whole file.
    #[derive(Debug)]
    pub struct FileStorage {
        storage_path: PathBuf,
        document: RwLock<Document>,
    }

    impl FileStorage {
        /// Create a new file storage instance, loading the file if it exists.
        pub fn new(storage_path: impl AsRef<Path>) -> Result<Self> {
            let storage_path = storage_path.as_ref().to_path_buf();

            if let Some(parent) = storage_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("Failed to create storage directory: {e}"))
                })?;
            }

            let document = Self::load_from_disk(&storage_path)?;

            Ok(Self {
                storage_path,
                document: RwLock::new(document),
            })
        }

        fn load_from_disk(path: &Path) -> Result<Document> {
            if !path.exists() {
                return Ok(Document::default());
            }

            let file = File::open(path)
                .map_err(|e| Error::Storage(format!("Failed to open storage file: {e}")))?;

            Ok(serde_json::from_reader(BufReader::new(file))?)
        }

        // Written to a sibling file first so a failed write never truncates
        // the last durable document.
        fn save_to_disk(&self, document: &Document) -> Result<()> {
            let staging_path = self.staging_path();

            let written = Self::write_document(&staging_path, document).and_then(|()| {
                fs::rename(&staging_path, &self.storage_path)
                    .map_err(|e| Error::Storage(format!("Failed to replace storage file: {e}")))
            });

            if written.is_err() {
                let _ = fs::remove_file(&staging_path);
            }
            written
        }

        fn write_document(path: &Path, document: &Document) -> Result<()> {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .map_err(|e| Error::Storage(format!("Failed to create storage file: {e}")))?;

            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer
                .flush()
                .map_err(|e| Error::Storage(format!("Failed to write storage file: {e}")))
        }

        fn staging_path(&self) -> PathBuf {
            let mut name = self.storage_path.as_os_str().to_owned();
            name.push(".tmp");
            PathBuf::from(name)
        }

        /// Apply `change` to a copy of the document and keep the copy only
        /// once it is on disk.
        fn commit<T>(&self, change: impl FnOnce(&mut Document) -> T) -> Result<T> {
            let mut document = self.write()?;
            let mut staged = document.clone();
            let outcome = change(&mut staged);
            self.save_to_disk(&staged)?;
            *document = staged;
            Ok(outcome)
        }

        fn read(&self) -> Result<RwLockReadGuard<'_, Document>> {
            self.document
                .read()
                .map_err(|_| Error::Storage("Storage lock poisoned".to_string()))
        }

        fn write(&self) -> Result<RwLockWriteGuard<'_, Document>> {
            self.document
                .write()
                .map_err(|_| Error::Storage("Storage lock poisoned".to_string()))
        }

        /// Get the storage file path.
        pub fn storage_path(&self) -> &Path {
            &self.storage_path
        }

        /// Get the number of stored principals.
        pub fn principal_count(&self) -> Result<usize> {
            Ok(self.read()?.principals.len())
        }
    }

    impl Storage for FileStorage {
        fn load_principal(&self, id: &str) -> Result<Option<Principal>> {
            Ok(self.read()?.principals.get(id).cloned())
        }

        fn save_principal(&mut self, principal: &Principal) -> Result<()> {
            self.commit(|document| {
                document
                    .principals
                    .insert(principal.id().to_string(), principal.clone());
            })
        }

        fn delete_principal(&mut self, id: &str) -> Result<bool> {
            if !self.read()?.principals.contains_key(id) {
                return Ok(false);
            }
            self.commit(|document| document.principals.remove(id).is_some())
        }

        fn store_role(&mut self, role: Role) -> Result<()> {
            self.commit(|document| {
                document.roles.insert(role.slug().to_string(), role);
            })
        }

        fn get_role(&self, slug: &str) -> Result<Option<Role>> {
            Ok(self.read()?.roles.get(slug).cloned())
        }

        fn list_roles(&self) -> Result<Vec<String>> {
            Ok(self.read()?.roles.keys().cloned().collect())
        }
    }
}

#[cfg(feature = "persistence")]
pub use file_storage::FileStorage;
