use crate::engine::{Storage, StorageEntry};
use crate::error::StorageError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A validated model-namespace name (`com.acme.lighting`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(pub String);

impl TryFrom<String> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.to_lowercase();

        if name.is_empty() {
            return Err(StorageError::InvalidNamespace {
                name,
                reason: "namespace cannot be empty",
            });
        }

        for segment in name.split('.') {
            if segment.is_empty() {
                return Err(StorageError::InvalidNamespace {
                    name: name.clone(),
                    reason: "namespace contains an empty segment",
                });
            }
            if !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(StorageError::InvalidNamespace {
                    name: name.clone(),
                    reason: "namespace segments must be alphanumeric",
                });
            }
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lightweight, namespaced view of the storage engine.
///
/// `NamespacedStorage` scopes every operation to one model namespace: paths
/// are prefixed with the namespace directory and the listing covers exactly
/// that directory. Model files stay flat and browsable under it.
///
/// Cloning is inexpensive; the view only holds a reference-counted handle to
/// the core engine. Compression and sandbox settings are inherited from the
/// parent [`Storage`] instance.
#[derive(Debug, Clone)]
pub struct NamespacedStorage {
    storage: Storage,
    namespace: Arc<NamespaceName>,
}

impl NamespacedStorage {
    pub(crate) fn new(storage: Storage, namespace: NamespaceName) -> Self {
        Self { storage, namespace: Arc::new(namespace) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.namespace.as_ref().as_ref()
    }

    /// Resolves a file name to its physical path within the namespace directory.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversal`] if the name escapes the sandbox.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        self.storage.resolve_internal(Some(self.name()), path)
    }

    /// Reads a file from the namespace. See [`Storage::read`].
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.storage.read_internal(Some(self.name()), path).await
    }

    /// Writes a file into the namespace atomically. See [`Storage::write`].
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.storage.write_internal(Some(self.name()), path, data).await
    }

    /// Deletes a file from the namespace. See [`Storage::delete`].
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.storage.delete_internal(Some(self.name()), path).await
    }

    /// Checks whether a file exists in the namespace.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        self.storage.exists_internal(Some(self.name()), path)
    }

    /// Lists the model files stored in this namespace, sorted by file name.
    /// In-flight temporary files are excluded; a namespace that was never
    /// written to yields an empty listing.
    pub async fn list(&self) -> Result<Vec<StorageEntry>, StorageError> {
        self.storage.list_internal(self.name()).await
    }
}
