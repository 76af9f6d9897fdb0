//! Core storage engine providing sandboxed, atomic, and compressed file I/O.
//!
//! This module contains the primary [`Storage`] handle, the entry point for
//! all blob operations. It manages the physical filesystem root, enforces the
//! sandbox via path resolution, and provides both direct and namespaced access.

use crate::builder::StorageBuilder;
use crate::error::StorageError;
use crate::maintenance;
use crate::namespace::{NamespaceName, NamespacedStorage};
use crate::security;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Marker embedded in temporary file names so crash leftovers are recognizable.
pub(crate) const TMP_MARKER: &str = ".dhubtmp.";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, path: &Path, data: &[u8]) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Lz4 => lz4_flex::decompress_size_prepended(data)
                .map_err(|source| StorageError::Decompress { path: path.to_path_buf(), source }),
        }
    }
}

/// One file in a namespace listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

/// The internal shared state of a [`Storage`] instance.
#[derive(Debug)]
pub struct StorageInner {
    /// The canonicalized physical path on the disk where all data is stored.
    pub(crate) root: PathBuf,
    /// Whether transparent LZ4 compression is globally enabled for this instance.
    pub(crate) compression: Compression,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to the storage engine.
///
/// `Storage` provides a sandboxed filesystem environment where all paths are
/// validated to prevent traversal attacks. Writes are atomic (temp file +
/// `fsync` + rename), compression is transparent, and stale temp files are
/// cleaned up on initialization.
///
/// The handle is internally reference-counted (`Arc`) and can be cheaply
/// cloned across threads or tasks.
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Returns a namespaced view of the storage engine.
    ///
    /// A namespace holds the model files of one model namespace in a single
    /// flat, browsable directory (e.g. `com.acme.lighting/Lamp_1.0.0.fbmodel`).
    ///
    /// # Constraints
    /// - Names are dot-separated segments of lowercase alphanumerics and `_`.
    /// - Empty names and empty segments are prohibited.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidNamespace`] for malformed names.
    pub fn namespace<N>(&self, name: N) -> Result<NamespacedStorage, StorageError>
    where
        N: TryInto<NamespaceName, Error = StorageError>,
    {
        let ns = name.try_into()?;
        Ok(NamespacedStorage::new(self.clone(), ns))
    }

    /// Resolves a relative path to a physical path on the disk within the
    /// storage root, rejecting anything that escapes the sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversal`] if the path tries to escape.
    /// Returns [`StorageError::Io`] if the path cannot be verified on disk.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        security::resolve_path(&self.root, path)
    }

    pub(crate) fn resolve_internal(
        &self,
        namespace: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, StorageError> {
        match namespace {
            Some(ns) => security::resolve_path(&self.root, Path::new(ns).join(path)),
            None => security::resolve_path(&self.root, path),
        }
    }

    /// Reads the entire contents of a file into a byte vector, transparently
    /// decompressing when compression is enabled.
    ///
    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if the path does not exist.
    /// Returns [`StorageError::Decompress`] if the data is corrupted or
    /// compression is misconfigured.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.read_internal(None, path).await
    }

    pub(crate) async fn read_internal(
        &self,
        namespace: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve_internal(namespace, path)?;

        let data = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound { path: resolved });
            },
            Err(err) => return Err(StorageError::io(resolved, err)),
        };

        self.inner.compression.decompress(&resolved, &data)
    }

    /// Writes data to a file atomically.
    ///
    /// Uses the "atomic swap" pattern: data goes to a unique temporary file,
    /// is synced to hardware, then renamed over the destination. On platforms
    /// without atomic replace the implementation falls back to
    /// remove-then-rename. Parent directories are created automatically, and
    /// the target is never left partially written.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversal`] if the path escapes the sandbox.
    /// Returns [`StorageError::Io`] on disk or permission failures.
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.write_internal(None, path, data).await
    }

    pub(crate) async fn write_internal(
        &self,
        namespace: Option<&str>,
        path: impl AsRef<Path>,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let resolved = self.resolve_internal(namespace, path)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent.to_path_buf(), e))?;
        }

        let temp = unique_tmp_path(&resolved, &self.tmp_counter);

        let final_data = self.inner.compression.compress(data);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .map_err(|e| StorageError::io(&temp, e))?;
            file.write_all(&final_data).await.map_err(|e| StorageError::io(&temp, e))?;
            file.sync_all().await.map_err(|e| StorageError::io(&temp, e))?;
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&resolved)
                    .await
                    .map_err(|e| StorageError::io(&resolved, e))?;
                fs::rename(&temp, &resolved).await.map_err(|e| StorageError::io(&resolved, e))?;
            } else {
                return Err(StorageError::io(resolved, err));
            }
        }

        if let Some(parent) = resolved.parent() {
            Self::sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), "File saved atomically");
        Ok(())
    }

    /// Deletes a file from the storage sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if the file does not exist.
    /// Returns [`StorageError::Io`] on permission failures.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.delete_internal(None, path).await
    }

    pub(crate) async fn delete_internal(
        &self,
        namespace: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<(), StorageError> {
        let resolved = self.resolve_internal(namespace, path)?;
        match fs::remove_file(&resolved).await {
            Ok(()) => {},
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound { path: resolved });
            },
            Err(err) => return Err(StorageError::io(resolved, err)),
        }
        debug!(path = %resolved.display(), "File deleted");
        Ok(())
    }

    /// Checks if a file exists within the storage sandbox.
    ///
    /// # Errors
    /// Returns `Ok(false)` if the file is not found; an `Err` only when path
    /// resolution fails (e.g., a traversal attempt).
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        self.exists_internal(None, path)
    }

    pub(crate) fn exists_internal(
        &self,
        namespace: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<bool, StorageError> {
        let resolved = self.resolve_internal(namespace, path)?;
        Ok(resolved.exists())
    }

    /// Lists the files directly inside a namespace directory, skipping
    /// in-flight temporary files. A namespace that was never written to
    /// yields an empty listing.
    pub(crate) async fn list_internal(
        &self,
        namespace: &str,
    ) -> Result<Vec<StorageEntry>, StorageError> {
        let dir = self.resolve_internal(Some(namespace), ".")?;

        let mut reader = match fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::io(dir, err)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| StorageError::io(&dir, e))? {
            let Ok(file_type) = entry.file_type().await else { continue };
            if !file_type.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else { continue };
            if file_name.contains(TMP_MARKER) {
                continue;
            }
            let modified = entry.metadata().await.ok().and_then(|m| m.modified().ok());
            entries.push(StorageEntry { file_name, modified });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("storage");
    let tmp_name = format!("{file_name}{TMP_MARKER}{counter}");
    target.with_file_name(tmp_name)
}
