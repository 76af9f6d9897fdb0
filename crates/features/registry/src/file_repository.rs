//! Blob-backed repository implementation.
//!
//! Models live as JSON documents in one storage namespace per model
//! namespace, named `{Name}_{version}.{ext}` with the extension encoding the
//! model kind. The metadata index is rebuilt from the blobs on demand and
//! kept in a TTL-bounded cache; raw content reads always go to the store.

use crate::error::RegistryError;
use crate::repository::ModelRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dhub_domain::config::CacheConfig;
use dhub_domain::document::ModelDocument;
use dhub_domain::id::compare_versions;
use dhub_domain::{ModelId, ModelInfo, ModelKind, RawModelContent};
use dhub_storage::{NamespacedStorage, Storage, StorageEntry};
use fxhash::FxHashMap;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A [`ModelRepository`] over the sandboxed blob store.
#[derive(Debug)]
pub struct FileModelRepository {
    name: String,
    namespaces: Vec<String>,
    stores: FxHashMap<String, NamespacedStorage>,
    index: Cache<String, Arc<Vec<ModelInfo>>>,
}

impl FileModelRepository {
    /// Opens one storage namespace per owned model namespace.
    ///
    /// # Errors
    /// Returns [`RegistryError::Storage`] when a namespace name is rejected
    /// by the storage sandbox.
    pub fn new(
        name: impl Into<String>,
        storage: &Storage,
        namespaces: Vec<String>,
        cache: &CacheConfig,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let mut stores = FxHashMap::default();
        for namespace in &namespaces {
            stores.insert(namespace.clone(), storage.namespace(namespace.as_str())?);
        }

        let index = Cache::builder()
            .max_capacity(cache.capacity)
            .time_to_live(Duration::from_secs(cache.ttl_seconds))
            .build();

        info!(repository = %name, namespaces = namespaces.len(), "File repository opened");
        Ok(Self { name, namespaces, stores, index })
    }

    fn store(&self, namespace: &str) -> Result<&NamespacedStorage, RegistryError> {
        self.stores
            .get(namespace)
            .ok_or_else(|| RegistryError::NamespaceNotFound { namespace: namespace.to_owned() })
    }

    /// Index of one namespace, served from the TTL cache when fresh.
    /// Concurrent misses may rebuild twice; the last insert wins, which is
    /// harmless because the build is a pure function of the blobs.
    async fn namespace_index(&self, namespace: &str) -> Result<Arc<Vec<ModelInfo>>, RegistryError> {
        if let Some(cached) = self.index.get(namespace).await {
            return Ok(cached);
        }

        let store = self.store(namespace)?;
        let built = Arc::new(build_index(store).await?);
        self.index.insert(namespace.to_owned(), Arc::clone(&built)).await;
        debug!(namespace = %namespace, models = built.len(), "Namespace index rebuilt");
        Ok(built)
    }

    async fn find_info(&self, id: &ModelId) -> Result<Option<ModelInfo>, RegistryError> {
        let index = self.namespace_index(id.namespace()).await?;
        Ok(index.iter().find(|info| &info.id == id).cloned())
    }
}

#[async_trait]
impl ModelRepository for FileModelRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    async fn exists(&self, id: &ModelId) -> Result<bool, RegistryError> {
        Ok(self.find_info(id).await?.is_some())
    }

    async fn resolve_latest(&self, id: &ModelId) -> Result<ModelId, RegistryError> {
        if !id.is_latest_tag() {
            return Ok(id.clone());
        }

        let index = self.namespace_index(id.namespace()).await?;
        let latest = index
            .iter()
            .filter(|info| info.id.name() == id.name() && !info.id.is_latest_tag())
            .max_by(|a, b| compare_versions(a.id.version(), b.id.version()));

        match latest {
            Some(info) => {
                debug!(tag = %id, resolved = %info.id, "Latest tag dereferenced");
                Ok(info.id.clone())
            },
            None => Err(RegistryError::ModelNotFound { id: id.clone() }),
        }
    }

    async fn model_info(&self, id: &ModelId) -> Result<ModelInfo, RegistryError> {
        self.find_info(id).await?.ok_or_else(|| RegistryError::ModelNotFound { id: id.clone() })
    }

    async fn raw_content(
        &self,
        id: &ModelId,
        file_name_hint: Option<&str>,
    ) -> Result<RawModelContent, RegistryError> {
        let (file_name, kind) = match file_name_hint {
            Some(hint) => {
                let kind = hint
                    .rsplit_once('.')
                    .and_then(|(_, ext)| ModelKind::from_extension(ext))
                    .ok_or_else(|| RegistryError::InvalidDocument {
                        file_name: hint.to_owned(),
                        reason: "file name hint has no model extension",
                    })?;
                (hint.to_owned(), kind)
            },
            None => {
                let info = self.model_info(id).await?;
                (info.file_name, info.kind)
            },
        };

        let store = self.store(id.namespace())?;
        let bytes = match store.read(&file_name).await {
            Ok(bytes) => bytes,
            Err(dhub_storage::StorageError::FileNotFound { .. }) => {
                return Err(RegistryError::ModelNotFound { id: id.clone() });
            },
            Err(err) => return Err(err.into()),
        };

        Ok(RawModelContent { id: id.clone(), kind, bytes })
    }

    async fn platform_mappings_for(
        &self,
        id: &ModelId,
        platform_key: &str,
    ) -> Result<Vec<ModelInfo>, RegistryError> {
        let index = self.namespace_index(id.namespace()).await?;
        let mut mappings: Vec<ModelInfo> = index
            .iter()
            .filter(|info| {
                info.kind == ModelKind::Mapping
                    && info.target_platform.as_deref() == Some(platform_key)
                    && info.references.contains(id)
            })
            .cloned()
            .collect();
        mappings.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(mappings)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, RegistryError> {
        let mut all = Vec::new();
        for namespace in &self.namespaces {
            let index = self.namespace_index(namespace).await?;
            all.extend(index.iter().cloned());
        }
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    #[instrument(skip(self, document), fields(id = %document.id()))]
    async fn save_model(&self, document: &ModelDocument) -> Result<ModelInfo, RegistryError> {
        let id = document.id();
        let store = self.store(id.namespace())?;

        let file_name = blob_file_name(id, document.kind());
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|source| RegistryError::Serialize { id: id.clone(), source })?;

        store.write(&file_name, &bytes).await?;
        self.index.invalidate(id.namespace()).await;
        info!(file = %file_name, "Model saved");

        let mut info = info_from_document(document, file_name);
        info.created = Some(Utc::now());
        Ok(info)
    }

    async fn delete_model(&self, id: &ModelId) -> Result<(), RegistryError> {
        let info = self.model_info(id).await?;
        let store = self.store(id.namespace())?;
        store.delete(&info.file_name).await?;
        self.index.invalidate(id.namespace()).await;
        info!(id = %id, "Model deleted");
        Ok(())
    }
}

/// Blob name for a model: `{Name}_{version}.{ext}`.
fn blob_file_name(id: &ModelId, kind: ModelKind) -> String {
    format!("{}_{}.{}", id.name(), id.version(), kind.file_extension())
}

fn info_from_document(document: &ModelDocument, file_name: String) -> ModelInfo {
    let mut info = ModelInfo::new(document.id().clone(), document.kind(), file_name);
    info.references = document.references().to_vec();
    info.display_name = document.display_name().map(str::to_owned);
    info.description = document.description().map(str::to_owned);
    if let ModelDocument::Mapping(mapping) = document {
        info.target_platform = Some(mapping.target_platform.clone());
    }
    info
}

async fn build_index(store: &NamespacedStorage) -> Result<Vec<ModelInfo>, RegistryError> {
    let entries = store.list().await?;
    let mut index: Vec<ModelInfo> = Vec::with_capacity(entries.len());

    for StorageEntry { file_name, modified } in entries {
        let Some((stem, extension)) = file_name.rsplit_once('.') else {
            warn!(file = %file_name, "Skipping file without extension");
            continue;
        };
        let Some(expected_kind) = ModelKind::from_extension(extension) else {
            debug!(file = %file_name, "Skipping non-model file");
            continue;
        };

        let bytes = store.read(&file_name).await?;
        let document: ModelDocument = serde_json::from_slice(&bytes)
            .map_err(|source| RegistryError::Parse { file_name: file_name.clone(), source })?;

        if document.kind() != expected_kind {
            return Err(RegistryError::InvalidDocument {
                file_name,
                reason: "document kind does not match the file extension",
            });
        }
        let id = document.id();
        if id.namespace() != store.name() {
            return Err(RegistryError::InvalidDocument {
                file_name,
                reason: "document namespace does not match its storage namespace",
            });
        }
        if stem != format!("{}_{}", id.name(), id.version()) {
            return Err(RegistryError::InvalidDocument {
                file_name,
                reason: "document identifier does not match the file name",
            });
        }
        if index.iter().any(|existing| &existing.id == id) {
            return Err(RegistryError::DuplicateModel { id: id.clone(), file_name });
        }

        let mut info = info_from_document(&document, file_name);
        info.created = modified.map(DateTime::<Utc>::from);
        index.push(info);
    }

    index.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(index)
}
