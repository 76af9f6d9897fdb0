//! The repository capability consumed by the resolution core.

use crate::error::RegistryError;
use async_trait::async_trait;
use dhub_domain::document::ModelDocument;
use dhub_domain::{ModelId, ModelInfo, RawModelContent};
use std::fmt;

/// One isolated model repository owning a set of namespaces.
///
/// Implementations are responsible for all storage details; nothing in the
/// resolution core touches bytes except through this seam.
#[async_trait]
pub trait ModelRepository: fmt::Debug + Send + Sync {
    /// Repository name (for diagnostics and registration conflicts).
    fn name(&self) -> &str;

    /// The model namespaces this repository owns.
    fn namespaces(&self) -> &[String];

    /// Whether the given concrete identifier exists in this repository.
    async fn exists(&self, id: &ModelId) -> Result<bool, RegistryError>;

    /// Dereferences the `latest` tag to the highest released version of
    /// `namespace.Name`; concrete identifiers pass through unchanged.
    ///
    /// Returns `Err(RegistryError::ModelNotFound)` when the tag names a model
    /// with no stored version at all.
    async fn resolve_latest(&self, id: &ModelId) -> Result<ModelId, RegistryError>;

    /// Metadata for one stored model.
    ///
    /// Returns `Err(RegistryError::ModelNotFound)` if the identifier is unknown.
    async fn model_info(&self, id: &ModelId) -> Result<ModelInfo, RegistryError>;

    /// Raw stored bytes for one model. `file_name_hint` short-circuits the
    /// metadata lookup when the caller already knows the blob name.
    async fn raw_content(
        &self,
        id: &ModelId,
        file_name_hint: Option<&str>,
    ) -> Result<RawModelContent, RegistryError>;

    /// Mapping models stored here that target `platform_key` and declare a
    /// reference to `id`, in stable identifier order.
    async fn platform_mappings_for(
        &self,
        id: &ModelId,
        platform_key: &str,
    ) -> Result<Vec<ModelInfo>, RegistryError>;

    /// All models across the repository's namespaces (repository browsing).
    async fn list_models(&self) -> Result<Vec<ModelInfo>, RegistryError>;

    /// Persists a document and returns the indexed metadata.
    async fn save_model(&self, document: &ModelDocument) -> Result<ModelInfo, RegistryError>;

    /// Removes a stored model.
    ///
    /// Returns `Err(RegistryError::ModelNotFound)` if the identifier is unknown.
    async fn delete_model(&self, id: &ModelId) -> Result<(), RegistryError>;
}
