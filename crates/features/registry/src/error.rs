use dhub_domain::ModelId;
use dhub_storage::StorageError;
use thiserror::Error;

/// A specialized error enum for repository lookups and indexing.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("namespace [{namespace}] does not exist")]
    NamespaceNotFound { namespace: String },

    #[error("namespace [{namespace}] is already owned by repository '{repository}'")]
    DuplicateNamespace { namespace: String, repository: String },

    #[error("model [{id}] does not exist")]
    ModelNotFound { id: ModelId },

    #[error("two stored files declare the same model [{id}]: {file_name}")]
    DuplicateModel { id: ModelId, file_name: String },

    #[error("stored document {file_name} failed to parse: {source}")]
    Parse {
        file_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored document {file_name} is inconsistent: {reason}")]
    InvalidDocument { file_name: String, reason: &'static str },

    #[error("failed to serialize model [{id}]: {source}")]
    Serialize {
        id: ModelId,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
