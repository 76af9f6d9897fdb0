use dhub_domain::{DomainError, ModelId};
use dhub_registry::RegistryError;
use thiserror::Error;

/// A specialized error enum for the resolution pipeline.
///
/// Every variant aborts the whole request; there is no partial success and no
/// retry at this layer.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("unresolved dependency: [{reference}] required by [{required_by}] was not found in any repository")]
    UnresolvedDependency { reference: ModelId, required_by: ModelId },

    #[error("reference cycle among models: {}", format_ids(.ids))]
    CycleDetected { ids: Vec<ModelId> },

    #[error("resolution exceeded the configured limit of {limit} models")]
    GraphTooLarge { limit: usize },

    #[error("model [{id}] failed to parse: {source}")]
    ParseFailure {
        id: ModelId,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored content for [{expected}] declares identifier [{found}]")]
    IdentityMismatch { expected: ModelId, found: ModelId },

    #[error("model [{id}] links to [{missing}] which is not part of the workspace")]
    LinkFailure { id: ModelId, missing: ModelId },

    #[error("model [{id}] link to [{target}] is invalid: {reason}")]
    IncompatibleLink { id: ModelId, target: ModelId, reason: &'static str },

    #[error("workspace already contains model [{id}]")]
    DuplicateModel { id: ModelId },

    #[error("resolution worker task failed: {source}")]
    TaskFailure {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn format_ids(ids: &[ModelId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
