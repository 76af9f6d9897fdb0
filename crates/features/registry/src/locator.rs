//! Namespace → repository lookup.

use crate::error::RegistryError;
use crate::repository::ModelRepository;
use dhub_domain::ModelId;
use fxhash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

/// Routes every namespace to the repository instance that owns it.
///
/// Multiple isolated repositories may be registered; ownership is exact
/// namespace match (a repository may register several namespaces, but two
/// repositories can never own the same one).
#[derive(Debug, Default)]
pub struct RepositoryRegistry {
    by_namespace: FxHashMap<String, Arc<dyn ModelRepository>>,
}

impl RepositoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a repository for every namespace it declares.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateNamespace`] if any namespace is
    /// already owned; nothing is registered in that case.
    pub fn register(&mut self, repository: Arc<dyn ModelRepository>) -> Result<(), RegistryError> {
        for namespace in repository.namespaces() {
            if let Some(owner) = self.by_namespace.get(namespace) {
                return Err(RegistryError::DuplicateNamespace {
                    namespace: namespace.clone(),
                    repository: owner.name().to_owned(),
                });
            }
        }

        for namespace in repository.namespaces() {
            debug!(namespace = %namespace, repository = repository.name(), "Namespace registered");
            self.by_namespace.insert(namespace.clone(), Arc::clone(&repository));
        }
        Ok(())
    }

    /// The repository owning `namespace`.
    ///
    /// # Errors
    /// Returns [`RegistryError::NamespaceNotFound`] for unknown namespaces.
    pub fn locate(&self, namespace: &str) -> Result<Arc<dyn ModelRepository>, RegistryError> {
        self.by_namespace.get(namespace).map(Arc::clone).ok_or_else(|| {
            RegistryError::NamespaceNotFound { namespace: namespace.to_owned() }
        })
    }

    /// The repository holding the given model, by its namespace.
    pub fn locate_model(&self, id: &ModelId) -> Result<Arc<dyn ModelRepository>, RegistryError> {
        self.locate(id.namespace())
    }

    /// All registered namespaces, sorted.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.by_namespace.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }
}
