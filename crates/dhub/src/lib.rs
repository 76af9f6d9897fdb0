//! Facade crate for `DeviceHub` features and shared modules.
//! Re-exports domain/kernel primitives and composes the repository and
//! resolution layers into one handle. Keep this crate thin: it should
//! compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,ignore
//! use dhub::{DeviceHub, logger::Logger};
//! use dhub::kernel::prelude::*;
//!
//! let _log = Logger::builder().name("device-hub").init()?;
//! let config = load_config(Some("hub"))?;
//!
//! let hub = DeviceHub::connect(config).await?;
//! let ctx = RequestContext::new("acme");
//! let bundle = hub
//!     .assemble_model_content(&ctx, &"com.acme.Car:1.0.0".parse()?, Some("Lwm2m"))
//!     .await?;
//! ```

pub use dhub_domain as domain;
pub use dhub_kernel as kernel;
pub use dhub_logger as logger;
pub use dhub_registry as registry;
pub use dhub_resolution as resolution;
pub use dhub_runtime as runtime;
pub use dhub_storage as storage;

use dhub_domain::{HubConfig, ModelContentBundle, ModelId};
use dhub_kernel::context::RequestContext;
use dhub_registry::{FileModelRepository, RegistryError, RepositoryRegistry};
use dhub_resolution::{ModelContentService, ResolutionError};
use dhub_storage::{Compression, Storage, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while composing the hub from configuration.
#[derive(Debug, Error)]
pub enum HubError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One initialized DeviceHub: blob store, repositories, and the resolution
/// service, wired from a [`HubConfig`].
#[derive(Debug)]
pub struct DeviceHub {
    registry: Arc<RepositoryRegistry>,
    service: ModelContentService,
}

impl DeviceHub {
    /// Opens the blob store and registers one file-backed repository per
    /// configured entry.
    ///
    /// # Errors
    /// Returns [`HubError::Storage`] if the store cannot be opened and
    /// [`HubError::Registry`] on conflicting namespace ownership.
    pub async fn connect(config: HubConfig) -> Result<Self, HubError> {
        let compression =
            if config.storage.compression { Compression::Lz4 } else { Compression::None };
        let storage = Storage::builder()
            .root(&config.storage.data_dir)
            .compression(compression)
            .connect()
            .await?;

        let mut registry = RepositoryRegistry::new();
        for repository in &config.repositories {
            let repository = FileModelRepository::new(
                &repository.name,
                &storage,
                repository.namespaces.clone(),
                &config.cache,
            )?;
            registry.register(Arc::new(repository))?;
        }

        let registry = Arc::new(registry);
        let service =
            ModelContentService::with_config(Arc::clone(&registry), config.resolver.clone());

        info!(repositories = config.repositories.len(), "DeviceHub initialized");
        Ok(Self { registry, service })
    }

    /// The namespace → repository routing table.
    #[must_use]
    pub fn registry(&self) -> &Arc<RepositoryRegistry> {
        &self.registry
    }

    /// Resolves and assembles the self-contained content bundle for `root`,
    /// optionally projected through the mappings of `platform`.
    ///
    /// # Errors
    /// See [`ResolutionError`]; failures never yield a partial bundle.
    pub async fn assemble_model_content(
        &self,
        ctx: &RequestContext,
        root: &ModelId,
        platform: Option<&str>,
    ) -> Result<ModelContentBundle, ResolutionError> {
        self.service.assemble(ctx, root, platform).await
    }

    /// Like [`Self::assemble_model_content`], for callers outside any async
    /// context. The work runs on the shared process-wide runtime, so the
    /// caller's thread only blocks on the result; it never joins the pool.
    ///
    /// # Errors
    /// See [`ResolutionError`].
    pub fn assemble_model_content_blocking(
        &self,
        ctx: &RequestContext,
        root: &ModelId,
        platform: Option<&str>,
    ) -> Result<ModelContentBundle, ResolutionError> {
        dhub_runtime::get_global_runtime()
            .block_on(self.assemble_model_content(ctx, root, platform))
    }
}
