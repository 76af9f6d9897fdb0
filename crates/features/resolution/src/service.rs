//! The model-content assembly orchestrator.

use crate::closure::retrieve_closure;
use crate::error::ResolutionError;
use crate::flatten::flatten;
use crate::mapping::{find_mapping, project};
use crate::sort::sort_by_dependencies;
use crate::workspace::WorkspaceReader;
use dhub_domain::config::ResolverConfig;
use dhub_domain::document::{MappingDoc, ModelDocument};
use dhub_domain::{ModelContentBundle, ModelId, ModelInfo, ModelKind};
use dhub_kernel::context::RequestContext;
use dhub_registry::{RegistryError, RepositoryRegistry};
use fxhash::FxHashSet;
use std::sync::Arc;
use tracing::{info, instrument};

/// Drives one resolution request through its stages, strictly in sequence:
/// resolve root → closure discovery → topological sort → fetch and link →
/// per-model transform (flatten, then map if requested) → assemble.
///
/// Failure at any stage aborts the pipeline; no partial bundle is ever
/// returned.
#[derive(Debug, Clone)]
pub struct ModelContentService {
    registry: Arc<RepositoryRegistry>,
    resolver: ResolverConfig,
}

impl ModelContentService {
    #[must_use]
    pub fn new(registry: Arc<RepositoryRegistry>) -> Self {
        Self { registry, resolver: ResolverConfig::default() }
    }

    #[must_use]
    pub fn with_config(registry: Arc<RepositoryRegistry>, resolver: ResolverConfig) -> Self {
        Self { registry, resolver }
    }

    /// Assembles the self-contained content bundle for `root`, optionally
    /// projected through the mappings of `platform`.
    ///
    /// The root may carry the `latest` tag; it is dereferenced to the
    /// concrete version before anything else happens, and that concrete
    /// identifier becomes the bundle root.
    ///
    /// # Errors
    /// See [`ResolutionError`]; every variant aborts the whole request.
    #[instrument(
        skip(self, ctx, root),
        fields(root = %root, platform = ?platform, tenant = %ctx.tenant(), request = %ctx.request_id())
    )]
    pub async fn assemble(
        &self,
        ctx: &RequestContext,
        root: &ModelId,
        platform: Option<&str>,
    ) -> Result<ModelContentBundle, ResolutionError> {
        // The root must live in a known namespace and exist after latest-tag
        // dereferencing; a missing root is a plain lookup error, not an
        // unresolved dependency.
        let repository = self.registry.locate_model(root)?;
        let root = repository.resolve_latest(root).await?;
        if !repository.exists(&root).await? {
            return Err(RegistryError::ModelNotFound { id: root }.into());
        }

        let closure =
            retrieve_closure(ctx, &self.registry, &root, self.resolver.max_models).await?;
        let sorted = sort_by_dependencies(closure)?;
        info!(models = sorted.len(), "Closure discovered and ordered");

        let mut reader = WorkspaceReader::new();
        for model in &sorted {
            let repository = self.registry.locate_model(&model.id)?;
            let content = repository.raw_content(&model.id, Some(&model.file_name)).await?;
            reader.add(content);
        }

        // Mapping resources join the same workspace before the link pass so
        // their references into the closure resolve like any other link.
        let mapping_ids = if let Some(key) = platform {
            self.collect_platform_mappings(&sorted, key, &mut reader).await?
        } else {
            Vec::new()
        };

        let workspace = reader.read()?;

        let mapping_docs: Vec<&MappingDoc> = mapping_ids
            .iter()
            .filter_map(|id| match workspace.get(id) {
                Some(ModelDocument::Mapping(mapping)) => Some(mapping),
                _ => None,
            })
            .collect();

        let mut bundle = ModelContentBundle::new(root);
        for document in workspace.models() {
            if document.kind() == ModelKind::Mapping {
                continue;
            }
            let flattened = flatten(&workspace, document);
            let mapping = find_mapping(&mapping_docs, &flattened);
            bundle.insert(project(flattened, mapping, platform))?;
        }

        info!(models = bundle.len(), mappings = mapping_docs.len(), "Model content assembled");
        Ok(bundle)
    }

    /// Collects the platform's mapping resources across the closure in
    /// first-seen order (deduplicated by identifier) and queues their
    /// content. The resulting order defines first-match-wins selection.
    async fn collect_platform_mappings(
        &self,
        sorted: &[ModelInfo],
        platform_key: &str,
        reader: &mut WorkspaceReader,
    ) -> Result<Vec<ModelId>, ResolutionError> {
        let mut seen: FxHashSet<ModelId> = FxHashSet::default();
        let mut mapping_ids = Vec::new();

        for model in sorted {
            let repository = self.registry.locate_model(&model.id)?;
            for mapping in repository.platform_mappings_for(&model.id, platform_key).await? {
                if !seen.insert(mapping.id.clone()) {
                    continue;
                }
                let owner = self.registry.locate_model(&mapping.id)?;
                let content = owner.raw_content(&mapping.id, Some(&mapping.file_name)).await?;
                reader.add(content);
                mapping_ids.push(mapping.id);
            }
        }

        Ok(mapping_ids)
    }
}
