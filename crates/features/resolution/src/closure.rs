//! Concurrent transitive-closure discovery.
//!
//! Fork-join expansion over the reference graph: each unvisited identifier
//! is fetched and its declared references spawned as independent subtasks,
//! with all result sets merged back into the requester. A shared visited-set
//! (atomic check-and-insert) guarantees that diamond-shaped graphs yield each
//! node exactly once and that reference cycles cannot re-expand a node, which
//! bounds the walk even on malformed data. The request context is cloned
//! into every spawned task; worker threads inherit nothing ambient.

use crate::error::ResolutionError;
use dhub_domain::{ModelId, ModelInfo};
use dhub_kernel::context::RequestContext;
use dhub_registry::{RegistryError, RepositoryRegistry};
use fxhash::FxHashSet;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{Instrument, trace};

/// Concurrently collects the full reference closure of `root`, including the
/// root itself. Set semantics: no duplicates, no ordering.
pub(crate) async fn retrieve_closure(
    ctx: &RequestContext,
    registry: &Arc<RepositoryRegistry>,
    root: &ModelId,
    max_models: usize,
) -> Result<Vec<ModelInfo>, ResolutionError> {
    let visited = Arc::new(Visited::new(max_models));
    expand(ctx.clone(), Arc::clone(registry), visited, root.clone(), None).await
}

/// Shared visited-set with an expansion bound.
#[derive(Debug)]
struct Visited {
    seen: Mutex<FxHashSet<ModelId>>,
    limit: usize,
}

impl Visited {
    fn new(limit: usize) -> Self {
        Self { seen: Mutex::new(FxHashSet::default()), limit }
    }

    /// Atomic check-and-insert. `Ok(false)` means a sibling branch already
    /// claimed this identifier.
    fn claim(&self, id: &ModelId) -> Result<bool, ResolutionError> {
        let mut seen = self.seen.lock();
        if seen.contains(id) {
            return Ok(false);
        }
        if seen.len() >= self.limit {
            return Err(ResolutionError::GraphTooLarge { limit: self.limit });
        }
        seen.insert(id.clone());
        Ok(true)
    }
}

type ExpandFuture = Pin<Box<dyn Future<Output = Result<Vec<ModelInfo>, ResolutionError>> + Send>>;

fn expand(
    ctx: RequestContext,
    registry: Arc<RepositoryRegistry>,
    visited: Arc<Visited>,
    id: ModelId,
    required_by: Option<ModelId>,
) -> ExpandFuture {
    Box::pin(async move {
        if !visited.claim(&id)? {
            trace!(id = %id, "Already expanded by a sibling branch");
            return Ok(Vec::new());
        }

        let repository = match registry.locate_model(&id) {
            Ok(repository) => repository,
            Err(err) => return Err(missing_reference(err, id, required_by)),
        };
        let info = match repository.model_info(&id).await {
            Ok(info) => info,
            Err(err) => return Err(missing_reference(err, id, required_by)),
        };
        trace!(id = %id, references = info.references.len(), "Model discovered");

        let mut tasks = JoinSet::new();
        for reference in info.references.clone() {
            let span = ctx.span("closure-expand");
            tasks.spawn(
                expand(
                    ctx.clone(),
                    Arc::clone(&registry),
                    Arc::clone(&visited),
                    reference,
                    Some(id.clone()),
                )
                .instrument(span),
            );
        }

        let mut results = vec![info];
        while let Some(joined) = tasks.join_next().await {
            let subtree = joined.map_err(|source| ResolutionError::TaskFailure { source })??;
            results.extend(subtree);
        }
        Ok(results)
    })
}

/// A dangling reference is fatal; only the root surfaces plain lookup errors.
fn missing_reference(
    err: RegistryError,
    id: ModelId,
    required_by: Option<ModelId>,
) -> ResolutionError {
    match required_by {
        Some(required_by)
            if matches!(
                err,
                RegistryError::NamespaceNotFound { .. } | RegistryError::ModelNotFound { .. }
            ) =>
        {
            ResolutionError::UnresolvedDependency { reference: id, required_by }
        },
        _ => ResolutionError::Registry(err),
    }
}
