//! Dependency ordering.
//!
//! Downstream linking materializes models one after another, so every model
//! must appear after everything it references. Kahn's algorithm over the
//! closed node set; when several nodes are eligible at once, the smallest
//! identifier goes first so the output is reproducible across runs.

use crate::error::ResolutionError;
use dhub_domain::{ModelId, ModelInfo};
use std::collections::{BTreeMap, BTreeSet};

/// Orders `models` so that for every edge (A references B), B precedes A.
///
/// The input must be closed under references: every referenced identifier
/// present as a node.
///
/// # Errors
/// Returns [`ResolutionError::UnresolvedDependency`] when the closure
/// invariant is violated, and [`ResolutionError::CycleDetected`] (listing the
/// identifiers that never became eligible) when the graph contains a
/// reference cycle.
pub fn sort_by_dependencies(models: Vec<ModelInfo>) -> Result<Vec<ModelInfo>, ResolutionError> {
    let mut by_id: BTreeMap<ModelId, ModelInfo> = BTreeMap::new();
    for info in models {
        by_id.insert(info.id.clone(), info);
    }

    let mut in_degree: BTreeMap<&ModelId, usize> = by_id.keys().map(|id| (id, 0)).collect();
    let mut dependents: BTreeMap<&ModelId, Vec<&ModelId>> = BTreeMap::new();

    for (id, info) in &by_id {
        let mut unique = BTreeSet::new();
        for reference in &info.references {
            if !unique.insert(reference) {
                continue;
            }
            let Some((dependency, _)) = by_id.get_key_value(reference) else {
                return Err(ResolutionError::UnresolvedDependency {
                    reference: reference.clone(),
                    required_by: id.clone(),
                });
            };
            dependents.entry(dependency).or_default().push(id);
            if let Some(degree) = in_degree.get_mut(id) {
                *degree += 1;
            }
        }
    }

    // Eligible set doubles as the deterministic tie-break: BTreeSet pops the
    // lexicographically smallest identifier first.
    let mut eligible: BTreeSet<&ModelId> =
        in_degree.iter().filter(|&(_, &degree)| degree == 0).map(|(id, _)| *id).collect();

    let mut sorted_ids: Vec<ModelId> = Vec::with_capacity(by_id.len());
    while let Some(id) = eligible.pop_first() {
        sorted_ids.push(id.clone());

        if let Some(children) = dependents.get(id) {
            for child in children {
                if let Some(degree) = in_degree.get_mut(*child) {
                    *degree -= 1;
                    if *degree == 0 {
                        eligible.insert(*child);
                    }
                }
            }
        }
    }

    if sorted_ids.len() != by_id.len() {
        let sorted: BTreeSet<&ModelId> = sorted_ids.iter().collect();
        let cycle: Vec<ModelId> =
            by_id.keys().filter(|id| !sorted.contains(id)).cloned().collect();
        return Err(ResolutionError::CycleDetected { ids: cycle });
    }

    Ok(sorted_ids.into_iter().filter_map(|id| by_id.remove(&id)).collect())
}
