//! Property test: the sorter places dependencies before dependents for any
//! acyclic reference graph.

use dhub_domain::{ModelId, ModelInfo, ModelKind};
use dhub_resolution::sort_by_dependencies;
use proptest::prelude::*;
use std::collections::HashMap;

fn model_id(i: usize) -> ModelId {
    format!("com.acme.M{i}:1.0.0").parse().unwrap()
}

proptest! {
    #[test]
    fn sorts_any_acyclic_graph(
        adjacency in prop::collection::vec(prop::collection::vec(any::<bool>(), 20), 1..20usize)
    ) {
        // Edges only point from higher to lower indices, so the graph is
        // acyclic by construction.
        let n = adjacency.len();
        let mut models = Vec::with_capacity(n);
        for i in 0..n {
            let mut info = ModelInfo::new(
                model_id(i),
                ModelKind::Entity,
                format!("M{i}_1.0.0.entity"),
            );
            info.references = (0..i).filter(|&j| adjacency[i][j]).map(model_id).collect();
            models.push(info);
        }

        let sorted = sort_by_dependencies(models).expect("acyclic graphs always sort");
        prop_assert_eq!(sorted.len(), n);

        let position: HashMap<ModelId, usize> =
            sorted.iter().enumerate().map(|(idx, info)| (info.id.clone(), idx)).collect();

        for i in 0..n {
            for j in (0..i).filter(|&j| adjacency[i][j]) {
                prop_assert!(
                    position[&model_id(j)] < position[&model_id(i)],
                    "dependency M{} must precede M{}", j, i
                );
            }
        }
    }
}
