//! Function-block inheritance flattening.
//!
//! A function block may extend another; consumers of assembled content want
//! the complete member list in one place. Flattening merges every inherited
//! configuration/status/fault property and operation into the block's own
//! lists and removes the inheritance edge. The nearest definition wins on a
//! name collision. All other model kinds pass through unchanged.

use crate::workspace::ModelWorkspace;
use dhub_domain::document::{FunctionBlockDoc, ModelDocument, Operation, Property};
use dhub_domain::ModelId;
use fxhash::FxHashSet;

/// Produces an equivalent model with no inheritance edges. Pure (the input
/// document is untouched) and idempotent: flattening an already-flat model
/// returns it as-is.
#[must_use]
pub fn flatten(workspace: &ModelWorkspace, document: &ModelDocument) -> ModelDocument {
    match document {
        ModelDocument::FunctionBlock(block) if block.extends.is_some() => {
            ModelDocument::FunctionBlock(flatten_function_block(workspace, block))
        },
        other => other.clone(),
    }
}

fn flatten_function_block(workspace: &ModelWorkspace, block: &FunctionBlockDoc) -> FunctionBlockDoc {
    // Ancestor chain, nearest first. The link pass guarantees every extends
    // target is a present function block; the seen-set stops if data is
    // malformed anyway.
    let mut chain: Vec<&FunctionBlockDoc> = vec![block];
    let mut seen: FxHashSet<&ModelId> = FxHashSet::default();
    seen.insert(&block.id);

    let mut current = block;
    while let Some(parent_id) = &current.extends {
        if !seen.insert(parent_id) {
            break;
        }
        match workspace.get(parent_id) {
            Some(ModelDocument::FunctionBlock(parent)) => {
                chain.push(parent);
                current = parent;
            },
            _ => break,
        }
    }

    let chain_ids: FxHashSet<&ModelId> = chain.iter().map(|doc| &doc.id).collect();

    // References of the flattened block: union over the chain, minus the
    // chain itself, in root-to-leaf discovery order.
    let mut references: Vec<ModelId> = Vec::new();
    for doc in chain.iter().rev() {
        for reference in &doc.references {
            if !chain_ids.contains(reference) && !references.contains(reference) {
                references.push(reference.clone());
            }
        }
    }

    FunctionBlockDoc {
        id: block.id.clone(),
        display_name: block.display_name.clone(),
        description: block.description.clone(),
        references,
        extends: None,
        configuration: merge_properties(&chain, |doc| &doc.configuration),
        status: merge_properties(&chain, |doc| &doc.status),
        faults: merge_properties(&chain, |doc| &doc.faults),
        operations: merge_operations(&chain),
    }
}

/// Root-most members come first; a nearer definition replaces an inherited
/// one in place.
fn merge_properties<'a>(
    chain: &[&'a FunctionBlockDoc],
    select: impl Fn(&'a FunctionBlockDoc) -> &'a [Property],
) -> Vec<Property> {
    let mut merged: Vec<Property> = Vec::new();
    for doc in chain.iter().rev() {
        for property in select(doc) {
            if let Some(existing) = merged.iter_mut().find(|p| p.name == property.name) {
                *existing = property.clone();
            } else {
                merged.push(property.clone());
            }
        }
    }
    merged
}

fn merge_operations(chain: &[&FunctionBlockDoc]) -> Vec<Operation> {
    let mut merged: Vec<Operation> = Vec::new();
    for doc in chain.iter().rev() {
        for operation in &doc.operations {
            if let Some(existing) = merged.iter_mut().find(|o| o.name == operation.name) {
                *existing = operation.clone();
            } else {
                merged.push(operation.clone());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceReader;
    use dhub_domain::document::{EnumDoc, PrimitiveType, PropertyType};
    use dhub_domain::RawModelContent;

    fn id(s: &str) -> ModelId {
        s.parse().unwrap()
    }

    fn property(name: &str, primitive: PrimitiveType) -> Property {
        Property {
            name: name.into(),
            data_type: PropertyType::Primitive(primitive),
            multiple: false,
            mandatory: true,
            description: None,
        }
    }

    fn block(
        model_id: &str,
        extends: Option<&str>,
        status: Vec<Property>,
        operations: Vec<Operation>,
    ) -> ModelDocument {
        let extends = extends.map(id);
        ModelDocument::FunctionBlock(FunctionBlockDoc {
            id: id(model_id),
            display_name: None,
            description: None,
            references: extends.iter().cloned().collect(),
            extends,
            configuration: Vec::new(),
            status,
            faults: Vec::new(),
            operations,
        })
    }

    fn workspace_of(documents: &[&ModelDocument]) -> ModelWorkspace {
        let mut reader = WorkspaceReader::new();
        for document in documents {
            reader.add(RawModelContent {
                id: document.id().clone(),
                kind: document.kind(),
                bytes: serde_json::to_vec(document).unwrap(),
            });
        }
        reader.read().unwrap()
    }

    #[test]
    fn merges_the_whole_inheritance_chain() {
        let base = block(
            "com.acme.Switchable:1.0.0",
            None,
            vec![property("on", PrimitiveType::Boolean)],
            vec![Operation {
                name: "toggle".into(),
                description: None,
                params: Vec::new(),
                returns: None,
            }],
        );
        let dimmable = block(
            "com.acme.Dimmable:1.0.0",
            Some("com.acme.Switchable:1.0.0"),
            vec![property("level", PrimitiveType::Int)],
            Vec::new(),
        );
        let lamp = block(
            "com.acme.Lamp:1.0.0",
            Some("com.acme.Dimmable:1.0.0"),
            vec![property("color", PrimitiveType::String)],
            Vec::new(),
        );

        let workspace = workspace_of(&[&base, &dimmable, &lamp]);
        let flat = flatten(&workspace, &lamp);

        let ModelDocument::FunctionBlock(flat) = flat else { panic!("kind changed") };
        assert!(flat.extends.is_none());
        let names: Vec<&str> = flat.status.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["on", "level", "color"]);
        assert_eq!(flat.operations.len(), 1);
        assert!(flat.references.is_empty(), "chain-internal references are dropped");
    }

    #[test]
    fn nearest_definition_wins_on_collisions() {
        let base = block(
            "com.acme.Base:1.0.0",
            None,
            vec![property("level", PrimitiveType::Float)],
            Vec::new(),
        );
        let child = block(
            "com.acme.Child:1.0.0",
            Some("com.acme.Base:1.0.0"),
            vec![property("level", PrimitiveType::Int)],
            Vec::new(),
        );

        let workspace = workspace_of(&[&base, &child]);
        let ModelDocument::FunctionBlock(flat) = flatten(&workspace, &child) else {
            panic!("kind changed")
        };

        assert_eq!(flat.status.len(), 1);
        assert_eq!(flat.status[0].data_type, PropertyType::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn flattening_is_idempotent() {
        let base = block(
            "com.acme.Base:1.0.0",
            None,
            vec![property("on", PrimitiveType::Boolean)],
            Vec::new(),
        );
        let child = block(
            "com.acme.Child:1.0.0",
            Some("com.acme.Base:1.0.0"),
            vec![property("level", PrimitiveType::Int)],
            Vec::new(),
        );

        let workspace = workspace_of(&[&base, &child]);
        let once = flatten(&workspace, &child);
        let twice = flatten(&workspace, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_function_block_kinds_pass_through() {
        let literal_enum = ModelDocument::Enumeration(EnumDoc {
            id: id("com.acme.Color:1.0.0"),
            display_name: None,
            description: None,
            references: Vec::new(),
            literals: Vec::new(),
        });

        let workspace = workspace_of(&[&literal_enum]);
        assert_eq!(flatten(&workspace, &literal_enum), literal_enum);
    }
}
