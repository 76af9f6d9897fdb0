//! The in-memory linked workspace.
//!
//! All raw contents of one resolution request are parsed together and then
//! linked in a single pass, so forward references within the closed set
//! resolve regardless of fetch order. Mapping documents join the same
//! workspace before linking so their references into the closure resolve in
//! the same pass.
//!
//! One malformed document fails the whole workspace; downstream stages may
//! depend on any member, so there is no partial result.

use crate::error::ResolutionError;
use dhub_domain::document::{ModelDocument, PropertyType};
use dhub_domain::{ModelId, ModelKind, RawModelContent};
use fxhash::FxHashMap;
use tracing::debug;

/// Accumulates raw model contents for one parse-and-link pass.
#[derive(Debug, Default)]
pub struct WorkspaceReader {
    contents: Vec<RawModelContent>,
}

impl WorkspaceReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one model's stored bytes. Order of addition is preserved and
    /// becomes the workspace iteration order.
    pub fn add(&mut self, content: RawModelContent) {
        self.contents.push(content);
    }

    /// Parses every queued document, then links the whole set.
    ///
    /// # Errors
    /// Returns [`ResolutionError::ParseFailure`] for unparseable content,
    /// [`ResolutionError::IdentityMismatch`] when stored bytes declare a
    /// different identifier than the blob they came from,
    /// [`ResolutionError::DuplicateModel`] for repeated identifiers, and the
    /// link-pass errors of [`ModelWorkspace`] for dangling or ill-kinded
    /// references. Any error invalidates the whole batch.
    pub fn read(self) -> Result<ModelWorkspace, ResolutionError> {
        let mut order = Vec::with_capacity(self.contents.len());
        let mut models = FxHashMap::default();

        for content in self.contents {
            let document: ModelDocument = serde_json::from_slice(&content.bytes)
                .map_err(|source| ResolutionError::ParseFailure {
                    id: content.id.clone(),
                    source,
                })?;

            if document.id() != &content.id {
                return Err(ResolutionError::IdentityMismatch {
                    expected: content.id,
                    found: document.id().clone(),
                });
            }
            if models.contains_key(&content.id) {
                return Err(ResolutionError::DuplicateModel { id: content.id });
            }

            order.push(content.id.clone());
            models.insert(content.id, document);
        }

        let workspace = ModelWorkspace { order, models };
        workspace.link()?;
        debug!(models = workspace.len(), "Workspace linked");
        Ok(workspace)
    }
}

/// A fully parsed and cross-linked set of models.
///
/// Owned by one resolution request; read-only after the link pass. Iteration
/// follows the order contents were added (topological order, then mappings).
#[derive(Debug)]
pub struct ModelWorkspace {
    order: Vec<ModelId>,
    models: FxHashMap<ModelId, ModelDocument>,
}

impl ModelWorkspace {
    #[must_use]
    pub fn get(&self, id: &ModelId) -> Option<&ModelDocument> {
        self.models.get(id)
    }

    /// Documents in insertion order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDocument> {
        self.order.iter().filter_map(|id| self.models.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Verifies that every reference a document carries (declared edges,
    /// inheritance, composed function blocks, datatype property types)
    /// resolves to a sibling of the right shape. Mapping targets resolve
    /// best-effort.
    fn link(&self) -> Result<(), ResolutionError> {
        for document in self.models() {
            let id = document.id();

            // Mapping documents may target models beyond this closure (one
            // mapping file can cover many models); their references resolve
            // best-effort. Every other document must link completely.
            if document.kind() != ModelKind::Mapping {
                for reference in document.references() {
                    self.require(id, reference)?;
                }
            }

            match document {
                ModelDocument::InformationModel(doc) => {
                    for fb in &doc.functionblocks {
                        let target = self.require(id, &fb.functionblock)?;
                        if target.kind() != ModelKind::FunctionBlock {
                            return Err(ResolutionError::IncompatibleLink {
                                id: id.clone(),
                                target: fb.functionblock.clone(),
                                reason: "information-model property must reference a function block",
                            });
                        }
                    }
                },
                ModelDocument::FunctionBlock(doc) => {
                    if let Some(parent) = &doc.extends {
                        let target = self.require(id, parent)?;
                        if target.kind() != ModelKind::FunctionBlock {
                            return Err(ResolutionError::IncompatibleLink {
                                id: id.clone(),
                                target: parent.clone(),
                                reason: "a function block can only extend a function block",
                            });
                        }
                    }
                    for property in doc
                        .configuration
                        .iter()
                        .chain(&doc.status)
                        .chain(&doc.faults)
                    {
                        self.check_property_type(id, &property.data_type)?;
                    }
                    for operation in &doc.operations {
                        for param in &operation.params {
                            self.check_property_type(id, &param.data_type)?;
                        }
                        if let Some(returns) = &operation.returns {
                            self.check_property_type(id, returns)?;
                        }
                    }
                },
                ModelDocument::Entity(doc) => {
                    for property in &doc.properties {
                        self.check_property_type(id, &property.data_type)?;
                    }
                },
                ModelDocument::Enumeration(_) | ModelDocument::Mapping(_) => {},
            }
        }
        Ok(())
    }

    fn require<'a>(
        &'a self,
        id: &ModelId,
        reference: &ModelId,
    ) -> Result<&'a ModelDocument, ResolutionError> {
        self.models.get(reference).ok_or_else(|| ResolutionError::LinkFailure {
            id: id.clone(),
            missing: reference.clone(),
        })
    }

    fn check_property_type(
        &self,
        id: &ModelId,
        property_type: &PropertyType,
    ) -> Result<(), ResolutionError> {
        if let PropertyType::Reference(reference) = property_type {
            let target = self.require(id, reference)?;
            if matches!(target.kind(), ModelKind::InformationModel | ModelKind::Mapping) {
                return Err(ResolutionError::IncompatibleLink {
                    id: id.clone(),
                    target: reference.clone(),
                    reason: "property types may only reference datatypes or function blocks",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhub_domain::document::{EntityDoc, FunctionBlockDoc, Property};
    use dhub_domain::document::PrimitiveType;

    fn id(s: &str) -> ModelId {
        s.parse().unwrap()
    }

    fn raw(document: &ModelDocument) -> RawModelContent {
        RawModelContent {
            id: document.id().clone(),
            kind: document.kind(),
            bytes: serde_json::to_vec(document).unwrap(),
        }
    }

    fn entity(model_id: &str) -> ModelDocument {
        ModelDocument::Entity(EntityDoc {
            id: id(model_id),
            display_name: None,
            description: None,
            references: Vec::new(),
            properties: vec![Property {
                name: "value".into(),
                data_type: PropertyType::Primitive(PrimitiveType::Float),
                multiple: false,
                mandatory: true,
                description: None,
            }],
        })
    }

    fn function_block(model_id: &str, entity_ref: Option<&str>) -> ModelDocument {
        let references: Vec<ModelId> = entity_ref.map(id).into_iter().collect();
        ModelDocument::FunctionBlock(FunctionBlockDoc {
            id: id(model_id),
            display_name: None,
            description: None,
            references: references.clone(),
            extends: None,
            configuration: Vec::new(),
            status: entity_ref
                .map(|r| {
                    vec![Property {
                        name: "reading".into(),
                        data_type: PropertyType::Reference(id(r)),
                        multiple: false,
                        mandatory: true,
                        description: None,
                    }]
                })
                .unwrap_or_default(),
            faults: Vec::new(),
            operations: Vec::new(),
        })
    }

    #[test]
    fn links_forward_references_regardless_of_order() {
        // The function block is added before the entity it references.
        let fb = function_block("com.acme.Sensor:1.0.0", Some("com.acme.Reading:1.0.0"));
        let ent = entity("com.acme.Reading:1.0.0");

        let mut reader = WorkspaceReader::new();
        reader.add(raw(&fb));
        reader.add(raw(&ent));

        let workspace = reader.read().unwrap();
        assert_eq!(workspace.len(), 2);
        assert!(workspace.get(&id("com.acme.Reading:1.0.0")).is_some());
    }

    #[test]
    fn dangling_reference_fails_the_whole_batch() {
        let fb = function_block("com.acme.Sensor:1.0.0", Some("com.acme.Missing:1.0.0"));

        let mut reader = WorkspaceReader::new();
        reader.add(raw(&fb));

        let err = reader.read().unwrap_err();
        assert!(matches!(err, ResolutionError::LinkFailure { .. }));
    }

    #[test]
    fn unparseable_content_reports_the_offender() {
        let mut reader = WorkspaceReader::new();
        reader.add(RawModelContent {
            id: id("com.acme.Broken:1.0.0"),
            kind: ModelKind::Entity,
            bytes: b"{ not json".to_vec(),
        });

        let err = reader.read().unwrap_err();
        match err {
            ResolutionError::ParseFailure { id: offender, .. } => {
                assert_eq!(offender, id("com.acme.Broken:1.0.0"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatched_identity_is_rejected() {
        let ent = entity("com.acme.Reading:1.0.0");
        let mut reader = WorkspaceReader::new();
        reader.add(RawModelContent {
            id: id("com.acme.Other:1.0.0"),
            kind: ModelKind::Entity,
            bytes: serde_json::to_vec(&ent).unwrap(),
        });

        let err = reader.read().unwrap_err();
        assert!(matches!(err, ResolutionError::IdentityMismatch { .. }));
    }
}
