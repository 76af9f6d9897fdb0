//! The assembled model-content bundle.

use crate::document::ModelDocument;
use crate::error::DomainError;
use crate::id::ModelId;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// A stereotype applied by a platform mapping: a tag plus attribute bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stereotype {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

/// One bundle entry: the flattened model, optionally projected through a
/// platform mapping.
///
/// `target_platform` is set whenever a platform was requested, even when no
/// mapping matched; the distinction between "no mapping available" and
/// "mapping not requested" matters to consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedModel {
    pub model: ModelDocument,
    pub target_platform: Option<String>,
    pub applied_mapping: Option<ModelId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stereotypes: Vec<Stereotype>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub member_stereotypes: BTreeMap<String, Vec<Stereotype>>,
}

impl ProjectedModel {
    /// An unmapped entry, tagged with the platform key when one was requested.
    #[must_use]
    pub fn unmapped(model: ModelDocument, target_platform: Option<String>) -> Self {
        Self {
            model,
            target_platform,
            applied_mapping: None,
            stereotypes: Vec::new(),
            member_stereotypes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ModelId {
        self.model.id()
    }
}

/// The final output of one resolution request: a designated root plus an
/// insertion-ordered, unique map of projected models.
///
/// Insertion order follows resolution (topological) order. The bundle is
/// immutable once handed to the caller.
#[derive(Debug, Clone)]
pub struct ModelContentBundle {
    root: ModelId,
    order: Vec<ModelId>,
    models: HashMap<ModelId, ProjectedModel>,
}

impl ModelContentBundle {
    #[must_use]
    pub fn new(root: ModelId) -> Self {
        Self { root, order: Vec::new(), models: HashMap::new() }
    }

    #[must_use]
    pub const fn root(&self) -> &ModelId {
        &self.root
    }

    /// Appends an entry, keyed by the model's identifier.
    ///
    /// # Errors
    /// Returns [`DomainError::DuplicateModel`] if the identifier is already
    /// present. The closure guarantees uniqueness, so a duplicate means a
    /// pipeline bug upstream.
    pub fn insert(&mut self, entry: ProjectedModel) -> Result<(), DomainError> {
        let id = entry.id().clone();
        if self.models.contains_key(&id) {
            return Err(DomainError::DuplicateModel { id });
        }
        self.order.push(id.clone());
        self.models.insert(id, entry);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &ModelId) -> Option<&ProjectedModel> {
        self.models.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ModelId) -> bool {
        self.models.contains_key(id)
    }

    /// Entries in insertion (resolution) order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectedModel> {
        self.order.iter().filter_map(|id| self.models.get(id))
    }

    /// Identifiers in insertion (resolution) order.
    #[must_use]
    pub fn ids(&self) -> &[ModelId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for ModelContentBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ModelContentBundle", 2)?;
        state.serialize_field("root", &self.root)?;
        state.serialize_field("models", &self.iter().collect::<Vec<_>>())?;
        state.end()
    }
}
