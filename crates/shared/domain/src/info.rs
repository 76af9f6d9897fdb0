//! Model metadata produced by the repository indexing step.

use crate::id::ModelId;
use crate::kind::ModelKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata record for one stored model.
///
/// Built by the repository index from the stored document; read-only to the
/// resolution core and reconstructed per request. `references` carries the
/// declared dependency edges used for closure discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: ModelId,
    pub kind: ModelKind,
    /// Blob file name within the namespace, e.g. `Lamp_1.0.0.fbmodel`.
    pub file_name: String,
    #[serde(default)]
    pub references: Vec<ModelId>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Target platform key; only set for [`ModelKind::Mapping`] entries.
    #[serde(default)]
    pub target_platform: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl ModelInfo {
    /// Minimal record; the indexer fills the optional metadata afterwards.
    #[must_use]
    pub fn new(id: ModelId, kind: ModelKind, file_name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            file_name: file_name.into(),
            references: Vec::new(),
            display_name: None,
            description: None,
            target_platform: None,
            created: None,
        }
    }
}

/// Raw stored bytes of one model, fetched on demand from the blob store.
/// Never cached by the resolution core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelContent {
    pub id: ModelId,
    pub kind: ModelKind,
    pub bytes: Vec<u8>,
}
