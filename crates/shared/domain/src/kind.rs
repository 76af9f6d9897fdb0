//! Model kinds and the closed kind ↔ mapping-kind correspondence.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The closed set of model kinds stored in a repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
pub enum ModelKind {
    InformationModel,
    FunctionBlock,
    Entity,
    Enumeration,
    Mapping,
}

/// The kind of model a mapping document projects. One entry per non-mapping
/// [`ModelKind`]; no other pairing is valid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum MappingKind {
    InformationModel,
    FunctionBlock,
    Entity,
    Enumeration,
}

impl ModelKind {
    /// The mapping subtype that may be applied to models of this kind.
    /// Mapping models themselves cannot be mapped.
    #[must_use]
    pub const fn mapping_kind(self) -> Option<MappingKind> {
        match self {
            Self::InformationModel => Some(MappingKind::InformationModel),
            Self::FunctionBlock => Some(MappingKind::FunctionBlock),
            Self::Entity => Some(MappingKind::Entity),
            Self::Enumeration => Some(MappingKind::Enumeration),
            Self::Mapping => None,
        }
    }

    /// File extension used by the blob layout for this kind.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::InformationModel => "infomodel",
            Self::FunctionBlock => "fbmodel",
            Self::Entity => "entity",
            Self::Enumeration => "enumtype",
            Self::Mapping => "mapping",
        }
    }

    /// Reverse lookup from a blob file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "infomodel" => Some(Self::InformationModel),
            "fbmodel" => Some(Self::FunctionBlock),
            "entity" => Some(Self::Entity),
            "enumtype" => Some(Self::Enumeration),
            "mapping" => Some(Self::Mapping),
            _ => None,
        }
    }
}
