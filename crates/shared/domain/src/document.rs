//! Typed model documents.
//!
//! The external DSL tooling parses the textual model syntax and emits typed
//! model objects; repositories store them serialized as JSON in the shape
//! defined here. The `kind` tag on the top-level enum matches [`ModelKind`],
//! so a document always knows what it is without a side channel.
//!
//! Every document declares its dependency edges in `references`; the bodies
//! additionally embed structured references (`extends`, function-block
//! properties, property types, mapping targets) that the workspace link pass
//! resolves against sibling documents.

use crate::id::ModelId;
use crate::kind::{MappingKind, ModelKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed, typed model. Tagged union over the five model kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModelDocument {
    InformationModel(InformationModelDoc),
    FunctionBlock(FunctionBlockDoc),
    Entity(EntityDoc),
    Enumeration(EnumDoc),
    Mapping(MappingDoc),
}

impl ModelDocument {
    #[must_use]
    pub const fn id(&self) -> &ModelId {
        match self {
            Self::InformationModel(doc) => &doc.id,
            Self::FunctionBlock(doc) => &doc.id,
            Self::Entity(doc) => &doc.id,
            Self::Enumeration(doc) => &doc.id,
            Self::Mapping(doc) => &doc.id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::InformationModel(_) => ModelKind::InformationModel,
            Self::FunctionBlock(_) => ModelKind::FunctionBlock,
            Self::Entity(_) => ModelKind::Entity,
            Self::Enumeration(_) => ModelKind::Enumeration,
            Self::Mapping(_) => ModelKind::Mapping,
        }
    }

    /// Declared dependency edges (the closure-discovery input).
    #[must_use]
    pub fn references(&self) -> &[ModelId] {
        match self {
            Self::InformationModel(doc) => &doc.references,
            Self::FunctionBlock(doc) => &doc.references,
            Self::Entity(doc) => &doc.references,
            Self::Enumeration(doc) => &doc.references,
            Self::Mapping(doc) => &doc.references,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::InformationModel(doc) => doc.display_name.as_deref(),
            Self::FunctionBlock(doc) => doc.display_name.as_deref(),
            Self::Entity(doc) => doc.display_name.as_deref(),
            Self::Enumeration(doc) => doc.display_name.as_deref(),
            Self::Mapping(doc) => doc.display_name.as_deref(),
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::InformationModel(doc) => doc.description.as_deref(),
            Self::FunctionBlock(doc) => doc.description.as_deref(),
            Self::Entity(doc) => doc.description.as_deref(),
            Self::Enumeration(doc) => doc.description.as_deref(),
            Self::Mapping(doc) => doc.description.as_deref(),
        }
    }
}

/// An information model composes named function blocks into a device description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationModelDoc {
    pub id: ModelId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub references: Vec<ModelId>,
    #[serde(default)]
    pub functionblocks: Vec<FunctionBlockProperty>,
}

/// A named function-block slot on an information model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionBlockProperty {
    pub name: String,
    pub functionblock: ModelId,
}

/// A function block describes one capability: configuration, status and
/// fault properties plus operations. May extend another function block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionBlockDoc {
    pub id: ModelId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub references: Vec<ModelId>,
    #[serde(default)]
    pub extends: Option<ModelId>,
    #[serde(default)]
    pub configuration: Vec<Property>,
    #[serde(default)]
    pub status: Vec<Property>,
    #[serde(default)]
    pub faults: Vec<Property>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// A structured data type with named properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDoc {
    pub id: ModelId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub references: Vec<ModelId>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A closed set of named literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDoc {
    pub id: ModelId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub references: Vec<ModelId>,
    #[serde(default)]
    pub literals: Vec<EnumLiteral>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumLiteral {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A platform overlay: projects models of one kind onto a target platform.
///
/// `references` lists the model identifiers this mapping applies to; `rules`
/// attach stereotypes and attributes to the model or to named members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDoc {
    pub id: ModelId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub references: Vec<ModelId>,
    pub mapping_kind: MappingKind,
    pub target_platform: String,
    #[serde(default)]
    pub rules: Vec<MappingRule>,
}

/// One mapping rule: a stereotype plus attribute bag attached to a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    pub target: RuleTarget,
    pub stereotype: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// What a mapping rule attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleTarget {
    /// The mapped model itself.
    Model,
    /// A named property (configuration/status/fault or entity property).
    Property { name: String },
    /// A named operation on a function block.
    Operation { name: String },
}

/// A property on a function block or entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: PropertyType,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// A property type: a primitive or a reference to another datatype model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Primitive(PrimitiveType),
    Reference(ModelId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    DateTime,
    Base64Binary,
}

/// An operation exposed by a function block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<OperationParam>,
    #[serde(default)]
    pub returns: Option<PropertyType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParam {
    pub name: String,
    pub data_type: PropertyType,
}
