//! # Domain Models
//!
//! This crate contains the pure domain types of DeviceHub: model identifiers,
//! model metadata, the typed model documents produced by the external DSL
//! tooling, and the assembled model-content bundle.
//! Keep it lean: no I/O, networking, or heavy logic—just data and simple helpers.

pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod id;
pub mod info;
pub mod kind;

pub use config::HubConfig;
pub use content::{ModelContentBundle, ProjectedModel, Stereotype};
pub use document::ModelDocument;
pub use error::DomainError;
pub use id::ModelId;
pub use info::{ModelInfo, RawModelContent};
pub use kind::{MappingKind, ModelKind};
