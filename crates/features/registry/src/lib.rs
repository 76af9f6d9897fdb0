//! # Model Registry
//!
//! This crate locates repositories and answers metadata questions about the
//! models they hold. A [`RepositoryRegistry`] maps each model namespace to
//! the [`ModelRepository`] that owns it; the blob-backed
//! [`FileModelRepository`] implements the trait on top of `dhub-storage`,
//! with a TTL-bounded metadata index so repeated lookups during closure
//! discovery do not re-read every file.

mod error;
mod file_repository;
mod locator;
mod repository;

pub use error::RegistryError;
pub use file_repository::FileModelRepository;
pub use locator::RepositoryRegistry;
pub use repository::ModelRepository;
