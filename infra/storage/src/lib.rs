//! A sandboxed blob store for serialized model documents.
//!
//! Repositories keep every model file under one physical root, partitioned by
//! model namespace. The engine guards against common I/O pitfalls so the
//! layers above never think about the filesystem.
//!
//! # Core Features
//!
//! - **Sandbox Security**: Strict path traversal protection using physical path canonicalization.
//! - **Atomic Writes**: Uses an "atomic swap" pattern (unique temp write + `fsync` + `rename`) to prevent data corruption during crashes.
//! - **Transparent Compression**: Integrated LZ4 block compression that is invisible to the consumer.
//! - **Namespacing**: One flat, browsable directory per model namespace (`com.acme.lighting/Lamp_1.0.0.fbmodel`).
//! - **Self-Healing**: Automatically identifies and cleans up orphaned temporary files during initialization.
//!
//! # Architectural Overview
//!
//! 1.  **[`Storage`]**: The primary thread-safe handle and entry point.
//! 2.  **[`NamespacedStorage`]**: A scoped view for one model namespace.
//! 3.  **[`StorageBuilder`]**: A type-safe fluent builder for configuration.
//!
//! # Examples
//!
//! ```rust
//! use dhub_storage::{Storage, Compression, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("models");
//!     let storage = Storage::builder()
//!         .root(&root)
//!         .create(true)
//!         .compression(Compression::Lz4)
//!         .connect()
//!         .await?;
//!
//!     let ns = storage.namespace("com.acme.lighting")?;
//!     ns.write("Lamp_1.0.0.fbmodel", b"{ \"kind\": \"FunctionBlock\" }").await?;
//!
//!     let data = ns.read("Lamp_1.0.0.fbmodel").await?;
//!     assert!(!data.is_empty());
//!
//!     let listing = ns.list().await?;
//!     assert_eq!(listing.len(), 1);
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::{Compression, Storage, StorageEntry};
pub use error::StorageError;
pub use namespace::NamespacedStorage;
