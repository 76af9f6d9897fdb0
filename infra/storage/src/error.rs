use std::path::PathBuf;
use thiserror::Error;

/// A specialized error enum for the storage engine.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("path escapes the storage sandbox ({reason}): {path}")]
    PathTraversal { path: PathBuf, reason: &'static str },

    #[error("invalid namespace '{name}': {reason}")]
    InvalidNamespace { name: String, reason: &'static str },

    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decompression failed for {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: lz4_flex::block::DecompressError,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
