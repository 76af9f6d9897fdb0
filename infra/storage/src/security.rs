use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Collapse `.` / `..` lexically while ensuring the path never escapes the sandbox root.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StorageError::PathTraversal {
                        path: path.to_path_buf(),
                        reason: "'..' climbs above the sandbox root",
                    });
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversal {
                    path: path.to_path_buf(),
                    reason: "absolute paths are not allowed",
                });
            },
        }
    }

    Ok(out)
}

/// Safely joins a path to the root and ensures it doesn't escape the sandbox.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let path = path.as_ref();

    if path.is_absolute() {
        return Err(StorageError::PathTraversal {
            path: path.to_path_buf(),
            reason: "absolute paths are not allowed",
        });
    }

    let safe_rel = normalize_relative(path)?;
    let joined = root.join(safe_rel);

    match joined.canonicalize() {
        Ok(canonical) => validate_canonical(root, canonical),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => validate_path(root, &joined),
        Err(e) => Err(StorageError::io(joined, e)),
    }
}

fn validate_canonical(root: &Path, canonical: PathBuf) -> Result<PathBuf, StorageError> {
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(StorageError::PathTraversal {
            path: canonical,
            reason: "resolved path lies outside the sandbox",
        })
    }
}

/// Validates a path that doesn't exist yet by finding and verifying its first
/// existing ancestor.
///
/// Walks up the directory tree from the target until a parent exists on disk,
/// then verifies that parent canonicalizes into the sandbox. This allows safe
/// validation of nested paths without requiring the directories to exist, and
/// catches symlinked parents pointing outside the root.
fn validate_path(root: &Path, joined: &Path) -> Result<PathBuf, StorageError> {
    if !joined.starts_with(root) {
        return Err(StorageError::PathTraversal {
            path: joined.to_path_buf(),
            reason: "path is outside sandbox boundaries",
        });
    }

    let mut current = Some(joined);

    while let Some(path) = current {
        if path == root {
            return Ok(joined.to_path_buf());
        }

        if path.exists() {
            return match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined.to_path_buf()),
                Ok(canonical) => Err(StorageError::PathTraversal {
                    path: canonical,
                    reason: "existing parent directory is a symlink outside the sandbox",
                }),
                Err(e) => Err(StorageError::io(path, e)),
            };
        }

        current = path.parent();
    }

    Err(StorageError::PathTraversal {
        path: joined.to_path_buf(),
        reason: "no valid parent directory found within the sandbox",
    })
}
