//! Model identifiers with a stable wire form.
//!
//! A model is addressed by `namespace.Name:version`, e.g.
//! `com.acme.lighting.DimmableLamp:1.2.0`. The identifier is an immutable
//! value type; equality, ordering and hashing cover all three fields, and the
//! canonical display form doubles as the serde representation.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Version tag that dereferences to the highest released version of a model.
pub const LATEST_TAG: &str = "latest";

/// Fully qualified, versioned model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId {
    namespace: String,
    name: String,
    version: String,
}

impl ModelId {
    /// Builds an identifier, validating each part.
    ///
    /// Namespaces are lowercase dot-separated segments (`[a-z0-9_]`, starting
    /// with a letter); names are identifiers starting with a letter; versions
    /// are non-empty and free of whitespace and `:`.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidIdentifier`] when any part is malformed.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let namespace = namespace.into();
        let name = name.into();
        let version = version.into();

        validate_namespace(&namespace)?;
        validate_name(&name)?;
        validate_version(&version)?;

        Ok(Self { namespace, name, version })
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Namespace-qualified name without the version (`com.acme.Lamp`).
    #[must_use]
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Whether the version part is the `latest` tag rather than a concrete version.
    #[must_use]
    pub fn is_latest_tag(&self) -> bool {
        self.version == LATEST_TAG
    }

    /// Same model at a different version. The version is assumed valid
    /// (it comes from an already-validated identifier in every call site).
    #[must_use]
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self { namespace: self.namespace.clone(), name: self.name.clone(), version: version.into() }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.namespace, self.name, self.version)
    }
}

impl FromStr for ModelId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (fqn, version) = s.rsplit_once(':').ok_or_else(|| DomainError::InvalidIdentifier {
            value: s.to_owned(),
            reason: "missing ':' version separator",
        })?;
        let (namespace, name) =
            fqn.rsplit_once('.').ok_or_else(|| DomainError::InvalidIdentifier {
                value: s.to_owned(),
                reason: "missing '.' between namespace and name",
            })?;
        Self::new(namespace, name, version)
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Orders concrete versions numerically on their dotted segments.
///
/// A pre-release suffix (`1.0.0-beta`) sorts below the plain release with the
/// same numeric triple; two suffixes compare lexicographically. Non-numeric
/// segments fall back to lexicographic comparison so arbitrary version
/// strings still order deterministically.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_core, a_suffix) = split_suffix(a);
    let (b_core, b_suffix) = split_suffix(b);

    let mut a_segments = a_core.split('.');
    let mut b_segments = b_core.split('.');

    loop {
        match (a_segments.next(), b_segments.next()) {
            (None, None) => break,
            (Some(seg), None) => {
                if seg.parse::<u64>().map_or(true, |n| n > 0) {
                    return Ordering::Greater;
                }
            },
            (None, Some(seg)) => {
                if seg.parse::<u64>().map_or(true, |n| n > 0) {
                    return Ordering::Less;
                }
            },
            (Some(sa), Some(sb)) => {
                let ordering = match (sa.parse::<u64>(), sb.parse::<u64>()) {
                    (Ok(na), Ok(nb)) => na.cmp(&nb),
                    _ => sa.cmp(sb),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            },
        }
    }

    match (a_suffix, b_suffix) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(sa), Some(sb)) => sa.cmp(sb),
    }
}

fn split_suffix(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((core, suffix)) => (core, Some(suffix)),
        None => (version, None),
    }
}

fn validate_namespace(namespace: &str) -> Result<(), DomainError> {
    if namespace.is_empty() {
        return Err(invalid(namespace, "namespace cannot be empty"));
    }
    for segment in namespace.split('.') {
        if segment.is_empty() {
            return Err(invalid(namespace, "namespace contains an empty segment"));
        }
        if !segment.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return Err(invalid(namespace, "namespace segments must start with a lowercase letter"));
        }
        if !segment.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(invalid(namespace, "namespace segments must be lowercase alphanumeric"));
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(invalid(name, "name cannot be empty"));
    }
    if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(name, "name must start with a letter"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(name, "name must be alphanumeric"));
    }
    Ok(())
}

fn validate_version(version: &str) -> Result<(), DomainError> {
    if version.is_empty() {
        return Err(invalid(version, "version cannot be empty"));
    }
    if version.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(invalid(version, "version contains illegal characters"));
    }
    Ok(())
}

fn invalid(value: &str, reason: &'static str) -> DomainError {
    DomainError::InvalidIdentifier { value: value.to_owned(), reason }
}
