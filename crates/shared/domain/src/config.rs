use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level hub configuration shared across subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfigInner {
    pub storage: StorageConfig,
    pub repositories: Vec<RepositoryConfig>,
    pub cache: CacheConfig,
    pub resolver: ResolverConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct HubConfig {
    #[serde(flatten, default)]
    inner: Arc<HubConfigInner>,
}

impl Deref for HubConfig {
    type Target = HubConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for HubConfig {
    fn deref_mut(&mut self) -> &mut HubConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Blob-store root and compression switch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub compression: bool,
}

/// One isolated repository and the model namespaces it owns.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    pub namespaces: Vec<String>,
}

/// TTL and capacity for the repository metadata index cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub capacity: u64,
}

/// Knobs for the concurrent closure-discovery fan-out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Upper bound on models expanded per request; guards runaway graphs.
    pub max_models: usize,
}

// --- Default ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data"), compression: false }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 60, capacity: 1_000 }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_models: 10_000 }
    }
}
