use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Custom error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error while {stage}: {source}")]
    Config { stage: &'static str, source: config::ConfigError },
}

/// A reusable configuration loader that combines file-based settings with
/// environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `hub.toml`). If no path
///    is provided, it defaults to `"hub"`.
/// 2. **Environment Overrides**: Overlays values from environment variables
///    prefixed with `DHUB__`. Nested structures are accessed using double
///    underscores (e.g., `DHUB__STORAGE__DATA_DIR` maps to `storage.data_dir`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, the environment
/// variables are malformed, or deserialization into `T` fails.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("hub"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("DHUB").separator("__").convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .map_err(|source| ConfigError::Config { stage: "building sources", source })?
        .try_deserialize::<T>()
        .map_err(|source| ConfigError::Config { stage: "deserializing", source })?;

    Ok(config)
}
