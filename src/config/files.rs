//! Config file loading.
//!
//! A [`FileLoader`] turns one candidate path into a config fragment. Absent
//! files must come back as an empty config; any other failure aborts the build.

use super::types::{Config, DEFAULT_EXTENSIONS, empty_config};
use crate::error::LoadError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, trace};

/// Loads one candidate config file.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Config, LoadError>;
}

/// Default loader: reads JSON and YAML files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl FsLoader {
    fn parse(path: &Path, extension: &str, content: &str) -> Result<Config, LoadError> {
        let value: Value = match extension {
            "json" => serde_json::from_str(content).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
        };

        // An empty YAML document parses to null
        Ok(if value.is_null() { empty_config() } else { value })
    }
}

#[async_trait]
impl FileLoader for FsLoader {
    async fn load(&self, path: &Path) -> Result<Config, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        if !DEFAULT_EXTENSIONS.contains(&extension) {
            return Err(LoadError::UnsupportedExtension {
                extension: extension.to_string(),
                supported: DEFAULT_EXTENSIONS
                    .iter()
                    .map(|ext| format!("*.{ext}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                trace!("Config file not found: {}", path.display());
                return Ok(empty_config());
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        debug!("Loaded config file: {}", path.display());
        Self::parse(path, extension, &content)
    }
}

/// Adapts a synchronous function to [`FileLoader`].
pub struct FnLoader<F>(F);

impl<F> FnLoader<F>
where
    F: Fn(&Path) -> Result<Config, LoadError> + Send + Sync,
{
    pub fn new(load: F) -> Self {
        Self(load)
    }
}

#[async_trait]
impl<F> FileLoader for FnLoader<F>
where
    F: Fn(&Path) -> Result<Config, LoadError> + Send + Sync,
{
    async fn load(&self, path: &Path) -> Result<Config, LoadError> {
        (self.0)(path)
    }
}
