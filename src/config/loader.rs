//! Single config loading pipeline.
//!
//! For one logical config: build the file chain, load every candidate
//! concurrently, merge in chain order, apply env overrides, validate.

use super::chain::ChainLayout;
use super::files::{FileLoader, FsLoader};
use super::overlay::apply_env_overrides;
use super::types::{Config, ConfigOptions, EnvSource, Merger, Params, empty_config};
use crate::error::{ConfigError, LoadError};
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Snapshot of the process environment. Entries that are not valid UTF-8 are
/// skipped.
fn process_env() -> EnvSource {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Loads logical configs from the tier directories.
#[derive(Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
    env: String,
    base_dir: String,
    priority_dir: String,
    extensions: Vec<String>,
    file_loader: Arc<dyn FileLoader>,
    merge: Arc<dyn Merger>,
    env_source: EnvSource,
}

impl ConfigLoader {
    /// Create a loader from build params, filling in the default file loader
    /// and the process environment where params leave them unset.
    pub fn from_params<K>(params: &Params<K>) -> Self {
        Self {
            dir: params.dir.clone(),
            env: params.env.clone(),
            base_dir: params.base_dir.clone(),
            priority_dir: params.priority_dir.clone(),
            extensions: params.sorted_extension.clone(),
            file_loader: params
                .load_config_file
                .clone()
                .unwrap_or_else(|| Arc::new(FsLoader) as Arc<dyn FileLoader>),
            merge: Arc::clone(&params.merge),
            env_source: params
                .env_source
                .clone()
                .unwrap_or_else(process_env),
        }
    }

    pub fn layout(&self) -> ChainLayout<'_> {
        ChainLayout {
            dir: &self.dir,
            env: &self.env,
            base_dir: &self.base_dir,
            priority_dir: &self.priority_dir,
            extensions: &self.extensions,
        }
    }

    /// Candidate files for `name`, lowest priority first.
    pub fn file_chain(&self, name: &str) -> Vec<PathBuf> {
        self.layout().file_chain(name)
    }

    /// Load and merge every fragment of `name`.
    pub async fn load_merged(&self, name: &str) -> Result<Config, LoadError> {
        let chain = self.file_chain(name);
        debug!("Loading config '{}' from {} candidate files", name, chain.len());

        let fragments = try_join_all(chain.iter().map(|path| self.file_loader.load(path))).await?;

        let mut configs = Vec::with_capacity(fragments.len() + 1);
        configs.push(empty_config());
        configs.extend(fragments);

        Ok(self.merge.merge(configs))
    }

    /// Run the whole pipeline for one config.
    ///
    /// The first element is the validator's failure, if any. Load and key path
    /// failures are returned as `Err` and are not validation failures.
    pub async fn load_validated<K>(
        &self,
        options: &ConfigOptions<K>,
    ) -> Result<(Option<anyhow::Error>, Config), ConfigError> {
        let mut config = self.load_merged(&options.file_name).await?;

        let applied = apply_env_overrides(&mut config, &self.env_source, &options.key_options)?;
        if applied > 0 {
            debug!(
                "Applied {} env override(s) to config '{}'",
                applied, options.file_name
            );
        }

        let failure = match &options.validator {
            Some(validator) => validator.validate(&config).await.err(),
            None => None,
        };

        Ok((failure, config))
    }
}
