//! Batch building of many logical configs.

use super::loader::ConfigLoader;
use super::types::{Config, ConfigMap, ConfigOptions, Params};
use crate::error::{ConfigValidationError, ConfigsBuildError, Result};
use futures::future::try_join_all;
use indexmap::IndexMap;
use std::hash::Hash;
use tracing::{info, warn};

/// Outcome of one logical config: its key, validation error and final config.
type ConfEntry<K> = (K, Option<ConfigValidationError>, Config);

async fn load_entry<K: Clone>(
    loader: &ConfigLoader,
    options: &ConfigOptions<K>,
) -> Result<ConfEntry<K>> {
    let (failure, config) = loader.load_validated(options).await?;

    let error = failure.map(|cause| {
        warn!("Config '{}' failed validation: {:#}", options.file_name, cause);
        ConfigValidationError::new(&options.file_name, cause)
    });

    Ok((options.key.clone(), error, config))
}

/// Load every requested config concurrently.
///
/// Validation failures do not stop the build: the returned map holds every
/// requested config, and the failures come back together as one
/// [`ConfigsBuildError`]. Load failures (other than absent files) and key path
/// failures abort the call with `Err`.
pub async fn build<K>(
    params: Params<K>,
) -> Result<(Option<ConfigsBuildError>, ConfigMap<K>)>
where
    K: Eq + Hash + Clone,
{
    let loader = ConfigLoader::from_params(&params);

    let entries = try_join_all(
        params
            .config_options
            .iter()
            .map(|options| load_entry(&loader, options)),
    )
    .await?;

    let mut errors = Vec::new();
    let mut configs = IndexMap::with_capacity(entries.len());
    for (key, error, config) in entries {
        errors.extend(error);
        configs.insert(key, config);
    }

    info!(
        "Built {} config(s) from {} ({} failed validation)",
        configs.len(),
        params.dir.display(),
        errors.len()
    );

    Ok((ConfigsBuildError::from_errors(errors), configs))
}

/// Like [`build`], but a validation failure is returned as
/// [`ConfigError::Build`](crate::error::ConfigError::Build).
pub async fn build_or_throw<K>(params: Params<K>) -> Result<ConfigMap<K>>
where
    K: Eq + Hash + Clone,
{
    match build(params).await? {
        (Some(error), _) => Err(error.into()),
        (None, configs) => Ok(configs),
    }
}
