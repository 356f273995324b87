//! Configuration request types.
//!
//! [`Params`] describes one build call: where the tiers live, how fragments are
//! loaded and merged, and which logical configs ([`ConfigOptions`]) to produce.

use super::files::{FileLoader, FnLoader};
use crate::error::LoadError;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded configuration tree. Root is normally an object.
pub type Config = Value;

/// Environment variables available to the env overlay.
pub type EnvSource = HashMap<String, String>;

/// Result map of a build call, keyed by config key, in request order.
pub type ConfigMap<K = String> = IndexMap<K, Config>;

/// Converts a raw environment value. `None` means "no value", the config is left untouched.
pub type EnvParser = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Default tier directory names.
pub const DEFAULT_BASE_DIR: &str = "base";
pub const DEFAULT_PRIORITY_DIR: &str = "local";

/// Default file extensions, ascending priority.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// The config an absent file stands for.
pub fn empty_config() -> Config {
    Value::Object(Map::new())
}

/// Deserialize a loaded config into a typed struct.
pub fn config_as<T: DeserializeOwned>(config: &Config) -> Result<T, serde_json::Error> {
    T::deserialize(config)
}

/// How to source one config key from the environment.
#[derive(Clone, Default)]
pub struct KeyOptions {
    /// Name of the environment variable.
    pub env: Option<String>,
    /// Conversion of the raw value (identity when unset).
    pub parser: Option<EnvParser>,
    /// Human readable description, used by the doc writer.
    pub description: Option<String>,
}

impl KeyOptions {
    /// Read the key from the given environment variable.
    pub fn env(name: impl Into<String>) -> Self {
        Self {
            env: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Resolve the value for this key from `env_source`, if any.
    pub(crate) fn resolve(&self, env_source: &EnvSource) -> Option<Value> {
        let raw = env_source.get(self.env.as_deref()?)?;
        match &self.parser {
            Some(parse) => parse(raw),
            None => Some(Value::String(raw.clone())),
        }
    }
}

impl fmt::Debug for KeyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyOptions")
            .field("env", &self.env)
            .field("parser", &self.parser.as_ref().map(|_| "<fn>"))
            .field("description", &self.description)
            .finish()
    }
}

/// Validates a final config.
///
/// `Ok(())` means the config is valid; any error is reported as a validation
/// failure of that config file.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, config: &Config) -> anyhow::Result<()>;
}

struct FnValidator<F>(F);

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&Config) -> anyhow::Result<()> + Send + Sync,
{
    async fn validate(&self, config: &Config) -> anyhow::Result<()> {
        (self.0)(config)
    }
}

/// Merges the fragments of one logical config.
///
/// Receives an empty accumulator followed by every fragment of the chain,
/// lowest priority first. Merge semantics are up to the implementation.
pub trait Merger: Send + Sync {
    fn merge(&self, configs: Vec<Config>) -> Config;
}

impl<F> Merger for F
where
    F: Fn(Vec<Config>) -> Config + Send + Sync,
{
    fn merge(&self, configs: Vec<Config>) -> Config {
        self(configs)
    }
}

/// One logical config request.
#[derive(Clone)]
pub struct ConfigOptions<K = String> {
    /// Logical name, used to build the file chain.
    pub file_name: String,
    /// Key of this config in the result map.
    pub key: K,
    pub validator: Option<Arc<dyn Validator>>,
    /// Dotted key paths sourced from the environment, in declaration order.
    pub key_options: Vec<(String, KeyOptions)>,
}

impl ConfigOptions<String> {
    /// Request `file_name`, keyed by the file name itself.
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            key: file_name.clone(),
            file_name,
            validator: None,
            key_options: Vec::new(),
        }
    }
}

impl<K> ConfigOptions<K> {
    /// Use `key` instead of the file name in the result map.
    pub fn with_key<T>(self, key: T) -> ConfigOptions<T> {
        ConfigOptions {
            file_name: self.file_name,
            key,
            validator: self.validator,
            key_options: self.key_options,
        }
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Validate with a synchronous function.
    pub fn validate_with<F>(self, validate: F) -> Self
    where
        F: Fn(&Config) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.with_validator(FnValidator(validate))
    }

    pub fn with_key_option(mut self, key_path: impl Into<String>, options: KeyOptions) -> Self {
        self.key_options.push((key_path.into(), options));
        self
    }

    /// Shorthand for a key read verbatim from `env`.
    pub fn with_env(self, key_path: impl Into<String>, env: impl Into<String>) -> Self {
        self.with_key_option(key_path, KeyOptions::env(env))
    }
}

impl<K: fmt::Debug> fmt::Debug for ConfigOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOptions")
            .field("file_name", &self.file_name)
            .field("key", &self.key)
            .field("validator", &self.validator.as_ref().map(|_| "<validator>"))
            .field("key_options", &self.key_options)
            .finish()
    }
}

/// Parameters of one build call.
#[derive(Clone)]
pub struct Params<K = String> {
    /// Directory containing the tier subdirectories.
    pub dir: PathBuf,
    /// Environment name, selects the environment tier directory.
    pub env: String,
    /// Tier with defaults (default: `base`).
    pub base_dir: String,
    /// Tier overriding every other one (default: `local`).
    pub priority_dir: String,
    /// Loaded extensions in ascending priority.
    pub sorted_extension: Vec<String>,
    /// Environment for key overrides (default: process environment).
    pub env_source: Option<EnvSource>,
    pub merge: Arc<dyn Merger>,
    pub config_options: Vec<ConfigOptions<K>>,
    /// File loader override (default: [`super::FsLoader`]).
    pub load_config_file: Option<Arc<dyn FileLoader>>,
}

impl<K> Params<K> {
    pub fn new(dir: impl Into<PathBuf>, env: impl Into<String>, merge: impl Merger + 'static) -> Self {
        Self {
            dir: dir.into(),
            env: env.into(),
            base_dir: DEFAULT_BASE_DIR.to_string(),
            priority_dir: DEFAULT_PRIORITY_DIR.to_string(),
            sorted_extension: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            env_source: None,
            merge: Arc::new(merge),
            config_options: Vec::new(),
            load_config_file: None,
        }
    }

    /// Build params from `TIERED_CONFIG_*` variables found in `env_source`.
    ///
    /// - `TIERED_CONFIG_DIR` (default: `config`)
    /// - `TIERED_CONFIG_ENV` (default: `development`)
    /// - `TIERED_CONFIG_BASE_DIR`, `TIERED_CONFIG_PRIORITY_DIR`
    /// - `TIERED_CONFIG_EXTENSIONS` - comma separated, ascending priority
    pub fn discover(env_source: &EnvSource, merge: impl Merger + 'static) -> Self {
        let var = |name: &str| {
            env_source
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut params = Self::new(
            var("TIERED_CONFIG_DIR").unwrap_or("config"),
            var("TIERED_CONFIG_ENV").unwrap_or("development"),
            merge,
        );

        if let Some(base_dir) = var("TIERED_CONFIG_BASE_DIR") {
            params.base_dir = base_dir.to_string();
        }
        if let Some(priority_dir) = var("TIERED_CONFIG_PRIORITY_DIR") {
            params.priority_dir = priority_dir.to_string();
        }
        if let Some(extensions) = var("TIERED_CONFIG_EXTENSIONS") {
            params = params.with_extensions(
                extensions
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty()),
            );
        }

        params
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_priority_dir(mut self, priority_dir: impl Into<String>) -> Self {
        self.priority_dir = priority_dir.into();
        self
    }

    /// Replace the extension list (ascending priority).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sorted_extension = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env_source(mut self, env_source: EnvSource) -> Self {
        self.env_source = Some(env_source);
        self
    }

    pub fn with_config(mut self, options: ConfigOptions<K>) -> Self {
        self.config_options.push(options);
        self
    }

    pub fn with_configs(mut self, options: impl IntoIterator<Item = ConfigOptions<K>>) -> Self {
        self.config_options.extend(options);
        self
    }

    pub fn with_loader(mut self, loader: impl FileLoader + 'static) -> Self {
        self.load_config_file = Some(Arc::new(loader));
        self
    }

    /// Load files with a synchronous function.
    pub fn with_loader_fn<F>(self, load: F) -> Self
    where
        F: Fn(&Path) -> Result<Config, LoadError> + Send + Sync + 'static,
    {
        self.with_loader(FnLoader::new(load))
    }
}

impl<K: fmt::Debug> fmt::Debug for Params<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("dir", &self.dir)
            .field("env", &self.env)
            .field("base_dir", &self.base_dir)
            .field("priority_dir", &self.priority_dir)
            .field("sorted_extension", &self.sorted_extension)
            .field("config_options", &self.config_options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn last_wins(configs: Vec<Config>) -> Config {
        configs.into_iter().last().unwrap_or_else(empty_config)
    }

    fn env(pairs: &[(&str, &str)]) -> EnvSource {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_params_defaults() {
        let params: Params = Params::new("./config", "test", last_wins);
        assert_eq!(params.base_dir, "base");
        assert_eq!(params.priority_dir, "local");
        assert_eq!(params.sorted_extension, vec!["json", "yaml", "yml"]);
        assert!(params.env_source.is_none());
        assert!(params.load_config_file.is_none());
    }

    #[test]
    fn test_config_options_key_defaults_to_file_name() {
        let options = ConfigOptions::new("pg");
        assert_eq!(options.key, "pg");

        let keyed = options.with_key(42u32);
        assert_eq!(keyed.key, 42);
        assert_eq!(keyed.file_name, "pg");
    }

    #[test]
    fn test_key_options_resolve() {
        let source = env(&[("PG_HOST", "db.local"), ("PG_PORT", "5432")]);

        let host = KeyOptions::env("PG_HOST");
        assert_eq!(host.resolve(&source), Some(json!("db.local")));

        let port = KeyOptions::env("PG_PORT").with_parser(|raw| raw.parse::<u16>().ok().map(Value::from));
        assert_eq!(port.resolve(&source), Some(json!(5432)));

        let missing = KeyOptions::env("PG_USER");
        assert_eq!(missing.resolve(&source), None);

        let no_env = KeyOptions::default().with_description("documented only");
        assert_eq!(no_env.resolve(&source), None);
    }

    #[test]
    fn test_parser_may_drop_value() {
        let source = env(&[("PG_PORT", "not-a-port")]);
        let port = KeyOptions::env("PG_PORT").with_parser(|raw| raw.parse::<u16>().ok().map(Value::from));
        assert_eq!(port.resolve(&source), None);
    }

    #[test]
    fn test_discover_defaults() {
        let params: Params = Params::discover(&EnvSource::new(), last_wins);
        assert_eq!(params.dir, PathBuf::from("config"));
        assert_eq!(params.env, "development");
        assert_eq!(params.base_dir, "base");
    }

    #[test]
    fn test_discover_from_env() {
        let source = env(&[
            ("TIERED_CONFIG_DIR", "/etc/app"),
            ("TIERED_CONFIG_ENV", "production"),
            ("TIERED_CONFIG_BASE_DIR", "defaults"),
            ("TIERED_CONFIG_PRIORITY_DIR", "override"),
            ("TIERED_CONFIG_EXTENSIONS", "yaml, json"),
        ]);
        let params: Params = Params::discover(&source, last_wins);

        assert_eq!(params.dir, PathBuf::from("/etc/app"));
        assert_eq!(params.env, "production");
        assert_eq!(params.base_dir, "defaults");
        assert_eq!(params.priority_dir, "override");
        assert_eq!(params.sorted_extension, vec!["yaml", "json"]);
    }

    #[test]
    fn test_config_as_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Pg {
            host: String,
            port: u16,
        }

        let config = json!({"host": "localhost", "port": 5432, "extra": true});
        let pg: Pg = config_as(&config).unwrap();
        assert_eq!(
            pg,
            Pg {
                host: "localhost".into(),
                port: 5432
            }
        );
    }
}
