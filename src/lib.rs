//! Tiered Config Library
//!
//! Loads configuration fragments from a tiered directory layout
//! (`base/`, `<env>/`, `local/`), merges them in priority order, applies
//! environment variable overrides to dotted key paths and validates the
//! result. Also renders markdown documentation tables for config files.

pub mod config;
pub mod doc;
pub mod error;
pub mod logging;

pub use config::{
    Config, ConfigMap, ConfigOptions, EnvParser, EnvSource, FileLoader, FsLoader, KeyOptions,
    Merger, Params, Validator, build, build_or_throw, config_as, empty_config, parsers,
};
pub use doc::{ConfigDoc, DocOptions, KeyDoc, LINE_ENDING, write_doc};
pub use error::{
    ConfigError, ConfigValidationError, ConfigsBuildError, KeyPathError, LoadError,
};
