//! Error types for config loading and validation.
//!
//! Two families live here:
//! - fatal errors ([`LoadError`], [`KeyPathError`]) that abort a whole build call
//! - validation errors ([`ConfigValidationError`], [`ConfigsBuildError`]) that are
//!   collected per config file and reported together

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a single candidate config file.
///
/// A missing file is not an error: loaders report it as an empty config.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Config build works with: {supported} files only. Unsupported extension: {extension}")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },

    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Failure raised by a caller-supplied loader.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A dotted key path could not be written into the config tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyPathError {
    #[error("Cannot set '{key_path}': segment '{segment}' is not an object or array")]
    NotAContainer { key_path: String, segment: String },

    #[error("Cannot set '{key_path}': '{segment}' is not a valid array index")]
    InvalidIndex { key_path: String, segment: String },
}

/// Validation failure of one logical config, attributed to its file name.
#[derive(Debug, Error)]
#[error("Config validation error. See cause for more info. File name: {file_name}")]
pub struct ConfigValidationError {
    pub file_name: String,
    #[source]
    pub source: anyhow::Error,
}

impl ConfigValidationError {
    /// Wrap a validator failure.
    ///
    /// A cause that already is a `ConfigValidationError` is returned as is, so
    /// validators may attribute failures to another file name themselves.
    pub fn new(file_name: impl Into<String>, cause: anyhow::Error) -> Self {
        match cause.downcast::<ConfigValidationError>() {
            Ok(err) => err,
            Err(cause) => Self {
                file_name: file_name.into(),
                source: cause,
            },
        }
    }
}

/// Composite error carrying every validation failure of one build call.
#[derive(Debug)]
pub struct ConfigsBuildError {
    errors: Vec<ConfigValidationError>,
}

impl ConfigsBuildError {
    /// Aggregate validation errors; `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<ConfigValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[ConfigValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ConfigValidationError> {
        self.errors
    }

    /// File names of the configs that failed validation.
    pub fn file_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.file_name.as_str()).collect()
    }
}

impl fmt::Display for ConfigsBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configs build error. See cause for more info. Failed: {}",
            self.file_names().join(", ")
        )
    }
}

impl std::error::Error for ConfigsBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Fatal error of a build call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    KeyPath(#[from] KeyPathError),

    #[error(transparent)]
    Build(#[from] ConfigsBuildError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::error::Error as _;

    #[test]
    fn test_validation_error_wraps_cause() {
        let err = ConfigValidationError::new("pg", anyhow!("host is undefined"));
        assert_eq!(err.file_name, "pg");
        assert!(err.to_string().contains("File name: pg"));
        assert_eq!(err.source().unwrap().to_string(), "host is undefined");
    }

    #[test]
    fn test_validation_error_is_not_wrapped_twice() {
        let inner = ConfigValidationError::new("db", anyhow!("bad"));
        let err = ConfigValidationError::new("pg", anyhow::Error::new(inner));
        assert_eq!(err.file_name, "db");
    }

    #[test]
    fn test_build_error_from_empty_list() {
        assert!(ConfigsBuildError::from_errors(vec![]).is_none());
    }

    #[test]
    fn test_build_error_lists_failed_files() {
        let err = ConfigsBuildError::from_errors(vec![
            ConfigValidationError::new("pg", anyhow!("a")),
            ConfigValidationError::new("redis", anyhow!("b")),
        ])
        .unwrap();

        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.file_names(), vec!["pg", "redis"]);
        assert!(err.to_string().ends_with("pg, redis"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unsupported_extension_message() {
        let err = LoadError::UnsupportedExtension {
            extension: "toml".into(),
            supported: "*.json, *.yaml, *.yml".into(),
        };
        assert_eq!(
            err.to_string(),
            "Config build works with: *.json, *.yaml, *.yml files only. Unsupported extension: toml"
        );
    }
}
