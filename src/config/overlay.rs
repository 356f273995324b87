//! Environment variable overlay.
//!
//! Applied after merging: every declared key path whose variable is present
//! (and survives its parser) overwrites the merged value. Absent variables
//! leave the config untouched.

use super::inject::set_value;
use super::types::{Config, EnvSource, KeyOptions};
use crate::error::KeyPathError;
use tracing::debug;

/// Apply `key_options` to `config` in declaration order.
///
/// Returns the number of key paths that were overwritten.
pub fn apply_env_overrides(
    config: &mut Config,
    env_source: &EnvSource,
    key_options: &[(String, KeyOptions)],
) -> Result<usize, KeyPathError> {
    let mut applied = 0;

    for (key_path, options) in key_options {
        let Some(value) = options.resolve(env_source) else {
            continue;
        };

        debug!(
            key_path = %key_path,
            env = options.env.as_deref().unwrap_or_default(),
            "Applying env override"
        );
        set_value(config, key_path, value)?;
        applied += 1;
    }

    Ok(applied)
}
