//! Tiered configuration loading.
//!
//! A logical config `name` is assembled from up to three tiers below `dir`:
//! 1. **Base** - `dir/base/` defaults
//! 2. **Environment** - `dir/<env>/` (e.g. `dir/production/`)
//! 3. **Priority** - `dir/local/` overrides any other tier
//!
//! Inside each tier every extension is tried (`json`, `yaml`, `yml` by
//! default, ascending priority). Missing files count as empty.
//!
//! ## Merge Strategy
//! Merging is delegated to a caller-supplied [`Merger`]; this module only fixes
//! the order: an empty accumulator, then base, environment and priority
//! fragments.
//!
//! ## Environment Variables
//! [`KeyOptions`] map dotted key paths (`connections.0.host`) to environment
//! variables. Present variables overwrite the merged value; missing
//! intermediate objects and arrays are created on the way.

mod builder;
mod chain;
mod files;
mod inject;
mod loader;
mod overlay;
pub mod parsers;
mod types;

pub use builder::{build, build_or_throw};
pub use chain::ChainLayout;
pub use files::{FileLoader, FnLoader, FsLoader};
pub use inject::{looks_like_index, set_value};
pub use loader::ConfigLoader;
pub use overlay::apply_env_overrides;
pub use types::*;
