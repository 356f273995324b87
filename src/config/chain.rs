//! Candidate file chain for one logical config.
//!
//! Tiers are visited in ascending priority (base, environment, priority) and
//! each tier yields one path per extension, also in ascending priority. The
//! resulting order is the merge order: last path wins.

use std::path::{Path, PathBuf};

/// Tier directories and extensions a chain is built from.
#[derive(Debug, Clone, Copy)]
pub struct ChainLayout<'a> {
    pub dir: &'a Path,
    pub env: &'a str,
    pub base_dir: &'a str,
    pub priority_dir: &'a str,
    pub extensions: &'a [String],
}

impl ChainLayout<'_> {
    /// Tier directories, lowest priority first.
    pub fn tier_dirs(&self) -> [PathBuf; 3] {
        [
            self.dir.join(self.base_dir),
            self.dir.join(self.env),
            self.dir.join(self.priority_dir),
        ]
    }

    /// Candidate paths for `name`. No filesystem access.
    pub fn file_chain(&self, name: &str) -> Vec<PathBuf> {
        self.tier_dirs()
            .iter()
            .flat_map(|tier| {
                self.extensions
                    .iter()
                    .map(move |ext| tier.join(format!("{name}.{ext}")))
            })
            .collect()
    }
}
