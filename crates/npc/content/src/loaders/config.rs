//! Orc configuration loader.

use std::path::Path;

use npc_core::OrcConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for controller tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`OrcConfig`] from a TOML file.
    ///
    /// Missing fields and sections fall back to their defaults; the result is
    /// validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<OrcConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    /// Parse and validate an [`OrcConfig`] from TOML text.
    pub fn parse(content: &str) -> LoadResult<OrcConfig> {
        let config: OrcConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;

        Ok(config)
    }
}
