//! Gameplay configuration loader.

use std::path::Path;

use anyhow::Context;
use gameplay_core::GameplayConfig;

use crate::loaders::{LoadResult, read_file};

const BUILTIN_CONFIG: &str = include_str!("../../data/gameplay.toml");

/// Loader for gameplay configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys take their defaults; the result is validated.
    pub fn load(path: &Path) -> LoadResult<GameplayConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Parse a config from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameplayConfig> {
        let config: GameplayConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn builtin() -> LoadResult<GameplayConfig> {
        Self::parse(BUILTIN_CONFIG).context("Failed to parse built-in gameplay.toml")
    }
}
