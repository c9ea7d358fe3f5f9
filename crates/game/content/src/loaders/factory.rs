//! Content factory for loading everything a session needs from one directory.

use std::path::{Path, PathBuf};

use gameplay_core::GameplayConfig;

use crate::loaders::{ConfigLoader, LoadResult, WeaponCatalog, WeaponLoader};

/// Content factory that loads all gameplay content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── gameplay.toml
/// └── weapons.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load gameplay configuration from `gameplay.toml`.
    pub fn load_config(&self) -> LoadResult<GameplayConfig> {
        ConfigLoader::load(&self.data_dir.join("gameplay.toml"))
    }

    /// Load the weapon catalog from `weapons.ron`.
    pub fn load_weapons(&self) -> LoadResult<WeaponCatalog> {
        WeaponLoader::load(&self.data_dir.join("weapons.ron"))
    }

    /// Loads both files and checks that the default inventory only names
    /// weapons the catalog defines.
    pub fn load_all(&self) -> LoadResult<(GameplayConfig, WeaponCatalog)> {
        let config = self.load_config()?;
        let catalog = self.load_weapons()?;
        catalog.resolve(&config.character.default_inventory)?;
        Ok((config, catalog))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn test_load_all_checks_default_inventory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("gameplay.toml"),
            "[character]\ndefault_inventory = [\"rifle\", \"railgun\"]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("weapons.ron"), "(weapons: [(name: \"rifle\")])").unwrap();

        let factory = ContentFactory::new(dir.path());
        let err = factory.load_all().unwrap_err();
        assert!(err.to_string().contains("railgun"));
    }

    #[test]
    fn test_load_all_from_shipped_data() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let (config, catalog) = factory.load_all().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(config.validate().is_ok());
    }
}
