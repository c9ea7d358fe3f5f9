//! Weapon catalog loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use gameplay_core::WeaponDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const BUILTIN_WEAPONS: &str = include_str!("../../data/weapons.ron");

/// On-disk layout of a weapon catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    weapons: Vec<WeaponDefinition>,
}

/// Validated weapon definitions, looked up by name.
///
/// Definitions are shared: every weapon spawned from a catalog entry holds the
/// same `Arc`.
#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    definitions: BTreeMap<String, Arc<WeaponDefinition>>,
}

impl WeaponCatalog {
    /// Builds a catalog, rejecting invalid or duplicate definitions.
    pub fn from_definitions(definitions: Vec<WeaponDefinition>) -> LoadResult<Self> {
        let mut catalog = Self::default();
        for definition in definitions {
            definition
                .validate()
                .with_context(|| format!("Invalid weapon definition '{}'", definition.name))?;
            if catalog.definitions.contains_key(&definition.name) {
                bail!("Duplicate weapon definition '{}'", definition.name);
            }
            catalog
                .definitions
                .insert(definition.name.clone(), Arc::new(definition));
        }
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> LoadResult<Self> {
        WeaponLoader::parse(BUILTIN_WEAPONS).context("Failed to parse built-in weapons.ron")
    }

    pub fn get(&self, name: &str) -> Option<Arc<WeaponDefinition>> {
        self.definitions.get(name).cloned()
    }

    /// Looks up every name in order. Fails on the first unknown name.
    pub fn resolve(&self, names: &[String]) -> LoadResult<Vec<Arc<WeaponDefinition>>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .with_context(|| format!("Unknown weapon '{}'", name))
            })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Loader for weapon catalogs from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    /// Load a weapon catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing the catalog
    pub fn load(path: &Path) -> LoadResult<WeaponCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Parse a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<WeaponCatalog> {
        let file: CatalogFile =
            ron::from_str(content).context("Failed to parse weapon catalog RON")?;
        WeaponCatalog::from_definitions(file.weapons)
    }
}
