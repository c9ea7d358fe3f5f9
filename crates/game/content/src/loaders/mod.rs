//! Content loaders for reading gameplay data from files.
//!
//! Weapon catalogs are RON, gameplay configuration is TOML. Every loaded value
//! is validated before it is handed to the simulation.

pub mod config;
pub mod factory;
pub mod weapons;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use weapons::{WeaponCatalog, WeaponLoader};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
