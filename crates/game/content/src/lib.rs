//! Data-driven gameplay content and its loaders.
//!
//! This crate reads the static data a session is built from:
//! - Weapon catalogs (data-driven via RON)
//! - Gameplay configuration (data-driven via TOML)
//!
//! A built-in catalog and configuration are embedded so tools and tests can
//! run without a data directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, WeaponCatalog, WeaponLoader};
