//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `packsmith-adapters` crate provides implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::Settings;
use crate::error::ScaffoldResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `packsmith_adapters::filesystem::LocalFilesystem` (production)
/// - `packsmith_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Creation is single-level: parents are never created implicitly, so every
///   directory that appears is one the tracker logged
/// - Removal is single-entry: directories are only removed when empty
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create one directory. The parent must exist.
    fn create_dir(&self, path: &Path) -> ScaffoldResult<()>;

    /// Create a file that must not exist yet and write all of `content`.
    ///
    /// If writing fails after the file was created, the file is removed
    /// before the error is returned.
    fn write_new_file(&self, path: &Path, content: &[u8]) -> ScaffoldResult<()>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> ScaffoldResult<Vec<u8>>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> ScaffoldResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()>;
}

/// Port for locating installed template assets.
///
/// Implemented by:
/// - `packsmith_adapters::assets::InstalledAssets` (system root, then user root)
#[cfg_attr(test, mockall::automock)]
pub trait AssetLocator: Send + Sync {
    /// Resolve a logical template name to an absolute path.
    ///
    /// An empty name resolves to the data root itself.
    fn resolve(&self, logical_name: &str) -> ScaffoldResult<PathBuf>;
}

impl<T: AssetLocator + ?Sized> AssetLocator for Arc<T> {
    fn resolve(&self, logical_name: &str) -> ScaffoldResult<PathBuf> {
        (**self).resolve(logical_name)
    }
}

/// Port for the persisted user defaults.
///
/// Implemented by:
/// - `packsmith_adapters::settings::JsonSettingsStore`
pub trait SettingsStore: Send + Sync {
    fn get(&self) -> ScaffoldResult<Settings>;

    fn set(&self, settings: &Settings) -> ScaffoldResult<()>;
}
