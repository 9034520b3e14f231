//! Infrastructure adapters for Packsmith.
//!
//! This crate implements the ports defined in `packsmith-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod assets;
pub mod filesystem;
pub mod renderer;
pub mod settings;

// Re-export commonly used adapters
pub use assets::{AssetRegistry, InstalledAssets};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::MergeStrategy;
pub use settings::JsonSettingsStore;
