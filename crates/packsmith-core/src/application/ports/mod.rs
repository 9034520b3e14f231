//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `packsmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: entry creation, reads and removal
//!   - `AssetLocator`: logical template name → installed file
//!   - `SettingsStore`: persisted author/email/user defaults
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{AssetLocator, Filesystem, SettingsStore};

#[cfg(test)]
pub use output::{MockAssetLocator, MockFilesystem};
