//! Subcommand handlers.
//!
//! Each handler translates its arguments into calls on the core service and
//! adapters, then reports the outcome. No business logic lives here.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use packsmith_adapters::{AssetRegistry, InstalledAssets};
use packsmith_core::application::ApplicationError;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli as _},
};

pub mod clear;
pub mod completions;
pub mod config;
pub mod init;
pub mod pack;

/// Absolute, normalised packaging path; the current directory when absent.
///
/// The path must exist: packages are laid out inside a directory the user
/// already made.
pub fn packaging_path(path: Option<&Path>) -> CliResult<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().with_cli_context(|| "failed to read current directory")?,
    };

    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CliError::Core(
            ApplicationError::BaseNotFound { path }.into(),
        )),
        Err(e) => Err(CliError::IoError {
            message: format!("failed to resolve '{}'", path.display()),
            source: e,
        }),
    }
}

/// The process-wide locator for the configured data folder.
pub fn shared_assets(config: &AppConfig) -> CliResult<Arc<InstalledAssets>> {
    Ok(AssetRegistry::acquire(&config.assets.package, || {
        config.installed_assets()
    })?)
}
