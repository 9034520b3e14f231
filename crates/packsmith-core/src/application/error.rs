//! Application layer errors.
//!
//! These errors represent failures while touching the outside world.
//! Malformed trees and rejected input are `DomainError`s from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The target of a create already exists.
    #[error("Path already exists: {path}")]
    PathConflict { path: PathBuf },

    /// A template asset is not installed in any search root.
    #[error("Template asset '{name}' is not installed")]
    NotInstalled { name: String, searched: Vec<PathBuf> },

    /// Template rendering failed.
    #[error("Rendering '{name}' failed: {reason}")]
    RenderingFailed { name: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Cleanup after a failed run could not remove an entry.
    #[error("Rollback failed at {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// The base path already holds a scaffolded package.
    #[error("A package was already scaffolded at {path}")]
    AlreadyScaffolded { path: PathBuf },

    /// The base path to scaffold into does not exist.
    #[error("Base path not found: {path}")]
    BaseNotFound { path: PathBuf },

    /// No manifest to roll back from.
    #[error("No scaffolded package found at {path}")]
    ManifestMissing { path: PathBuf },

    /// Manifest exists but cannot be read back.
    #[error("Manifest at {path} is unreadable: {reason}")]
    ManifestCorrupt { path: PathBuf, reason: String },

    /// Settings store could not be read or written.
    #[error("Settings error: {reason}")]
    SettingsError { reason: String },

    /// Shared state lock was poisoned.
    #[error("Internal lock poisoned")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PathConflict { path } => vec![
                format!("'{}' already exists", path.display()),
                "Nothing was left behind: everything created in this run was removed".into(),
                "Move the existing entry away or pick another location".into(),
            ],
            Self::NotInstalled { name, searched } => {
                let mut suggestions = vec![format!("Template '{}' was not found in:", name)];
                suggestions.extend(searched.iter().map(|p| format!("  • {}", p.display())));
                suggestions.push("Reinstall the packsmith data files".into());
                suggestions.push("Or point PACKSMITH_ASSETS__SYSTEM_ROOT at them".into());
                suggestions
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Could not remove: {}", path.display()),
                "The target directory may be partially scaffolded".into(),
                "Inspect it and remove leftovers by hand; do not re-run blindly".into(),
            ],
            Self::AlreadyScaffolded { path } => vec![
                format!("'{}' already holds a package", path.display()),
                "Run 'packsmith clear' there first to undo it".into(),
            ],
            Self::BaseNotFound { path } => vec![
                format!("Create '{}' first", path.display()),
                "Or run packsmith from inside the target directory".into(),
            ],
            Self::ManifestMissing { path } => vec![
                format!("'{}' was not scaffolded by packsmith", path.display()),
                "Only directories created with 'packsmith pack' can be cleared".into(),
            ],
            Self::ManifestCorrupt { .. } => vec![
                "The manifest was edited or truncated".into(),
                "Remove the generated files by hand".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PathConflict { .. } | Self::AlreadyScaffolded { .. } => ErrorCategory::Conflict,
            Self::NotInstalled { .. }
            | Self::BaseNotFound { .. }
            | Self::ManifestMissing { .. } => ErrorCategory::NotFound,
            Self::RollbackFailed { .. } => ErrorCategory::RollbackFailure,
            Self::SettingsError { .. } => ErrorCategory::Configuration,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::ManifestCorrupt { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
