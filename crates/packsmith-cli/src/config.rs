//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `PACKSMITH_` prefix, `__` between sections,
//!    e.g. `PACKSMITH_ASSETS__SYSTEM_ROOT=/opt/share`
//! 3. Config file: `--config FILE`, else [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use packsmith_adapters::{InstalledAssets, assets};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ENV_PREFIX: &str = "PACKSMITH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where templates and settings are installed.
    pub assets: AssetsConfig,
    /// Defaults for new packages.
    pub defaults: Defaults,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Data folder key; templates live in `<root>/<package>_data`.
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_root: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            package: "packsmith".into(),
            system_root: None,
            user_root: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub version: String,
    pub docs: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            version: "0.1.0".into(),
            docs: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// `config_file` is the path given with `--config`. An explicit file must
    /// exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.clone())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.packsmith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "packsmith", "packsmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".packsmith.toml"))
    }

    /// Asset locator for the configured roots; unset roots use the platform
    /// defaults.
    pub fn installed_assets(&self) -> InstalledAssets {
        let system_root = self
            .assets
            .system_root
            .clone()
            .unwrap_or_else(assets::default_system_root);
        let user_root = self
            .assets
            .user_root
            .clone()
            .unwrap_or_else(assets::default_user_root);
        InstalledAssets::new(&self.assets.package, system_root, user_root)
    }
}
