//! JSON-backed settings store.
//!
//! The user defaults (author, email, user) are one JSON object in a hidden
//! `.<package>-config` file inside the installed data folder:
//!
//! ```json
//! {"author": "Ada Lovelace", "email": "ada@example.com", "user": "ada"}
//! ```

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use packsmith_core::{
    application::{
        ApplicationError,
        ports::{AssetLocator, SettingsStore},
    },
    domain::Settings,
    error::ScaffoldResult,
};
use tracing::{debug, instrument};

use crate::assets::InstalledAssets;

#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store kept in `assets`' data folder.
    ///
    /// # Errors
    ///
    /// `NotInstalled` when the data folder does not exist in any root.
    pub fn in_data_root(assets: &InstalledAssets) -> ScaffoldResult<Self> {
        let root = assets.resolve("")?;
        Ok(Self::new(root.join(format!(".{}-config", assets.package()))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn settings_error(path: &Path, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::SettingsError {
        reason: format!("{}: {}", path.display(), e),
    }
}

impl SettingsStore for JsonSettingsStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self) -> ScaffoldResult<Settings> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings stored yet");
                return Ok(Settings::default());
            }
            Err(e) => return Err(settings_error(&self.path, e).into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| settings_error(&self.path, e).into())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn set(&self, settings: &Settings) -> ScaffoldResult<()> {
        let json =
            serde_json::to_vec_pretty(settings).map_err(|e| settings_error(&self.path, e))?;
        fs::write(&self.path, json).map_err(|e| settings_error(&self.path, e))?;
        debug!("Settings saved");
        Ok(())
    }
}
