//! Installed template assets.
//!
//! Templates live in a `<package>_data` folder installed under one of two
//! roots. The system root (the install prefix) is searched first, then the
//! per-user root:
//!
//! ```text
//! <system_root>/packsmith_data/README.md.t
//! <user_root>/packsmith_data/README.md.t
//! ```
//!
//! [`AssetRegistry`] keeps one [`InstalledAssets`] per package key for the
//! whole process.

use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use packsmith_core::{
    application::{ApplicationError, ports::AssetLocator},
    error::ScaffoldResult,
};
use tracing::{debug, instrument, trace};

/// Locator over a package's installed data folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledAssets {
    package: String,
    system_root: PathBuf,
    user_root: PathBuf,
}

impl InstalledAssets {
    pub fn new(
        package: impl Into<String>,
        system_root: impl Into<PathBuf>,
        user_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package: package.into(),
            system_root: system_root.into(),
            user_root: user_root.into(),
        }
    }

    /// Locator over the default roots for this platform.
    pub fn with_default_roots(package: impl Into<String>) -> Self {
        Self::new(package, default_system_root(), default_user_root())
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Name of the data folder under each root.
    pub fn data_folder(&self) -> String {
        format!("{}_data", self.package)
    }

    /// Candidate locations for `logical_name`, in search order.
    pub fn candidates(&self, logical_name: &str) -> [PathBuf; 2] {
        let folder = self.data_folder();
        [&self.system_root, &self.user_root].map(|root| {
            let path = root.join(&folder);
            if logical_name.is_empty() {
                path
            } else {
                path.join(logical_name)
            }
        })
    }
}

impl AssetLocator for InstalledAssets {
    #[instrument(skip(self), fields(package = %self.package))]
    fn resolve(&self, logical_name: &str) -> ScaffoldResult<PathBuf> {
        let candidates = self.candidates(logical_name);

        for candidate in &candidates {
            trace!(candidate = %candidate.display(), "Probing");
            if candidate.exists() {
                let resolved = absolute(candidate);
                debug!(path = %resolved.display(), "Asset found");
                return Ok(resolved);
            }
        }

        let name = if logical_name.is_empty() {
            self.data_folder()
        } else {
            logical_name.to_string()
        };
        Err(ApplicationError::NotInstalled {
            name,
            searched: candidates.to_vec(),
        }
        .into())
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `<prefix>/share`, where the executable lives in `<prefix>/bin`.
pub fn default_system_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(|prefix| prefix.join("share")))
        .unwrap_or_else(|| PathBuf::from("/usr/local/share"))
}

/// The per-user data directory, e.g. `~/.local/share` on Linux.
pub fn default_user_root() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
}

type Instances = Mutex<HashMap<String, Arc<InstalledAssets>>>;

fn instances() -> &'static Instances {
    static INSTANCES: OnceLock<Instances> = OnceLock::new();
    INSTANCES.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Process-wide registry of asset locators, one per package key.
///
/// The first [`acquire`](Self::acquire) for a key decides its roots; later
/// calls return the same instance until [`shutdown`](Self::shutdown).
pub struct AssetRegistry;

impl AssetRegistry {
    /// Shared locator for `package`, built with `init` on first use.
    pub fn acquire(
        package: &str,
        init: impl FnOnce() -> InstalledAssets,
    ) -> ScaffoldResult<Arc<InstalledAssets>> {
        let mut guard = instances()
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let assets = guard
            .entry(package.to_string())
            .or_insert_with(|| {
                debug!(package, "Registering asset locator");
                Arc::new(init())
            })
            .clone();
        Ok(assets)
    }

    /// Shared locator for `package`, if one was acquired.
    pub fn get(package: &str) -> Option<Arc<InstalledAssets>> {
        instances().lock().ok()?.get(package).cloned()
    }

    /// Drop every registered locator.
    pub fn shutdown() {
        if let Ok(mut guard) = instances().lock() {
            if !guard.is_empty() {
                debug!(count = guard.len(), "Releasing asset locators");
            }
            guard.clear();
        }
    }
}
