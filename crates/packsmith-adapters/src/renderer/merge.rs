//! Merge strategy: concatenate partial templates into one source.
//!
//! Registered on the core `Renderer` under a hook key. For a request naming
//! `setup.cfg.t` with partials `["setup.cfg.scripts.t"]`, the strategy
//! writes `setup.cfg.t` followed by each partial into a private staging
//! directory and hands that file back for substitution.

use std::{
    fs,
    path::{Path, PathBuf},
};

use packsmith_core::{
    application::{ApplicationError, RenderRequest, RenderStrategy, ports::AssetLocator},
    error::{ScaffoldError, ScaffoldResult},
};
use tempfile::TempDir;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Concatenates the requested template with a fixed list of partials.
///
/// Synthesized sources live until the strategy is dropped.
#[derive(Debug)]
pub struct MergeStrategy {
    partials: Vec<String>,
    staging: TempDir,
}

impl MergeStrategy {
    /// # Errors
    ///
    /// `FilesystemError` if the staging directory cannot be created.
    pub fn new<S: Into<String>>(partials: impl IntoIterator<Item = S>) -> ScaffoldResult<Self> {
        let staging = tempfile::Builder::new()
            .prefix("packsmith-")
            .tempdir()
            .map_err(|e| ApplicationError::FilesystemError {
                path: std::env::temp_dir(),
                reason: format!("Failed to create staging directory: {e}"),
            })?;

        Ok(Self {
            partials: partials.into_iter().map(Into::into).collect(),
            staging,
        })
    }

    pub fn partials(&self) -> &[String] {
        &self.partials
    }

    pub fn staging_dir(&self) -> &Path {
        self.staging.path()
    }
}

fn read_asset(path: &Path) -> ScaffoldResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to read template: {e}"),
        }
        .into()
    })
}

impl RenderStrategy for MergeStrategy {
    #[instrument(skip_all, fields(template = request.logical_name))]
    fn resolve(
        &self,
        request: &RenderRequest<'_>,
        assets: &dyn AssetLocator,
    ) -> ScaffoldResult<PathBuf> {
        let mut merged = read_asset(&assets.resolve(request.logical_name)?)?;

        for partial in &self.partials {
            if !merged.is_empty() && !merged.ends_with(b"\n") {
                merged.push(b'\n');
            }
            merged.extend(read_asset(&assets.resolve(partial)?)?);
        }

        let file_name = Path::new(request.logical_name)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApplicationError::RenderingFailed {
                name: request.logical_name.to_string(),
                reason: "template name has no file component".into(),
            })?;
        let target = self
            .staging
            .path()
            .join(format!("{}-{}", Uuid::new_v4().simple(), file_name));

        fs::write(&target, &merged).map_err(|e| -> ScaffoldError {
            ApplicationError::FilesystemError {
                path: target.clone(),
                reason: format!("Failed to stage merged template: {e}"),
            }
            .into()
        })?;

        debug!(
            partials = self.partials.len(),
            staged = %target.display(),
            "Merged template staged"
        );
        Ok(target)
    }
}
