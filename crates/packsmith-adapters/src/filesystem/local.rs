//! Local filesystem adapter using std::fs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use packsmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ScaffoldError, ScaffoldResult},
};
use tracing::warn;

/// Production filesystem implementation using `std::fs`.
///
/// Every operation touches exactly one entry: directories are created one
/// level at a time and only removed when empty.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // Dangling symlinks still occupy the name.
        path.symlink_metadata().is_ok()
    }

    fn create_dir(&self, path: &Path) -> ScaffoldResult<()> {
        fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_new_file(&self, path: &Path, content: &[u8]) -> ScaffoldResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| map_io_error(path, e, "create file"))?;

        if let Err(e) = file.write_all(content).and_then(|()| file.flush()) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(path) {
                warn!(
                    path = %path.display(),
                    error = %cleanup,
                    "Could not remove partially written file"
                );
            }
            return Err(map_io_error(path, e, "write file"));
        }

        Ok(())
    }

    fn read(&self, path: &Path) -> ScaffoldResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()> {
        fs::remove_dir(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ScaffoldError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
