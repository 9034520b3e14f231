//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use packsmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ScaffoldError, ScaffoldResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle while the service
/// owns another. Writes and removals can be made to fail for chosen paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    failing_writes: HashSet<PathBuf>,
    failing_removals: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.directories.contains(parent),
            _ => true,
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filesystem holding `path` and all of its ancestors.
    pub fn with_dir(path: impl AsRef<Path>) -> Self {
        let fs = Self::new();
        fs.add_dir_all(path);
        fs
    }

    /// Add `path` and all of its ancestors (testing helper).
    pub fn add_dir_all(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            for ancestor in path.as_ref().ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    inner.directories.insert(ancestor.to_path_buf());
                }
            }
        }
    }

    /// Place a file without going through the port (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir_all(parent);
        }
        if let Ok(mut inner) = self.inner.write() {
            inner.files.insert(path.to_path_buf(), content.into());
        }
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// Every directory and file, sorted.
    pub fn list_paths(&self) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Make every write to `path` fail after the file was created.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_writes.insert(path.into());
        }
    }

    /// Make every removal of `path` fail.
    pub fn fail_removal_of(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_removals.insert(path.into());
        }
    }

    fn read_lock(&self) -> ScaffoldResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write_lock(&self) -> ScaffoldResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

fn failure(path: &Path, reason: &str) -> ScaffoldError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains(path))
            .unwrap_or(false)
    }

    fn create_dir(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.write_lock()?;

        if inner.contains(path) {
            return Err(failure(path, "File exists"));
        }
        if !inner.parent_exists(path) {
            return Err(failure(path, "Parent directory does not exist"));
        }

        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn write_new_file(&self, path: &Path, content: &[u8]) -> ScaffoldResult<()> {
        let mut inner = self.write_lock()?;

        if inner.contains(path) {
            return Err(failure(path, "File exists"));
        }
        if !inner.parent_exists(path) {
            return Err(failure(path, "Parent directory does not exist"));
        }
        // A real half-written file is cleaned up by the adapter, so nothing stays.
        if inner.failing_writes.contains(path) {
            return Err(failure(path, "No space left on device"));
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> ScaffoldResult<Vec<u8>> {
        let inner = self.read_lock()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| failure(path, "No such file"))
    }

    fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.write_lock()?;

        if inner.failing_removals.contains(path) {
            return Err(failure(path, "Permission denied"));
        }
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| failure(path, "No such file"))
    }

    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.write_lock()?;

        if inner.failing_removals.contains(path) {
            return Err(failure(path, "Permission denied"));
        }
        if !inner.directories.contains(path) {
            return Err(failure(path, "No such directory"));
        }
        let occupied = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .any(|p| p.parent() == Some(path));
        if occupied {
            return Err(failure(path, "Directory not empty"));
        }

        inner.directories.remove(path);
        Ok(())
    }
}
