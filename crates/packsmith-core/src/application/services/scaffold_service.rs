//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the whole run:
//! 1. Check the base path is usable
//! 2. Materialize the tree through a fresh [`Tracker`]
//! 3. Persist the tracker log as a manifest, itself tracked
//! 4. On any failure, roll back everything this run created
//!
//! [`ScaffoldService::clear`] replays a persisted manifest to undo an earlier
//! run, possibly from another process.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::{
    application::{ApplicationError, Materializer, Renderer, Tracker, ports::Filesystem},
    domain::{Context, EntryKind, MANIFEST_FILE, Manifest, TrackerEntry, TreeNode},
    error::{ScaffoldError, ScaffoldResult},
};

/// Outcome of a successful scaffolding run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldReport {
    pub base: PathBuf,
    /// Every created entry in creation order, the manifest last.
    pub entries: Vec<TrackerEntry>,
}

impl ScaffoldReport {
    pub fn directory_count(&self) -> usize {
        self.count(EntryKind::Dir)
    }

    pub fn file_count(&self) -> usize {
        self.count(EntryKind::File)
    }

    fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

/// Main scaffolding service.
///
/// Owns the renderer and shares the filesystem with it.
pub struct ScaffoldService {
    filesystem: Arc<dyn Filesystem>,
    renderer: Renderer,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// `renderer` should read through the same `filesystem`.
    pub fn new(filesystem: Arc<dyn Filesystem>, renderer: Renderer) -> Self {
        Self {
            filesystem,
            renderer,
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Entries a run would create, manifest included, without touching disk.
    pub fn plan(&self, tree: &TreeNode, base: impl AsRef<Path>) -> Vec<TrackerEntry> {
        let base = base.as_ref();
        let mut entries = tree.plan(base);
        entries.push(TrackerEntry::file(base.join(MANIFEST_FILE)));
        entries
    }

    /// Scaffold `tree` into the existing directory `base`.
    ///
    /// The run is all-or-nothing: on failure every entry it created is
    /// removed again, newest first, and the original error is returned.
    ///
    /// # Errors
    ///
    /// - `BaseNotFound` if `base` does not exist
    /// - `AlreadyScaffolded` if `base` already holds a manifest
    /// - any materialization error, after a successful rollback
    /// - `RollbackFailed` if that rollback could not finish; the original
    ///   error is logged
    #[instrument(skip_all, fields(base = %base.as_ref().display()))]
    pub fn scaffold(
        &self,
        tree: &TreeNode,
        base: impl AsRef<Path>,
        context: &Context,
    ) -> ScaffoldResult<ScaffoldReport> {
        let base = base.as_ref();
        info!(package = context.get("package"), "Scaffolding package");

        if !self.filesystem.exists(base) {
            return Err(ApplicationError::BaseNotFound {
                path: base.to_path_buf(),
            }
            .into());
        }
        if self.filesystem.exists(&base.join(MANIFEST_FILE)) {
            return Err(ApplicationError::AlreadyScaffolded {
                path: base.to_path_buf(),
            }
            .into());
        }

        let mut tracker = Tracker::new(self.filesystem.as_ref());
        let result = Materializer::new(&self.renderer)
            .materialize(tree, base, context, &mut tracker)
            .and_then(|()| write_manifest(base, context, &mut tracker));

        match result {
            Ok(()) => {
                let report = ScaffoldReport {
                    base: base.to_path_buf(),
                    entries: tracker.into_entries(),
                };
                info!(
                    directories = report.directory_count(),
                    files = report.file_count(),
                    "Scaffold completed successfully"
                );
                Ok(report)
            }
            Err(cause) => Err(abort(&mut tracker, cause)),
        }
    }

    /// Undo the run recorded in `base`'s manifest.
    ///
    /// Recorded entries are removed newest first; the manifest goes only once
    /// all of them are gone. If the rollback stops early the manifest is
    /// rewritten to list what remains, so a later `clear` can resume.
    ///
    /// Returns how many entries were removed, the manifest included.
    ///
    /// # Errors
    ///
    /// - `ManifestMissing` if `base` holds no manifest
    /// - `ManifestCorrupt` if it cannot be parsed, was written for another
    ///   base, or names entries outside `base`
    /// - `RollbackFailed` naming the first entry that could not be removed
    #[instrument(skip_all, fields(base = %base.as_ref().display()))]
    pub fn clear(&self, base: impl AsRef<Path>) -> ScaffoldResult<usize> {
        let base = base.as_ref();
        let manifest_path = base.join(MANIFEST_FILE);

        if !self.filesystem.exists(&manifest_path) {
            return Err(ApplicationError::ManifestMissing {
                path: base.to_path_buf(),
            }
            .into());
        }

        let bytes = self.filesystem.read(&manifest_path)?;
        let corrupt = |reason: String| ApplicationError::ManifestCorrupt {
            path: manifest_path.clone(),
            reason,
        };
        let mut manifest = Manifest::from_json(&bytes).map_err(|e| corrupt(e.to_string()))?;

        if manifest.path != base {
            return Err(corrupt(format!(
                "recorded for {}, not {}",
                manifest.path.display(),
                base.display()
            ))
            .into());
        }
        if let Some(stray) = manifest.entries.iter().find(|e| !confined(base, e.path())) {
            return Err(corrupt(format!(
                "entry {} lies outside {}",
                stray.path().display(),
                base.display()
            ))
            .into());
        }

        let recorded = std::mem::take(&mut manifest.entries)
            .into_iter()
            .filter(|e| e.path() != manifest_path)
            .collect();
        let mut tracker = Tracker::resume(self.filesystem.as_ref(), recorded);

        match tracker.rollback() {
            Ok(removed) => {
                self.filesystem.remove_file(&manifest_path)?;
                info!(removed = removed + 1, "Package cleared");
                Ok(removed + 1)
            }
            Err(rollback) => {
                manifest.entries = tracker.into_entries();
                manifest.entries.push(TrackerEntry::file(&manifest_path));
                if let Err(e) = self.rewrite_manifest(&manifest_path, &manifest) {
                    error!(error = %e, "Could not record the remaining entries");
                }
                Err(rollback)
            }
        }
    }

    fn rewrite_manifest(&self, path: &Path, manifest: &Manifest) -> ScaffoldResult<()> {
        let json = manifest.to_json().map_err(|e| ScaffoldError::Internal {
            message: format!("manifest serialization failed: {e}"),
        })?;
        self.filesystem.remove_file(path)?;
        self.filesystem.write_new_file(path, json.as_bytes())
    }
}

/// `path` is `base` joined with one or more plain name segments.
fn confined(base: &Path, path: &Path) -> bool {
    path.strip_prefix(base).is_ok_and(|rel| {
        rel.components().next().is_some()
            && rel.components().all(|c| matches!(c, Component::Normal(_)))
    })
}

/// Track the manifest as the final entry of the run.
fn write_manifest(
    base: &Path,
    context: &Context,
    tracker: &mut Tracker<'_>,
) -> ScaffoldResult<()> {
    let manifest_path = base.join(MANIFEST_FILE);

    let mut entries = tracker.entries().to_vec();
    entries.push(TrackerEntry::file(&manifest_path));

    let mut manifest = Manifest::new(base, entries);
    manifest.package = context.get("package").map(str::to_string);
    manifest.author = context.get("author").map(str::to_string);

    let json = manifest.to_json().map_err(|e| ScaffoldError::Internal {
        message: format!("manifest serialization failed: {e}"),
    })?;
    tracker.create_file(&manifest_path, json.as_bytes())
}

/// Roll back a failed run and pick the error to report.
fn abort(tracker: &mut Tracker<'_>, cause: ScaffoldError) -> ScaffoldError {
    warn!(error = %cause, "Scaffold failed");
    match tracker.rollback() {
        Ok(removed) => {
            info!(removed, "Rollback complete");
            cause
        }
        Err(rollback) => {
            error!(
                original = %cause,
                remaining = tracker.len(),
                "Rollback incomplete"
            );
            rollback
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::application::ports::MockAssetLocator;

    /// Minimal in-memory filesystem: `None` marks a directory.
    #[derive(Default)]
    struct FakeFs {
        entries: Mutex<BTreeMap<PathBuf, Option<Vec<u8>>>>,
        locked: Vec<PathBuf>,
    }

    impl FakeFs {
        fn with_dirs(dirs: &[&str]) -> Self {
            let fs = Self::default();
            for dir in dirs {
                fs.entries.lock().unwrap().insert(PathBuf::from(dir), None);
            }
            fs
        }

        fn paths(&self) -> Vec<PathBuf> {
            self.entries.lock().unwrap().keys().cloned().collect()
        }

        fn failure(path: &Path, reason: &str) -> ScaffoldError {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: reason.into(),
            }
            .into()
        }
    }

    impl Filesystem for FakeFs {
        fn exists(&self, path: &Path) -> bool {
            self.entries.lock().unwrap().contains_key(path)
        }

        fn create_dir(&self, path: &Path) -> ScaffoldResult<()> {
            self.entries.lock().unwrap().insert(path.to_path_buf(), None);
            Ok(())
        }

        fn write_new_file(&self, path: &Path, content: &[u8]) -> ScaffoldResult<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), Some(content.to_vec()));
            Ok(())
        }

        fn read(&self, path: &Path) -> ScaffoldResult<Vec<u8>> {
            match self.entries.lock().unwrap().get(path) {
                Some(Some(bytes)) => Ok(bytes.clone()),
                _ => Err(Self::failure(path, "no such file")),
            }
        }

        fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
            if self.locked.iter().any(|p| p == path) {
                return Err(Self::failure(path, "permission denied"));
            }
            self.entries.lock().unwrap().remove(path);
            Ok(())
        }

        fn remove_dir(&self, path: &Path) -> ScaffoldResult<()> {
            self.remove_file(path)
        }
    }

    fn service(fs: FakeFs) -> (Arc<FakeFs>, ScaffoldService) {
        let fs = Arc::new(fs);
        {
            let mut assets = fs.entries.lock().unwrap();
            assets.insert(PathBuf::from("/data/readme.t"), Some(b"# {package}".to_vec()));
        }
        let mut locator = MockAssetLocator::new();
        locator.expect_resolve().returning(|name| {
            if name == "readme.t" {
                Ok(PathBuf::from("/data/readme.t"))
            } else {
                Err(ApplicationError::NotInstalled {
                    name: name.to_string(),
                    searched: vec![PathBuf::from("/data")],
                }
                .into())
            }
        });
        let renderer = Renderer::new(Box::new(locator), fs.clone());
        (fs.clone(), ScaffoldService::new(fs, renderer))
    }

    fn tree(readme_template: &str) -> TreeNode {
        TreeNode::root([
            TreeNode::dir("src")
                .child(TreeNode::file("__init__.py").build().unwrap())
                .build()
                .unwrap(),
            TreeNode::file("README.md")
                .template(readme_template)
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn scaffold_writes_tree_and_manifest() {
        let (fs, service) = service(FakeFs::with_dirs(&["/work"]));
        let ctx = Context::new().with("package", "demo");

        let report = service.scaffold(&tree("readme.t"), "/work", &ctx).unwrap();

        assert_eq!(report.directory_count(), 1);
        assert_eq!(report.file_count(), 3);
        assert_eq!(
            report.entries.last(),
            Some(&TrackerEntry::file("/work/.packsmith"))
        );
        assert_eq!(fs.read(Path::new("/work/README.md")).unwrap(), b"# demo");

        let manifest =
            Manifest::from_json(&fs.read(Path::new("/work/.packsmith")).unwrap()).unwrap();
        assert_eq!(manifest.entries, report.entries);
        assert_eq!(manifest.package.as_deref(), Some("demo"));
        assert_eq!(service.plan(&tree("readme.t"), "/work"), report.entries);
    }

    #[test]
    fn failed_run_leaves_base_untouched() {
        let (fs, service) = service(FakeFs::with_dirs(&["/work"]));
        let before = fs.paths();

        let err = service
            .scaffold(&tree("missing.t"), "/work", &Context::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ScaffoldError::Application(ApplicationError::NotInstalled { .. })
        ));
        assert_eq!(fs.paths(), before);
    }

    #[test]
    fn failed_rollback_is_reported_instead_of_the_cause() {
        let fs = FakeFs {
            locked: vec![PathBuf::from("/work/src/__init__.py")],
            ..FakeFs::with_dirs(&["/work"])
        };
        let (_, service) = service(fs);

        let err = service
            .scaffold(&tree("missing.t"), "/work", &Context::new())
            .unwrap_err();

        assert!(err.is_rollback_failure());
    }

    #[test]
    fn missing_base_is_rejected() {
        let (_, service) = service(FakeFs::default());
        let err = service
            .scaffold(&tree("readme.t"), "/nowhere", &Context::new())
            .unwrap_err();
        assert_eq!(
            err,
            ScaffoldError::from(ApplicationError::BaseNotFound {
                path: PathBuf::from("/nowhere")
            })
        );
    }

    #[test]
    fn second_scaffold_is_refused() {
        let (_, service) = service(FakeFs::with_dirs(&["/work"]));
        let ctx = Context::new();
        service.scaffold(&tree("readme.t"), "/work", &ctx).unwrap();

        let err = service
            .scaffold(&tree("readme.t"), "/work", &ctx)
            .unwrap_err();
        assert_eq!(
            err,
            ScaffoldError::from(ApplicationError::AlreadyScaffolded {
                path: PathBuf::from("/work")
            })
        );
    }

    #[test]
    fn clear_undoes_a_previous_run() {
        let (fs, service) = service(FakeFs::with_dirs(&["/work"]));
        let before = fs.paths();
        service
            .scaffold(&tree("readme.t"), "/work", &Context::new())
            .unwrap();

        assert_eq!(service.clear("/work").unwrap(), 4);
        assert_eq!(fs.paths(), before);
    }

    #[test]
    fn clear_without_manifest_fails() {
        let (_, service) = service(FakeFs::with_dirs(&["/work"]));
        let err = service.clear("/work").unwrap_err();
        assert_eq!(
            err,
            ScaffoldError::from(ApplicationError::ManifestMissing {
                path: PathBuf::from("/work")
            })
        );
    }

    #[test]
    fn clear_refuses_entries_outside_base() {
        let fs = FakeFs::with_dirs(&["/work"]);
        let manifest = Manifest::new("/work", vec![TrackerEntry::file("/etc/passwd")]);
        fs.write_new_file(
            Path::new("/work/.packsmith"),
            manifest.to_json().unwrap().as_bytes(),
        )
        .unwrap();
        let (fs, service) = service(fs);

        let err = service.clear("/work").unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Application(ApplicationError::ManifestCorrupt { .. })
        ));
        assert!(fs.exists(Path::new("/work/.packsmith")));
    }

    fn with_manifest(fs: FakeFs, manifest: &Manifest) -> FakeFs {
        fs.write_new_file(
            Path::new("/work/.packsmith"),
            manifest.to_json().unwrap().as_bytes(),
        )
        .unwrap();
        fs
    }

    #[test]
    fn clear_refuses_parent_dir_segments() {
        let fs = FakeFs::with_dirs(&["/work"]);
        fs.write_new_file(Path::new("/work/../victim.txt"), b"keep")
            .unwrap();
        let manifest = Manifest::new(
            "/work",
            vec![
                TrackerEntry::file("/work/../victim.txt"),
                TrackerEntry::file("/work/.packsmith"),
            ],
        );
        let (fs, service) = service(with_manifest(fs, &manifest));

        let err = service.clear("/work").unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Application(ApplicationError::ManifestCorrupt { .. })
        ));
        assert!(fs.exists(Path::new("/work/../victim.txt")));
        assert!(fs.exists(Path::new("/work/.packsmith")));
    }

    #[test]
    fn clear_refuses_the_base_itself() {
        let manifest = Manifest::new("/work", vec![TrackerEntry::dir("/work")]);
        let (fs, service) = service(with_manifest(FakeFs::with_dirs(&["/work"]), &manifest));

        assert!(service.clear("/work").is_err());
        assert!(fs.exists(Path::new("/work")));
    }

    #[test]
    fn clear_refuses_a_manifest_recorded_elsewhere() {
        let fs = FakeFs::with_dirs(&["/work", "/work/src"]);
        let manifest = Manifest::new(
            "/other",
            vec![
                TrackerEntry::dir("/work/src"),
                TrackerEntry::file("/work/.packsmith"),
            ],
        );
        let (fs, service) = service(with_manifest(fs, &manifest));

        let err = service.clear("/work").unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Application(ApplicationError::ManifestCorrupt { .. })
        ));
        assert!(fs.exists(Path::new("/work/src")));
    }

    #[test]
    fn failed_clear_keeps_the_manifest_listing_what_remains() {
        let fs = FakeFs {
            locked: vec![PathBuf::from("/work/src")],
            ..FakeFs::with_dirs(&["/work"])
        };
        let (fs, service) = service(fs);
        service
            .scaffold(&tree("readme.t"), "/work", &Context::new())
            .unwrap();

        let err = service.clear("/work").unwrap_err();
        let ScaffoldError::Application(ApplicationError::RollbackFailed { path, .. }) = err else {
            panic!("expected RollbackFailed");
        };
        assert_eq!(path, PathBuf::from("/work/src"));

        assert!(!fs.exists(Path::new("/work/README.md")));
        assert!(!fs.exists(Path::new("/work/src/__init__.py")));
        let manifest =
            Manifest::from_json(&fs.read(Path::new("/work/.packsmith")).unwrap()).unwrap();
        assert_eq!(
            manifest.entries,
            vec![
                TrackerEntry::dir("/work/src"),
                TrackerEntry::file("/work/.packsmith"),
            ]
        );
        assert_eq!(manifest.path, PathBuf::from("/work"));
    }

    #[test]
    fn manifest_is_removed_last() {
        let (fs, service) = service(FakeFs::with_dirs(&["/work"]));
        service
            .scaffold(&tree("readme.t"), "/work", &Context::new())
            .unwrap();

        service.clear("/work").unwrap();
        assert!(!fs.exists(Path::new("/work/.packsmith")));
        assert!(!fs.exists(Path::new("/work/src")));
    }

    #[test]
    fn clear_rejects_garbage_manifest() {
        let fs = FakeFs::with_dirs(&["/work"]);
        fs.write_new_file(Path::new("/work/.packsmith"), b"not json")
            .unwrap();
        let (_, service) = service(fs);

        assert!(matches!(
            service.clear("/work").unwrap_err(),
            ScaffoldError::Application(ApplicationError::ManifestCorrupt { .. })
        ));
    }
}
