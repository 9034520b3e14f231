//! End-to-end scaffolding against real adapters.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use packsmith_adapters::{InstalledAssets, LocalFilesystem, MemoryFilesystem, MergeStrategy};
use packsmith_core::{
    application::{
        ApplicationError, Materializer, Renderer, ScaffoldService, Tracker,
        ports::{AssetLocator, Filesystem},
    },
    domain::{Context, TemplateRef, TrackerEntry, TreeNode},
    error::{ErrorCategory, ScaffoldError, ScaffoldResult},
};
use tempfile::TempDir;
use walkdir::WalkDir;

// ── helpers ───────────────────────────────────────────────────────────────

/// Installed assets under `<temp>/share/demo_data`.
fn install_assets(files: &[(&str, &str)]) -> (TempDir, InstalledAssets) {
    let temp = TempDir::new().unwrap();
    let folder = temp.path().join("share").join("demo_data");
    fs::create_dir_all(&folder).unwrap();
    for (name, content) in files {
        fs::write(folder.join(name), content).unwrap();
    }
    let assets = InstalledAssets::new(
        "demo",
        temp.path().join("share"),
        temp.path().join("user"),
    );
    (temp, assets)
}

/// Sorted `(relative path, content)` listing of everything under `root`.
fn listing(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
    let mut entries: Vec<_> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (rel, content)
        })
        .collect();
    entries.sort();
    entries
}

fn init_tree() -> TreeNode {
    TreeNode::root([TreeNode::dir("src")
        .child(
            TreeNode::file("__init__.py")
                .template("init.t")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()])
    .unwrap()
}

/// Local filesystem that claims one path is already taken.
struct ConflictingFs {
    inner: LocalFilesystem,
    taken: PathBuf,
}

impl Filesystem for ConflictingFs {
    fn exists(&self, path: &Path) -> bool {
        path == self.taken || self.inner.exists(path)
    }
    fn create_dir(&self, path: &Path) -> ScaffoldResult<()> {
        self.inner.create_dir(path)
    }
    fn write_new_file(&self, path: &Path, content: &[u8]) -> ScaffoldResult<()> {
        self.inner.write_new_file(path, content)
    }
    fn read(&self, path: &Path) -> ScaffoldResult<Vec<u8>> {
        self.inner.read(path)
    }
    fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
        self.inner.remove_file(path)
    }
    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()> {
        self.inner.remove_dir(path)
    }
}

// ── tracker + materializer ────────────────────────────────────────────────

#[test]
fn init_file_is_rendered_under_its_directory() {
    let (_assets_dir, assets) = install_assets(&[("init.t", "# {package}\n")]);
    let work = TempDir::new().unwrap();
    let base = work.path().join("x");
    fs::create_dir(&base).unwrap();

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let renderer = Renderer::new(Box::new(assets), filesystem.clone());
    let mut tracker = Tracker::new(filesystem.as_ref());
    let ctx = Context::new().with("package", "demo");

    Materializer::new(&renderer)
        .materialize(&init_tree(), &base, &ctx, &mut tracker)
        .unwrap();

    assert_eq!(
        fs::read_to_string(base.join("src/__init__.py")).unwrap(),
        "# demo\n"
    );
    assert_eq!(
        tracker.entries(),
        [
            TrackerEntry::dir(base.join("src")),
            TrackerEntry::file(base.join("src/__init__.py")),
        ]
    );
}

#[test]
fn conflicting_file_rolls_back_its_directory() {
    let (_assets_dir, assets) = install_assets(&[("init.t", "# {package}\n")]);
    let work = TempDir::new().unwrap();
    let base = work.path().join("x");
    fs::create_dir(&base).unwrap();
    fs::write(base.join("keep.txt"), "untouched").unwrap();
    let before = listing(&base);

    let filesystem: Arc<dyn Filesystem> = Arc::new(ConflictingFs {
        inner: LocalFilesystem::new(),
        taken: base.join("src/__init__.py"),
    });
    let renderer = Renderer::new(Box::new(assets), filesystem.clone());
    let mut tracker = Tracker::new(filesystem.as_ref());
    let ctx = Context::new().with("package", "demo");

    let err = Materializer::new(&renderer)
        .materialize(&init_tree(), &base, &ctx, &mut tracker)
        .unwrap_err();
    assert_eq!(
        err,
        ScaffoldError::from(ApplicationError::PathConflict {
            path: base.join("src/__init__.py")
        })
    );
    assert_eq!(tracker.entries(), [TrackerEntry::dir(base.join("src"))]);

    assert_eq!(tracker.rollback().unwrap(), 1);
    assert!(!base.join("src").exists());
    assert_eq!(listing(&base), before);
}

#[test]
fn disabled_directory_leaves_no_trace() {
    let (_assets_dir, assets) = install_assets(&[]);
    let work = TempDir::new().unwrap();
    let base = work.path().to_path_buf();

    let tree = TreeNode::root([TreeNode::dir("data")
        .when(false)
        .children([
            TreeNode::file("a.csv").build().unwrap(),
            TreeNode::file("b.csv").template("missing.t").build().unwrap(),
        ])
        .build()
        .unwrap()])
    .unwrap();

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let renderer = Renderer::new(Box::new(assets), filesystem.clone());
    let mut tracker = Tracker::new(filesystem.as_ref());

    Materializer::new(&renderer)
        .materialize(&tree, &base, &Context::new(), &mut tracker)
        .unwrap();

    assert!(tracker.is_empty());
    assert!(!base.join("data").exists());
    assert!(listing(&base).is_empty());
}

// ── full service ──────────────────────────────────────────────────────────

fn package_tree() -> TreeNode {
    TreeNode::root([
        TreeNode::dir("src")
            .child(
                TreeNode::dir("demo")
                    .child(
                        TreeNode::file("__init__.py")
                            .template("init.t")
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
        TreeNode::dir("docs").build().unwrap(),
        TreeNode::dir("tests")
            .child(TreeNode::file("__init__.py").build().unwrap())
            .build()
            .unwrap(),
        TreeNode::file("setup.cfg")
            .template(TemplateRef::new("setup.cfg.t").with_hook("merge"))
            .build()
            .unwrap(),
        TreeNode::file("README.md")
            .template("README.md.t")
            .build()
            .unwrap(),
    ])
    .unwrap()
}

fn package_assets() -> (TempDir, InstalledAssets) {
    install_assets(&[
        ("init.t", "# {package}\n"),
        ("setup.cfg.t", "[metadata]\nname = {package}\nauthor = {author}\n"),
        ("setup.cfg.scripts.t", "[options]\nscripts = bin/{package}\n"),
        ("README.md.t", "# {package}\n\n{{badge}}\n"),
    ])
}

fn local_service(assets: InstalledAssets) -> ScaffoldService {
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let renderer = Renderer::new(Box::new(assets), filesystem.clone())
        .with_strategy("merge", MergeStrategy::new(["setup.cfg.scripts.t"]).unwrap());
    ScaffoldService::new(filesystem, renderer)
}

#[test]
fn scaffold_then_clear_restores_the_directory() {
    let (_assets_dir, assets) = package_assets();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("notes.txt"), "mine").unwrap();
    let before = listing(work.path());

    let service = local_service(assets);
    let ctx = Context::new().with("package", "demo").with_literal("author");
    let report = service.scaffold(&package_tree(), work.path(), &ctx).unwrap();

    assert_eq!(report.directory_count(), 4);
    assert_eq!(report.file_count(), 5);
    assert_eq!(
        fs::read_to_string(work.path().join("setup.cfg")).unwrap(),
        "[metadata]\nname = demo\nauthor = {author}\n[options]\nscripts = bin/demo\n"
    );
    assert_eq!(
        fs::read_to_string(work.path().join("README.md")).unwrap(),
        "# demo\n\n{{badge}}\n"
    );
    assert!(work.path().join(".packsmith").is_file());

    assert_eq!(service.clear(work.path()).unwrap(), report.entries.len());
    assert_eq!(listing(work.path()), before);
}

#[test]
fn interrupted_clear_can_be_resumed() {
    let (_assets_dir, assets) = package_assets();
    let work = TempDir::new().unwrap();
    let before = listing(work.path());

    let service = local_service(assets);
    let ctx = Context::new().with("package", "demo");
    service.scaffold(&package_tree(), work.path(), &ctx).unwrap();
    let user_file = work.path().join("src/demo/user.py");
    fs::write(&user_file, "print('mine')\n").unwrap();

    let err = service.clear(work.path()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::RollbackFailure);
    let manifest = work.path().join(".packsmith");
    assert!(manifest.is_file());
    assert!(user_file.is_file());
    assert!(!work.path().join("README.md").exists());

    fs::remove_file(&user_file).unwrap();
    assert_eq!(service.clear(work.path()).unwrap(), 3);
    assert_eq!(listing(work.path()), before);
}

#[test]
fn failed_scaffold_restores_the_directory() {
    let (_assets_dir, assets) = install_assets(&[
        ("init.t", "# {package}\n"),
        ("setup.cfg.t", "[metadata]\n"),
        ("setup.cfg.scripts.t", "[options]\n"),
    ]);
    let work = TempDir::new().unwrap();
    fs::create_dir(work.path().join("existing")).unwrap();
    let before = listing(work.path());

    let service = local_service(assets);
    let ctx = Context::new().with("package", "demo");
    let err = service
        .scaffold(&package_tree(), work.path(), &ctx)
        .unwrap_err();

    let ScaffoldError::Application(ApplicationError::NotInstalled { name, .. }) = err else {
        panic!("expected NotInstalled");
    };
    assert_eq!(name, "README.md.t");
    assert_eq!(listing(work.path()), before);
}

#[test]
fn conflict_with_user_file_keeps_it() {
    let (_assets_dir, assets) = package_assets();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("README.md"), "hand written").unwrap();
    let before = listing(work.path());

    let err = local_service(assets)
        .scaffold(&package_tree(), work.path(), &Context::new())
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Conflict);
    assert_eq!(listing(work.path()), before);
}

// ── memory filesystem faults ──────────────────────────────────────────────

fn memory_service(fs: &MemoryFilesystem) -> ScaffoldService {
    let mut assets = FixedAssets::default();
    assets.add("init.t");
    fs.add_file("/assets/init.t", "# {package}\n");
    let filesystem: Arc<dyn Filesystem> = Arc::new(fs.clone());
    ScaffoldService::new(
        filesystem.clone(),
        Renderer::new(Box::new(assets), filesystem),
    )
}

/// Locator resolving a fixed set of names to `/assets/<name>`.
#[derive(Default)]
struct FixedAssets {
    names: Vec<String>,
}

impl FixedAssets {
    fn add(&mut self, name: &str) {
        self.names.push(name.to_string());
    }
}

impl AssetLocator for FixedAssets {
    fn resolve(&self, logical_name: &str) -> ScaffoldResult<PathBuf> {
        if self.names.iter().any(|n| n == logical_name) {
            Ok(Path::new("/assets").join(logical_name))
        } else {
            Err(ApplicationError::NotInstalled {
                name: logical_name.to_string(),
                searched: vec![PathBuf::from("/assets")],
            }
            .into())
        }
    }
}

#[test]
fn partial_write_failure_is_rolled_back() {
    let fs = MemoryFilesystem::with_dir("/work");
    let service = memory_service(&fs);
    let before = fs.list_paths();
    fs.fail_writes_to("/work/tests/__init__.py");

    let err = service
        .scaffold(&package_tree(), "/work", &Context::new())
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::FilesystemError { .. })
    ));
    assert_eq!(fs.list_paths(), before);
}

#[test]
fn rollback_failure_names_the_stuck_entry() {
    let fs = MemoryFilesystem::with_dir("/work");
    let service = memory_service(&fs);
    fs.fail_removal_of("/work/docs");

    // `setup.cfg.t` is not installed, so the run fails after `tests/`.
    let err = service
        .scaffold(&package_tree(), "/work", &Context::new())
        .unwrap_err();

    assert!(err.is_rollback_failure());
    let ScaffoldError::Application(ApplicationError::RollbackFailed { path, .. }) = err else {
        panic!("expected RollbackFailed");
    };
    assert_eq!(path, PathBuf::from("/work/docs"));
    // Later entries were removed; the stuck one and its elders remain.
    assert!(fs.exists(Path::new("/work/docs")));
    assert!(fs.exists(Path::new("/work/src/demo/__init__.py")));
    assert!(!fs.exists(Path::new("/work/tests")));
}
