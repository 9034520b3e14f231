//! Transactional bookkeeping for filesystem creation.
//!
//! Every entry created during a run goes through [`Tracker::create`], which
//! performs the mutation and appends it to an ordered log. [`Tracker::rollback`]
//! replays that log backwards, so children always go before their parent
//! directory.
//!
//! A log is owned by exactly one run: it grows while the run proceeds and is
//! either dropped (success) or drained by rollback (failure).

use std::path::Path;

use tracing::{debug, error, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{EntryKind, TrackerEntry},
    error::{ScaffoldError, ScaffoldResult},
};

/// Ordered log of created entries with reverse-order undo.
pub struct Tracker<'fs> {
    fs: &'fs dyn Filesystem,
    log: Vec<TrackerEntry>,
}

impl<'fs> Tracker<'fs> {
    /// Start an empty log for a new run.
    pub fn new(fs: &'fs dyn Filesystem) -> Self {
        Self {
            fs,
            log: Vec::new(),
        }
    }

    /// Pick up a log persisted by an earlier process, e.g. from a manifest.
    pub fn resume(fs: &'fs dyn Filesystem, entries: Vec<TrackerEntry>) -> Self {
        Self { fs, log: entries }
    }

    /// Create `path` and record it.
    ///
    /// Directories are created empty; files receive all of `content` (empty
    /// when `None`). The entry is logged only once the mutation succeeded.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::PathConflict`] if `path` already exists; nothing
    ///   is touched and nothing is logged.
    /// - Whatever the filesystem reports if the mutation fails.
    pub fn create(
        &mut self,
        kind: EntryKind,
        path: &Path,
        content: Option<&[u8]>,
    ) -> ScaffoldResult<()> {
        if self.fs.exists(path) {
            return Err(ApplicationError::PathConflict {
                path: path.to_path_buf(),
            }
            .into());
        }

        match kind {
            EntryKind::Dir => {
                if content.is_some() {
                    return Err(ScaffoldError::Internal {
                        message: format!("directory {} cannot take content", path.display()),
                    });
                }
                self.fs.create_dir(path)?;
            }
            EntryKind::File => self.fs.write_new_file(path, content.unwrap_or_default())?,
        }

        debug!(kind = %kind, path = %path.display(), "Created");
        self.log.push(TrackerEntry::new(kind, path));
        Ok(())
    }

    pub fn create_dir(&mut self, path: &Path) -> ScaffoldResult<()> {
        self.create(EntryKind::Dir, path, None)
    }

    pub fn create_file(&mut self, path: &Path, content: &[u8]) -> ScaffoldResult<()> {
        self.create(EntryKind::File, path, Some(content))
    }

    /// Remove every logged entry, last created first.
    ///
    /// Returns how many entries were removed.
    ///
    /// # Errors
    ///
    /// Stops at the first entry that cannot be removed and returns
    /// [`ApplicationError::RollbackFailed`] naming it. That entry and
    /// everything created before it stay in the log. Callers must not retry
    /// automatically.
    pub fn rollback(&mut self) -> ScaffoldResult<usize> {
        if !self.log.is_empty() {
            warn!(entries = self.log.len(), "Rolling back");
        }

        let mut removed = 0;
        while let Some(entry) = self.log.pop() {
            let result = match entry.kind {
                EntryKind::File => self.fs.remove_file(&entry.path),
                EntryKind::Dir => self.fs.remove_dir(&entry.path),
            };

            if let Err(e) = result {
                error!(
                    kind = %entry.kind,
                    path = %entry.path.display(),
                    error = %e,
                    "Rollback aborted; manual cleanup required"
                );
                let failure = ApplicationError::RollbackFailed {
                    path: entry.path.clone(),
                    reason: failure_reason(&e),
                };
                self.log.push(entry);
                return Err(failure.into());
            }

            debug!(kind = %entry.kind, path = %entry.path.display(), "Removed");
            removed += 1;
        }

        Ok(removed)
    }

    /// Entries in creation order.
    pub fn entries(&self) -> &[TrackerEntry] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn into_entries(self) -> Vec<TrackerEntry> {
        self.log
    }
}

fn failure_reason(err: &ScaffoldError) -> String {
    match err {
        ScaffoldError::Application(ApplicationError::FilesystemError { reason, .. }) => {
            reason.clone()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mockall::Sequence;

    use super::*;
    use crate::application::ports::MockFilesystem;

    fn io_failure(path: &Path, reason: &str) -> ScaffoldError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
        .into()
    }

    fn permissive() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_write_new_file().returning(|_, _| Ok(()));
        fs
    }

    #[test]
    fn logs_in_creation_order() {
        let fs = permissive();
        let mut tracker = Tracker::new(&fs);

        tracker.create_dir(Path::new("/tmp/x/src")).unwrap();
        tracker
            .create_file(Path::new("/tmp/x/src/__init__.py"), b"# demo\n")
            .unwrap();

        assert_eq!(
            tracker.entries(),
            [
                TrackerEntry::dir("/tmp/x/src"),
                TrackerEntry::file("/tmp/x/src/__init__.py"),
            ]
        );
    }

    #[test]
    fn existing_path_conflicts_without_touching_anything() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_create_dir().never();
        fs.expect_write_new_file().never();

        let mut tracker = Tracker::new(&fs);
        let err = tracker.create_dir(Path::new("/tmp/x/src")).unwrap_err();

        assert_eq!(
            err,
            ScaffoldError::from(ApplicationError::PathConflict {
                path: PathBuf::from("/tmp/x/src")
            })
        );
        assert!(tracker.is_empty());
    }

    #[test]
    fn failed_mutation_is_not_logged() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_write_new_file()
            .returning(|path, _| Err(io_failure(path, "disk full")));

        let mut tracker = Tracker::new(&fs);
        assert!(tracker.create_file(Path::new("/tmp/x/a"), b"a").is_err());
        assert!(tracker.is_empty());
    }

    #[test]
    fn missing_content_writes_an_empty_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_write_new_file()
            .withf(|_, content| content.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut tracker = Tracker::new(&fs);
        tracker
            .create(EntryKind::File, Path::new("/tmp/x/empty"), None)
            .unwrap();
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn directories_reject_content() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir().never();

        let mut tracker = Tracker::new(&fs);
        let result = tracker.create(
            EntryKind::Dir,
            Path::new("/tmp/x/d"),
            Some(b"x".as_slice()),
        );
        assert!(matches!(result, Err(ScaffoldError::Internal { .. })));
        assert!(tracker.is_empty());
    }

    #[test]
    fn rollback_runs_in_exact_reverse_order() {
        let mut fs = permissive();
        let mut seq = Sequence::new();
        fs.expect_remove_file()
            .withf(|p| p.ends_with("b.py"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_remove_file()
            .withf(|p| p.ends_with("a.py"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_remove_dir()
            .withf(|p| p.ends_with("src"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut tracker = Tracker::new(&fs);
        tracker.create_dir(Path::new("/x/src")).unwrap();
        tracker.create_file(Path::new("/x/src/a.py"), b"").unwrap();
        tracker.create_file(Path::new("/x/src/b.py"), b"").unwrap();

        assert_eq!(tracker.rollback().unwrap(), 3);
        assert!(tracker.is_empty());
    }

    #[test]
    fn rollback_failure_names_the_path_and_stops() {
        let mut fs = permissive();
        fs.expect_remove_file()
            .returning(|p| Err(io_failure(p, "permission denied")));
        fs.expect_remove_dir().never();

        let mut tracker = Tracker::new(&fs);
        tracker.create_dir(Path::new("/x/src")).unwrap();
        tracker.create_file(Path::new("/x/src/a.py"), b"").unwrap();

        let err = tracker.rollback().unwrap_err();
        assert_eq!(
            err,
            ScaffoldError::from(ApplicationError::RollbackFailed {
                path: PathBuf::from("/x/src/a.py"),
                reason: "permission denied".into(),
            })
        );
        // The offending entry stays at the tail for the operator.
        assert_eq!(
            tracker.entries(),
            [
                TrackerEntry::dir("/x/src"),
                TrackerEntry::file("/x/src/a.py"),
            ]
        );
    }

    #[test]
    fn rollback_of_empty_log_is_a_no_op() {
        let fs = MockFilesystem::new();
        let mut tracker = Tracker::new(&fs);
        assert_eq!(tracker.rollback().unwrap(), 0);
        assert_eq!(tracker.rollback().unwrap(), 0);
    }

    #[test]
    fn resumed_log_rolls_back_like_a_fresh_one() {
        let mut fs = MockFilesystem::new();
        fs.expect_remove_file().times(1).returning(|_| Ok(()));
        fs.expect_remove_dir().times(1).returning(|_| Ok(()));

        let mut tracker = Tracker::resume(
            &fs,
            vec![TrackerEntry::dir("/x/docs"), TrackerEntry::file("/x/.packsmith")],
        );
        assert_eq!(tracker.rollback().unwrap(), 2);
        assert!(tracker.into_entries().is_empty());
    }
}
