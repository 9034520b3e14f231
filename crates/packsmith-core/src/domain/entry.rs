use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of filesystem entry recorded by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Dir,
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dir => write!(f, "DIR"),
            Self::File => write!(f, "FILE"),
        }
    }
}

/// One created entry, in the order it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
    pub kind: EntryKind,
    pub path: PathBuf,
}

impl TrackerEntry {
    pub fn new(kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::new(EntryKind::Dir, path)
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(EntryKind::File, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for TrackerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}
