use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entry::TrackerEntry;

/// File name of the manifest written into every scaffolded base path.
pub const MANIFEST_FILE: &str = ".packsmith";

/// Persisted record of one scaffolding run.
///
/// The entry list is the tracker log at the end of the run, the manifest
/// itself included last, so replaying it in reverse removes everything the
/// run created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub package: Option<String>,
    pub author: Option<String>,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<TrackerEntry>,
}

impl Manifest {
    pub fn new(path: impl Into<PathBuf>, entries: Vec<TrackerEntry>) -> Self {
        Self {
            version: crate::VERSION.to_string(),
            package: None,
            author: None,
            path: path.into(),
            created_at: Utc::now(),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
