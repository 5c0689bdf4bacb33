use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use almanac_types::VersionsFile;

use crate::error::{Result, SyncError};

/// Load/save of the persisted versions document.
///
/// Saves serialize with sorted keys and two-space indentation so repeated
/// runs over identical qualifying sets produce byte-identical files. The
/// document is written to a temporary file next to the target and renamed
/// over it; a failed save leaves the previous manifest on disk untouched.
pub struct VersionsStore {
    path: PathBuf,
}

impl VersionsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<VersionsFile> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(SyncError::VersionsFileNotFound(self.path.clone()));
            }
            Err(err) => {
                return Err(SyncError::Load {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| SyncError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, document: &VersionsFile) -> Result<()> {
        let mut serialized =
            serde_json::to_string_pretty(document).map_err(|source| SyncError::Encode { source })?;
        serialized.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let commit_error = |source: std::io::Error| SyncError::Commit {
            path: self.path.clone(),
            source,
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(commit_error)?;
        file.write_all(serialized.as_bytes()).map_err(commit_error)?;
        file.persist(&self.path)
            .map_err(|err| commit_error(err.error))?;

        debug!(path = %self.path.display(), bytes = serialized.len(), "versions file written");
        Ok(())
    }
}
