//! Validators for the repository's metadata files.
//!
//! Three file kinds are validated: per-package `config.json`, the
//! repository `index.json`, and the `versions.json` the sync engine
//! commits. `versions.json` is cross-checked against the other two using
//! the same identifier-restoration rules the rest of the pipeline uses.
//! All problems found in one file are accumulated and reported together.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

pub mod config;
pub mod discover;
pub mod index;
pub mod versions;

pub use config::PackageConfig;
pub use discover::find_validation_files;

/// Verdict for one validated file.
#[derive(Debug)]
pub enum FileOutcome {
    Valid { message: String },
    Invalid { problems: Vec<String> },
    /// File name is not one of the validated kinds.
    Skipped { reason: String },
}

impl FileOutcome {
    pub fn is_valid(&self) -> bool {
        !matches!(self, FileOutcome::Invalid { .. })
    }
}

/// Validates a single file, dispatching on its file name.
pub fn validate_file(path: &Path) -> FileOutcome {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            return FileOutcome::Invalid {
                problems: vec![format!("failed to read {}: {err}", path.display())],
            };
        }
    };

    match path.file_name().and_then(OsStr::to_str) {
        Some("config.json") => config::validate_config(&content),
        Some("index.json") => index::validate_index(path, &content),
        Some("versions.json") => versions::validate_versions(path, &content),
        _ => FileOutcome::Skipped {
            reason: format!("unknown file type '{}', skipping", path.display()),
        },
    }
}
