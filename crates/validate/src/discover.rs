use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

const VALIDATED_FILE_NAMES: [&str; 3] = ["config.json", "index.json", "versions.json"];

/// Finds every validated metadata file under `root`, sorted for stable
/// output.
pub fn find_validation_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| VALIDATED_FILE_NAMES.contains(&name))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    debug!(root = %root.display(), count = files.len(), "discovered validation files");
    files
}
