use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::FileOutcome;

/// The repository `index.json`: one path entry per tracked package,
/// `<registry>/<original identifier>`.
#[derive(Debug, Deserialize)]
pub struct IndexFile {
    pub packages: Vec<String>,
}

pub fn validate_index(path: &Path, content: &str) -> FileOutcome {
    let index: IndexFile = match serde_json::from_str(content) {
        Ok(index) => index,
        Err(err) => {
            return FileOutcome::Invalid {
                problems: vec![format!("invalid index.json: {err}")],
            };
        }
    };

    let mut problems = Vec::new();

    let duplicates = duplicated(&index.packages);
    if !duplicates.is_empty() {
        problems.push(format!("found duplicate packages: {duplicates:?}"));
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for package in &index.packages {
        if !base.join(package).exists() {
            problems.push(format!("package path '{package}' does not exist"));
        }
    }

    if problems.is_empty() {
        FileOutcome::Valid {
            message: "valid index.json".to_string(),
        }
    } else {
        FileOutcome::Invalid { problems }
    }
}

/// Loads the package set from the `index.json` next to a versions file,
/// for cross-validation. `None` when the index is missing or malformed.
pub(crate) fn load_index_packages(base: &Path) -> Option<HashSet<String>> {
    let content = fs::read_to_string(base.join("index.json")).ok()?;
    let index: IndexFile = serde_json::from_str(&content).ok()?;
    Some(index.packages.into_iter().collect())
}

fn duplicated(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for value in values {
        if !seen.insert(value.as_str()) && !duplicates.contains(value) {
            duplicates.push(value.clone());
        }
    }
    duplicates
}
