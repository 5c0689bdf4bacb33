use std::collections::HashSet;
use std::path::Path;

use almanac_types::{Registry, VERSION_PATTERN, VersionsFile, restore_candidates};

use crate::FileOutcome;
use crate::index::load_index_packages;

pub fn validate_versions(path: &Path, content: &str) -> FileOutcome {
    let document: VersionsFile = match serde_json::from_str(content) {
        Ok(document) => document,
        Err(err) => {
            return FileOutcome::Invalid {
                problems: vec![format!("invalid versions.json: {err}")],
            };
        }
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let Some(index_packages) = load_index_packages(base) else {
        return FileOutcome::Invalid {
            problems: vec!["index.json not found or invalid for cross-validation".to_string()],
        };
    };

    let mut problems = Vec::new();
    for registry in Registry::ALL {
        let Some(packages) = document.registry(registry) else {
            problems.push(format!("missing required registry: {}", registry.as_str()));
            continue;
        };

        for (native_id, versions) in packages {
            check_versions(registry, native_id, versions, &mut problems);
            check_index_entry(registry, native_id, &index_packages, &mut problems);
            check_config_exists(registry, native_id, base, &mut problems);
        }
    }

    if problems.is_empty() {
        FileOutcome::Valid {
            message: "valid versions.json".to_string(),
        }
    } else {
        FileOutcome::Invalid { problems }
    }
}

fn check_versions(
    registry: Registry,
    native_id: &str,
    versions: &[String],
    problems: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for version in versions {
        if !seen.insert(version.as_str()) {
            problems.push(format!(
                "duplicate version '{version}' for '{native_id}' in {registry}"
            ));
        }
        if !VERSION_PATTERN.is_match(version) {
            problems.push(format!(
                "version '{version}' for '{native_id}' in {registry} must be in x.y or x.y.z format"
            ));
        }
    }
}

/// Some restoration of the native id must appear in the index as
/// `<registry>/<restored>`.
fn check_index_entry(
    registry: Registry,
    native_id: &str,
    index_packages: &HashSet<String>,
    problems: &mut Vec<String>,
) {
    let candidates = restore_candidates(native_id, registry);
    let found = candidates
        .iter()
        .any(|candidate| index_packages.contains(&format!("{registry}/{candidate}")));
    if !found {
        let attempted: Vec<String> = candidates
            .iter()
            .map(|candidate| format!("{registry}/{candidate}"))
            .collect();
        problems.push(format!(
            "package for '{native_id}' in {registry} not found in index.json, tried {attempted:?}"
        ));
    }
}

/// Some restoration of the native id must have a config.json on disk.
fn check_config_exists(
    registry: Registry,
    native_id: &str,
    base: &Path,
    problems: &mut Vec<String>,
) {
    let candidates = restore_candidates(native_id, registry);
    let found = candidates.iter().any(|candidate| {
        base.join(registry.as_str())
            .join(candidate)
            .join("config.json")
            .exists()
    });
    if !found {
        problems.push(format!(
            "missing config.json for '{native_id}' in {registry}, tried restorations {candidates:?}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// Repository layout with one npm package tracked under its restored
    /// identifier, plus empty entries for the other registries.
    fn repo_with_package() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("npm/@types/node")).unwrap();
        fs::write(dir.path().join("npm/@types/node/config.json"), "{}").unwrap();
        fs::write(
            dir.path().join("index.json"),
            r#"{"packages": ["npm/@types/node"]}"#,
        )
        .unwrap();

        let versions = r#"{
            "versions": {
                "npm": {"_types_node": ["20.11.0", "20.10.0"]},
                "py_pi": {},
                "crates_io": {},
                "golang_proxy": {},
                "github_releases": {},
                "terraform": {},
                "ruby_gems": {}
            }
        }"#;
        let path = dir.path().join("versions.json");
        fs::write(&path, versions).unwrap();
        (dir, path)
    }

    fn validate_at(path: &Path) -> FileOutcome {
        validate_versions(path, &fs::read_to_string(path).unwrap())
    }

    #[test]
    fn accepts_a_document_cross_referenced_through_restoration() {
        let (_dir, path) = repo_with_package();
        let outcome = validate_at(&path);
        assert!(outcome.is_valid(), "{outcome:?}");
    }

    #[test]
    fn rejects_a_document_missing_a_registry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.json"), r#"{"packages": []}"#).unwrap();
        let path = dir.path().join("versions.json");
        fs::write(&path, r#"{"versions": {"npm": {}}}"#).unwrap();

        match validate_at(&path) {
            FileOutcome::Invalid { problems } => {
                // Six of the seven required registries are absent.
                assert_eq!(problems.len(), 6);
                assert!(problems[0].contains("missing required registry"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_and_malformed_versions() {
        let (dir, path) = repo_with_package();
        fs::write(
            &path,
            r#"{
                "versions": {
                    "npm": {"_types_node": ["20.11.0", "20.11.0", "v1"]},
                    "py_pi": {}, "crates_io": {}, "golang_proxy": {},
                    "github_releases": {}, "terraform": {}, "ruby_gems": {}
                }
            }"#,
        )
        .unwrap();

        match validate_at(&path) {
            FileOutcome::Invalid { problems } => {
                assert!(problems.iter().any(|p| p.contains("duplicate version")));
                assert!(problems.iter().any(|p| p.contains("'v1'")));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        drop(dir);
    }

    #[test]
    fn rejects_a_package_absent_from_the_index() {
        let (dir, path) = repo_with_package();
        fs::write(
            &path,
            r#"{
                "versions": {
                    "npm": {"_types_node": ["20.11.0"], "left-pad": ["1.3.0"]},
                    "py_pi": {}, "crates_io": {}, "golang_proxy": {},
                    "github_releases": {}, "terraform": {}, "ruby_gems": {}
                }
            }"#,
        )
        .unwrap();

        match validate_at(&path) {
            FileOutcome::Invalid { problems } => {
                assert!(problems.iter().any(|p| p.contains("'left-pad'")));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        drop(dir);
    }

    #[test]
    fn missing_index_fails_cross_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versions.json");
        fs::write(&path, r#"{"versions": {}}"#).unwrap();

        match validate_at(&path) {
            FileOutcome::Invalid { problems } => {
                assert!(problems[0].contains("index.json not found"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
