use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::Registry;

/// Map of package prefix to its published versions, newest first.
pub type PackageVersions = BTreeMap<String, Vec<String>>;

/// The persisted `versions.json` document.
///
/// Nested `BTreeMap`s keep serialized key order sorted, so two documents
/// built from the same qualifying set are byte-identical regardless of
/// insertion order. The file is version-controlled; diff stability matters
/// as much as correctness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionsFile {
    pub versions: BTreeMap<String, PackageVersions>,
}

impl VersionsFile {
    /// An empty document with every registry key present.
    pub fn with_all_registries() -> Self {
        let versions = Registry::ALL
            .iter()
            .map(|registry| (registry.as_str().to_string(), PackageVersions::new()))
            .collect();
        Self { versions }
    }

    pub fn registry(&self, registry: Registry) -> Option<&PackageVersions> {
        self.versions.get(registry.as_str())
    }

    pub fn registry_mut(&mut self, registry: Registry) -> &mut PackageVersions {
        self.versions
            .entry(registry.as_str().to_string())
            .or_default()
    }
}
