use std::collections::BTreeMap;

use tracing::warn;

use almanac_types::{
    Collection, Registry, VersionsFile, sort_versions_descending, split_collection_name,
};

/// Result of rebuilding the versions document: the document plus the
/// collection names that could not be split into a (prefix, version) pair.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub document: VersionsFile,
    /// `database/name` identifiers, excluded from the document.
    pub unparseable: Vec<String>,
}

/// Rebuilds the complete versions document from the qualifying collections
/// of every registry.
///
/// The document is always built from scratch, never patched: the output
/// then reflects exactly the currently-qualifying set and deleted or
/// renamed collections cannot leave stale entries behind. Registries are
/// iterated in a fixed order and all grouping is over sorted maps, so the
/// same qualifying multiset yields byte-identical serialized output no
/// matter what order the collections arrived in.
pub fn build_versions_file(qualifying: &BTreeMap<Registry, Vec<Collection>>) -> BuildOutcome {
    let mut outcome = BuildOutcome {
        document: VersionsFile::with_all_registries(),
        unparseable: Vec::new(),
    };

    for registry in Registry::ALL {
        let collections = qualifying
            .get(&registry)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for collection in collections {
            match split_collection_name(&collection.name) {
                Some((prefix, version)) if !prefix.is_empty() && !version.is_empty() => {
                    grouped
                        .entry(prefix.to_string())
                        .or_default()
                        .push(version.to_string());
                }
                _ => {
                    warn!(
                        database = registry.as_str(),
                        name = %collection.name,
                        "could not split collection name into prefix and version"
                    );
                    outcome
                        .unparseable
                        .push(format!("{}/{}", registry.as_str(), collection.name));
                }
            }
        }

        for versions in grouped.values_mut() {
            sort_versions_descending(versions);
            versions.dedup();
        }

        *outcome.document.registry_mut(registry) = grouped;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(name: &str) -> Collection {
        Collection {
            name: name.to_string(),
            id: format!("id-{name}"),
            metadata: None,
        }
    }

    fn qualifying(
        entries: &[(Registry, &[&str])],
    ) -> BTreeMap<Registry, Vec<Collection>> {
        entries
            .iter()
            .map(|(registry, names)| {
                (*registry, names.iter().map(|name| collection(name)).collect())
            })
            .collect()
    }

    #[test]
    fn every_registry_key_is_present_even_when_empty() {
        let outcome = build_versions_file(&BTreeMap::new());
        for registry in Registry::ALL {
            assert!(outcome.document.registry(registry).is_some());
        }
    }

    #[test]
    fn groups_by_prefix_and_sorts_versions_descending() {
        let input = qualifying(&[(
            Registry::Npm,
            &["pkgX_1.0.0", "pkgX_2.0.0", "pkgY_0.5"][..],
        )]);
        let outcome = build_versions_file(&input);
        let npm = outcome.document.registry(Registry::Npm).unwrap();
        assert_eq!(npm["pkgX"], vec!["2.0.0", "1.0.0"]);
        assert_eq!(npm["pkgY"], vec!["0.5"]);
        assert!(outcome.unparseable.is_empty());
    }

    #[test]
    fn unparseable_names_are_excluded_and_recorded() {
        let input = qualifying(&[(Registry::CratesIo, &["unparseable", "serde_1.0.219"][..])]);
        let outcome = build_versions_file(&input);
        let crates_io = outcome.document.registry(Registry::CratesIo).unwrap();
        assert_eq!(crates_io.len(), 1);
        assert_eq!(crates_io["serde"], vec!["1.0.219"]);
        assert_eq!(outcome.unparseable, vec!["crates_io/unparseable"]);
    }

    #[test]
    fn empty_prefix_or_version_counts_as_unparseable() {
        let input = qualifying(&[(Registry::Npm, &["_1.0.0", "pkg_"][..])]);
        let outcome = build_versions_file(&input);
        assert!(outcome.document.registry(Registry::Npm).unwrap().is_empty());
        assert_eq!(outcome.unparseable.len(), 2);
    }

    #[test]
    fn duplicate_versions_collapse() {
        // Two collections can map to the same (prefix, version) only via
        // pathological names, but the document must stay duplicate-free.
        let input = qualifying(&[(Registry::Npm, &["pkg_1.0", "pkg_1.0"][..])]);
        let outcome = build_versions_file(&input);
        assert_eq!(
            outcome.document.registry(Registry::Npm).unwrap()["pkg"],
            vec!["1.0"]
        );
    }

    #[test]
    fn output_is_independent_of_arrival_order() {
        let forward = qualifying(&[
            (Registry::Npm, &["a_1.0", "a_1.10", "a_1.9", "b_2.0"][..]),
            (Registry::PyPi, &["requests_2.31.0", "requests_2.30.0"][..]),
        ]);
        let reversed = qualifying(&[
            (Registry::PyPi, &["requests_2.30.0", "requests_2.31.0"][..]),
            (Registry::Npm, &["b_2.0", "a_1.9", "a_1.10", "a_1.0"][..]),
        ]);

        let first = serde_json::to_string_pretty(&build_versions_file(&forward).document).unwrap();
        let second =
            serde_json::to_string_pretty(&build_versions_file(&reversed).document).unwrap();
        assert_eq!(first, second);
    }
}
