//! Native-identifier restoration.
//!
//! Collection prefixes normalize the characters registries allow in
//! package names (`@`, `/`, `.`) down to underscores. Restoration runs
//! the other way: given a normalized id, produce the original identifiers
//! it could have come from, most likely first. Both the sync engine's
//! consumers and the file validators resolve ids through this one
//! implementation so they can never disagree.

use std::collections::HashSet;

use crate::registry::Registry;

/// Ordered, deduplicated candidate original identifiers for a normalized
/// native id. The id itself is always the last-resort candidate.
pub fn restore_candidates(native_id: &str, registry: Registry) -> Vec<String> {
    let mut candidates = match registry {
        Registry::Npm => npm_candidates(native_id),
        Registry::GolangProxy => golang_candidates(native_id),
        _ => generic_candidates(native_id),
    };
    dedup_preserving_order(&mut candidates);
    candidates
}

fn npm_candidates(native_id: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if native_id.contains('_') {
        if let Some(stripped) = native_id.strip_prefix('_') {
            // _types_node -> @types/node
            match stripped.split_once('_') {
                Some((scope, rest)) => candidates.push(format!("@{scope}/{rest}")),
                None => candidates.push(format!("@{stripped}")),
            }
        } else if let Some((scope, rest)) = native_id.split_once('_') {
            // aws-crypto_util -> @aws-crypto/util
            candidates.push(format!("@{scope}/{rest}"));
        }
    }

    // Known collision: "." is also normalized away.
    if native_id.contains("socketio") {
        candidates.push(native_id.replace("socketio", "socket.io"));
    }

    candidates.push(native_id.to_string());
    candidates
}

fn golang_candidates(native_id: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if native_id.contains('_') {
        if let Some(rest) = native_id.strip_prefix("github.com_") {
            match rest.split_once('_') {
                // github.com_user_some_repo -> github.com/user/some_repo;
                // only the host and user separators are restored, the repo
                // name keeps its own underscores.
                Some((user, repo)) => candidates.push(format!("github.com/{user}/{repo}")),
                None => candidates.push(native_id.replace('_', "/")),
            }
        } else {
            candidates.push(native_id.replace('_', "/"));
        }
    }

    candidates.push(native_id.to_string());
    candidates
}

fn generic_candidates(native_id: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if native_id.contains('_') {
        candidates.push(native_id.replace('_', "/"));
    }
    candidates.push(native_id.to_string());
    candidates
}

fn dedup_preserving_order(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npm_scoped_package_with_leading_underscore() {
        assert_eq!(
            restore_candidates("_types_node", Registry::Npm),
            vec!["@types/node", "_types_node"]
        );
    }

    #[test]
    fn npm_scoped_package_without_leading_underscore() {
        assert_eq!(
            restore_candidates("aws-crypto_util", Registry::Npm),
            vec!["@aws-crypto/util", "aws-crypto_util"]
        );
    }

    #[test]
    fn npm_socketio_special_case() {
        assert_eq!(
            restore_candidates("socketio-client", Registry::Npm),
            vec!["socket.io-client", "socketio-client"]
        );
    }

    #[test]
    fn golang_github_module_path() {
        assert_eq!(
            restore_candidates("github.com_user_some_repo", Registry::GolangProxy),
            vec!["github.com/user/some_repo", "github.com_user_some_repo"]
        );
    }

    #[test]
    fn golang_non_github_path_substitutes_every_separator() {
        assert_eq!(
            restore_candidates("gopkg.in_yaml.v3", Registry::GolangProxy),
            vec!["gopkg.in/yaml.v3", "gopkg.in_yaml.v3"]
        );
    }

    #[test]
    fn generic_substitution_for_other_registries() {
        assert_eq!(
            restore_candidates("rails_activesupport", Registry::RubyGems),
            vec!["rails/activesupport", "rails_activesupport"]
        );
    }

    #[test]
    fn identifier_without_separator_is_just_itself() {
        assert_eq!(restore_candidates("serde", Registry::CratesIo), vec!["serde"]);
    }

    #[test]
    fn candidates_are_deduplicated_in_generation_order() {
        // The substitution and the identity collide when there is nothing
        // to substitute back.
        let candidates = restore_candidates("tokio", Registry::GolangProxy);
        assert_eq!(candidates, vec!["tokio"]);
    }
}
