use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

/// Dotted numeric version: `MAJOR.MINOR` with an optional `PATCH`.
pub static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("version pattern is valid"));

/// Parses a dotted numeric version string.
///
/// Two-component versions are padded to a full triple so `semver` can
/// carry the comparison. Anything outside the pattern (pre-release tags,
/// build metadata, date stamps) returns `None`.
pub fn parse_dotted_version(raw: &str) -> Option<Version> {
    if !VERSION_PATTERN.is_match(raw) {
        return None;
    }
    let dots = raw.bytes().filter(|byte| *byte == b'.').count();
    let candidate = if dots == 1 {
        format!("{raw}.0")
    } else {
        raw.to_string()
    };
    Version::parse(&candidate).ok()
}

/// Sorts a version list in descending order.
///
/// Numeric component comparison applies when every member parses as a
/// dotted numeric version. If any member fails to parse the whole list
/// falls back to lexical descending, keeping the order total instead of
/// mixing two comparison semantics within one list. Equal numeric keys
/// (`"1.0"` vs `"1.0.0"`) are tie-broken lexically so the result never
/// depends on arrival order.
pub fn sort_versions_descending(versions: &mut Vec<String>) {
    let mut keyed: Vec<(Option<Version>, String)> = versions
        .drain(..)
        .map(|raw| (parse_dotted_version(&raw), raw))
        .collect();

    if keyed.iter().all(|(key, _)| key.is_some()) {
        keyed.sort_by(|(a_key, a_raw), (b_key, b_raw)| {
            b_key.cmp(a_key).then_with(|| b_raw.cmp(a_raw))
        });
    } else {
        keyed.sort_by(|(_, a_raw), (_, b_raw)| b_raw.cmp(a_raw));
    }

    versions.extend(keyed.into_iter().map(|(_, raw)| raw));
}
