use chrono::NaiveDateTime;
use serde::Deserialize;

use almanac_types::Registry;

use crate::FileOutcome;

/// Timestamps must be UTC with an explicit `Z`, second precision.
const SENTINEL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A per-package `config.json`.
///
/// Deserialization enforces field presence and types; the registry field
/// is checked against the known set by parsing it as [`Registry`].
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    pub native_identifier: String,
    pub collection_name_prefix: String,
    pub repo: String,
    pub registry: Registry,
    pub tag_formats: Vec<String>,
    pub sentinel_timestamp: String,
    pub include: Vec<String>,
    pub version_sample_relative_size: f64,
    pub version_sample_max_size: u64,
}

pub fn validate_config(content: &str) -> FileOutcome {
    let config: PackageConfig = match serde_json::from_str(content) {
        Ok(config) => config,
        Err(err) => {
            return FileOutcome::Invalid {
                problems: vec![format!("invalid config.json: {err}")],
            };
        }
    };

    if NaiveDateTime::parse_from_str(&config.sentinel_timestamp, SENTINEL_TIMESTAMP_FORMAT)
        .is_err()
    {
        return FileOutcome::Invalid {
            problems: vec![format!(
                "sentinel_timestamp '{}' must be in RFC 3339 format (YYYY-MM-DDTHH:MM:SSZ)",
                config.sentinel_timestamp
            )],
        };
    }

    FileOutcome::Valid {
        message: "valid config.json".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(registry: &str, timestamp: &str) -> String {
        format!(
            r#"{{
                "native_identifier": "@types/node",
                "collection_name_prefix": "_types_node",
                "repo": "DefinitelyTyped/DefinitelyTyped",
                "registry": "{registry}",
                "tag_formats": ["v{{version}}"],
                "sentinel_timestamp": "{timestamp}",
                "include": ["types"],
                "version_sample_relative_size": 0.25,
                "version_sample_max_size": 20
            }}"#
        )
    }

    #[test]
    fn accepts_a_complete_config() {
        let outcome = validate_config(&sample("npm", "2024-01-15T10:30:00Z"));
        assert!(outcome.is_valid(), "{outcome:?}");
    }

    #[test]
    fn rejects_a_missing_field() {
        let outcome = validate_config(r#"{"native_identifier": "x"}"#);
        match outcome {
            FileOutcome::Invalid { problems } => {
                assert!(problems[0].contains("missing field"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rejects_an_unknown_registry() {
        let outcome = validate_config(&sample("homebrew", "2024-01-15T10:30:00Z"));
        assert!(!outcome.is_valid());
    }

    #[test]
    fn rejects_a_timestamp_without_zulu_suffix() {
        let outcome = validate_config(&sample("npm", "2024-01-15T10:30:00"));
        assert!(!outcome.is_valid());
    }

    #[test]
    fn rejects_a_date_only_timestamp() {
        let outcome = validate_config(&sample("npm", "2024-01-15"));
        assert!(!outcome.is_valid());
    }
}
