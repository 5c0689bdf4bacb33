use serde::{Deserialize, Serialize};

/// Metadata key set on a collection once its documents are fully ingested.
pub const FINISHED_INGEST_KEY: &str = "finished_ingest";

/// Read-only snapshot of a remote collection.
///
/// Collections are owned by the data plane; the pipeline fetches each one
/// at most once per run and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Collection {
    /// True iff the metadata carries the boolean completion flag.
    ///
    /// Absent metadata, an absent key, or a non-boolean value all count as
    /// not complete.
    pub fn is_ingest_complete(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get(FINISHED_INGEST_KEY))
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

/// Splits a collection name into its package prefix and version suffix at
/// the last underscore.
///
/// Returns `None` for names without a separator; callers log those and
/// exclude them from the versions document.
pub fn split_collection_name(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('_')
}
