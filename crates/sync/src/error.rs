use std::path::PathBuf;

use thiserror::Error;

use almanac_client::ClientError;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Fatal conditions of a sync run.
///
/// Item-level metadata failures are deliberately not represented here:
/// they are accumulated into the run report and the run continues. Only
/// conditions that must abort the run (bad startup configuration, a
/// listing failure, retry exhaustion, a commit failure) are errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("required environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error(
        "listing collections failed for {} database(s): {}",
        .failures.len(),
        .failures.join("; ")
    )]
    ListingFailed { failures: Vec<String> },

    #[error("publishing '{collection}' in {database} failed after {attempts} attempts: {last_error}")]
    PublishExhausted {
        database: String,
        collection: String,
        attempts: u32,
        #[source]
        last_error: ClientError,
    },

    #[error(
        "{} collection(s) could not be published: {}",
        .failures.len(),
        .failures.join("; ")
    )]
    PublishFailed { failures: Vec<String> },

    #[error("versions file {0} does not exist")]
    VersionsFileNotFound(PathBuf),

    #[error("failed to read versions file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("versions file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize versions document: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write versions file {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
