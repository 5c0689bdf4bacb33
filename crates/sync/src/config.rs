use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::error::{Result, SyncError};

pub const ENV_TENANT_UUID: &str = "CHROMA_TENANT_UUID";
pub const ENV_TEAM_ID: &str = "CHROMA_TEAM_ID";
pub const ENV_API_KEY: &str = "CHROMA_API_KEY";
pub const ENV_API_URL: &str = "CHROMA_API_URL";
pub const ENV_BACKEND_URL: &str = "CHROMA_BACKEND_URL";

// Dev deployments rate-limit reads harder than production.
const DEV_READ_CONCURRENCY: usize = 5;
const PROD_READ_CONCURRENCY: usize = 10;
const DEFAULT_WRITE_CONCURRENCY: usize = 50;
const DEFAULT_MAX_PUBLISH_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Everything a sync run needs, resolved before any remote call is made.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub tenant_id: Uuid,
    pub team_id: String,
    pub api_key: String,
    pub api_url: Url,
    pub backend_url: Url,
    /// Path the versions document is committed to.
    pub versions_path: PathBuf,
    /// Pool size for listing and metadata checks.
    pub read_concurrency: usize,
    /// Pool size for publish calls; publishes are cheap remote writes, so
    /// this pool runs wider than the read pool.
    pub write_concurrency: usize,
    pub max_publish_attempts: u32,
    pub retry_base_delay: Duration,
}

impl SyncConfig {
    /// Builds a configuration from the environment.
    ///
    /// Every variable is required; the first missing or malformed one
    /// aborts startup.
    pub fn from_env(versions_path: PathBuf) -> Result<Self> {
        let tenant_raw = require_env(ENV_TENANT_UUID)?;
        let tenant_id: Uuid = tenant_raw.parse().map_err(|err: uuid::Error| {
            SyncError::InvalidEnv {
                name: ENV_TENANT_UUID,
                reason: err.to_string(),
            }
        })?;

        let team_id = require_env(ENV_TEAM_ID)?;
        let api_key = require_env(ENV_API_KEY)?;
        let api_url = require_url(ENV_API_URL)?;
        let backend_url = require_url(ENV_BACKEND_URL)?;

        let read_concurrency = if api_url.as_str().contains("devchroma") {
            DEV_READ_CONCURRENCY
        } else {
            PROD_READ_CONCURRENCY
        };

        Ok(Self {
            tenant_id,
            team_id,
            api_key,
            api_url,
            backend_url,
            versions_path,
            read_concurrency,
            write_concurrency: DEFAULT_WRITE_CONCURRENCY,
            max_publish_attempts: DEFAULT_MAX_PUBLISH_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        })
    }
}

fn require_env(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(SyncError::MissingEnv(name)),
    }
}

fn require_url(name: &'static str) -> Result<Url> {
    let raw = require_env(name)?;
    raw.parse().map_err(|err: url::ParseError| SyncError::InvalidEnv {
        name,
        reason: err.to_string(),
    })
}
