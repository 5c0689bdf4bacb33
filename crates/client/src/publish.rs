use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use almanac_types::{Collection, Registry};

use crate::error::{ClientError, Result, body_snippet};

/// Team namespace the public catalog files collections under.
const TEAM_STATIC_NAME: &str = "chroma";

/// Result of a publish call.
///
/// `AlreadyPublic` is the remote idempotency signal (a conflict response);
/// callers treat it identically to `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    AlreadyPublic,
}

/// Write capability of the public catalog.
#[async_trait]
pub trait CollectionPublisher: Send + Sync {
    /// Marks one collection public. Any error is retryable from the
    /// caller's point of view; the remote call itself is idempotent.
    async fn publish(
        &self,
        registry: Registry,
        collection: &Collection,
    ) -> Result<PublishOutcome>;
}

/// Publisher backed by the dashboard backend.
pub struct DashboardPublisher {
    http: reqwest::Client,
    endpoint: String,
    team_id: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicCollectionRequest<'a> {
    team_id: &'a str,
    team_static_name: &'a str,
    database_name: &'a str,
    collection_name: &'a str,
    data_plane_collection_id: &'a str,
}

impl DashboardPublisher {
    pub fn new(
        http: reqwest::Client,
        backend_url: &Url,
        team_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let endpoint = format!(
            "{}/api/v1/public-collections",
            backend_url.as_str().trim_end_matches('/'),
        );
        Self {
            http,
            endpoint,
            team_id: team_id.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CollectionPublisher for DashboardPublisher {
    async fn publish(
        &self,
        registry: Registry,
        collection: &Collection,
    ) -> Result<PublishOutcome> {
        let request = PublicCollectionRequest {
            team_id: &self.team_id,
            team_static_name: TEAM_STATIC_NAME,
            database_name: registry.as_str(),
            collection_name: &collection.name,
            data_plane_collection_id: &collection.id,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: self.endpoint.clone(),
                source,
            })?;

        match response.status().as_u16() {
            200 | 201 => Ok(PublishOutcome::Published),
            409 => Ok(PublishOutcome::AlreadyPublic),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus {
                    status,
                    url: self.endpoint.clone(),
                    body: body_snippet(body),
                })
            }
        }
    }
}
