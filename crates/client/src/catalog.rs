use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use almanac_types::Collection;

use crate::error::{ClientError, Result, body_snippet};

const LIST_PAGE_SIZE: usize = 1000;

/// Read capabilities of one logical database on the data plane.
///
/// One instance per (tenant, database) pair; instances are cheap handles
/// over a shared HTTP client.
#[async_trait]
pub trait CollectionCatalog: Send + Sync {
    /// Total number of collections, used for progress reporting.
    async fn count_collections(&self) -> Result<usize>;

    /// Names of every collection in the database.
    ///
    /// Implementations paginate transparently until an empty page.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Full snapshot of one collection, `None` when the remote side does
    /// not know the name.
    async fn get_collection(&self, name: &str) -> Result<Option<Collection>>;
}

/// Catalog backed by the cloud data-plane v2 REST API.
pub struct CloudCatalog {
    http: reqwest::Client,
    collections_url: String,
    api_key: String,
    database: String,
}

/// Wire form of a collection record as the data plane returns it.
#[derive(Debug, Deserialize)]
struct CollectionRecord {
    name: String,
    id: String,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl From<CollectionRecord> for Collection {
    fn from(record: CollectionRecord) -> Self {
        Collection {
            name: record.name,
            id: record.id,
            metadata: record.metadata,
        }
    }
}

impl CloudCatalog {
    pub fn new(
        http: reqwest::Client,
        api_url: &Url,
        tenant: &str,
        database: &str,
        api_key: impl Into<String>,
    ) -> Self {
        let collections_url = format!(
            "{}/api/v2/tenants/{tenant}/databases/{database}/collections",
            api_url.as_str().trim_end_matches('/'),
        );
        Self {
            http,
            collections_url,
            api_key: api_key.into(),
            database: database.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, usize)],
    ) -> Result<T> {
        let response = self
            .http
            .get(&url)
            .header("x-chroma-token", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
                body: body_snippet(body),
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::MalformedResponse { url, source })
    }
}

#[async_trait]
impl CollectionCatalog for CloudCatalog {
    async fn count_collections(&self) -> Result<usize> {
        let url = format!("{}_count", self.collections_url);
        self.get_json(url, &[]).await
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut offset = 0;

        loop {
            let page: Vec<CollectionRecord> = self
                .get_json(
                    self.collections_url.clone(),
                    &[("limit", LIST_PAGE_SIZE), ("offset", offset)],
                )
                .await?;
            if page.is_empty() {
                break;
            }
            debug!(
                database = %self.database,
                offset,
                page_len = page.len(),
                "listed collections page"
            );
            names.extend(page.into_iter().map(|record| record.name));
            offset += LIST_PAGE_SIZE;
        }

        Ok(names)
    }

    async fn get_collection(&self, name: &str) -> Result<Option<Collection>> {
        let url = format!("{}/{name}", self.collections_url);
        let response = self
            .http
            .get(&url)
            .header("x-chroma-token", &self.api_key)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
                body: body_snippet(body),
            });
        }

        let record: CollectionRecord = response
            .json()
            .await
            .map_err(|source| ClientError::MalformedResponse { url, source })?;
        Ok(Some(record.into()))
    }
}
