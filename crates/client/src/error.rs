use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// First part of an error body, enough to identify the failure without
/// dumping whole HTML error pages into logs.
pub(crate) fn body_snippet(body: String) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body
    } else {
        let mut snippet: String = body.chars().take(MAX).collect();
        snippet.push_str("...");
        snippet
    }
}
