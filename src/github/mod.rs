pub mod events;
pub mod link;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use events::fetch_events;
pub use types::{Event, PullRequest};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Invalid link header: {0}")]
    InvalidHeaderFormat(String),

    #[error("Failed to decode GitHub API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),

    #[error("Invalid GitHub username: {0:?}")]
    InvalidUsername(String),

    #[error("Pull request refetch task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// A decoded JSON response plus the pagination header that came with it.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub body: serde_json::Value,
    /// Raw `link` header value, if the server sent one
    pub link: Option<String>,
}

impl JsonResponse {
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, GithubError> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// The HTTP collaborator the pipeline fetches through.
/// Implementations must be Send + Sync so refetches can run as spawned tasks.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url`, returning the JSON body and `link` header.
    /// Non-success statuses are errors.
    async fn get(&self, url: &str) -> Result<JsonResponse, GithubError>;
}

/// `HttpFetch` backed by reqwest.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    user_agent: String,
}

impl GithubClient {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl HttpFetch for GithubClient {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<JsonResponse, GithubError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let link = response
            .headers()
            .get(reqwest::header::LINK)
            .map(|value| {
                value
                    .to_str()
                    .map(str::to_string)
                    .map_err(|e| GithubError::InvalidHeaderFormat(e.to_string()))
            })
            .transpose()?;

        let body = response.json::<serde_json::Value>().await?;
        debug!(status = status.as_u16(), has_link = link.is_some(), "received response");

        Ok(JsonResponse { body, link })
    }
}
