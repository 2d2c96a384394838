//! In-memory `HttpFetch` used by the pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GithubError, HttpFetch, JsonResponse};

/// Serves canned responses by exact URL and records every request made.
/// Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct ScriptedFetch {
    responses: HashMap<String, JsonResponse>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, body: serde_json::Value, link: Option<&str>) -> Self {
        self.responses.insert(
            url.to_string(),
            JsonResponse {
                body,
                link: link.map(str::to_string),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetch {
    async fn get(&self, url: &str) -> Result<JsonResponse, GithubError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| GithubError::UnexpectedStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
