use serde::{Deserialize, Serialize};

/// Event type tag for pull request activity in the public event feed.
pub const PULL_REQUEST_EVENT: &str = "PullRequestEvent";

/// A single entry from a user's public event feed.
/// Only the fields the pipeline reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event type tag (e.g., "PushEvent", "PullRequestEvent")
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific payload
    #[serde(default)]
    pub payload: EventPayload,
}

/// Payload of an event. Shape varies by event type, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    /// Action performed (e.g., "opened", "closed")
    pub action: Option<String>,
    /// Embedded pull request snapshot for pull request events
    pub pull_request: Option<PullRequest>,
}

impl Event {
    /// True for a "pull request opened" event.
    pub fn is_opened_pull_request(&self) -> bool {
        self.kind == PULL_REQUEST_EVENT && self.payload.action.as_deref() == Some("opened")
    }
}

/// A pull request as returned by the GitHub API.
///
/// The event-embedded snapshot carries a stale `merged` flag (often absent);
/// only a representation fetched from `url` is authoritative. Fields not
/// modelled here are kept verbatim in `extra`. Modelled optional fields that
/// are null or missing are omitted when serialising.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PullRequest {
    /// Canonical API endpoint for this pull request
    pub url: String,
    /// PR number (e.g., 42)
    #[serde(default)]
    pub number: u64,
    /// PR title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Browser URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    /// "open" or "closed"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Whether the PR has been merged into its base branch
    #[serde(default)]
    pub merged: bool,
    /// ISO-8601 merge timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub login: String,
}
