pub mod merged;

pub use merged::resolve_merged;

use std::sync::Arc;

use tracing::{info, instrument};

use crate::github::{fetch_events, Event, GithubError, HttpFetch, PullRequest};

/// Keep "pull request opened" events and project out their embedded pull request.
/// Input order is preserved.
pub fn extract_opened(events: Vec<Event>) -> Vec<PullRequest> {
    events
        .into_iter()
        .filter(Event::is_opened_pull_request)
        .filter_map(|event| event.payload.pull_request)
        .collect()
}

/// All pull requests `username` opened (within the feed's reachable history)
/// that are merged now.
#[instrument(skip(client, api_url))]
pub async fn get_merged_pull_requests(
    client: Arc<dyn HttpFetch>,
    api_url: &str,
    username: &str,
) -> Result<Vec<PullRequest>, GithubError> {
    let history = fetch_events(client.as_ref(), api_url, username).await?;
    info!(
        events = history.events.len(),
        pages = history.pages_fetched,
        truncated = history.truncated,
        "fetched event history"
    );

    let opened = extract_opened(history.events);
    info!(opened = opened.len(), "extracted opened pull requests");

    let merged = resolve_merged(client, opened).await?;
    info!(merged = merged.len(), "resolved merge status");
    Ok(merged)
}
